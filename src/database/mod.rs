pub mod feedback;
pub mod manager;
pub mod models;
pub mod paintings;
pub mod store;
pub mod users;

pub use feedback::FeedbackStore;
pub use manager::{DatabaseError, DatabaseManager};
pub use paintings::PaintingStore;
pub use store::{Entity, Store};
pub use users::UserStore;
