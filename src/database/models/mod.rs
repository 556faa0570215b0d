pub mod feedback;
pub mod painting;
pub mod user;
pub mod user_session;

pub use feedback::{Feedback, FeedbackCreate};
pub use painting::{Painting, PaintingCreate, PaintingPatch};
pub use user::User;
pub use user_session::UserSession;
