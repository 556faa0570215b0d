pub mod auth;

pub use auth::{require_superuser, CurrentUser};
