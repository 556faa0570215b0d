pub mod media;
pub mod notify;
