// handlers/mod.rs - HTTP handlers grouped by resource

pub mod auth;
pub mod feedback;
pub mod paintings;
