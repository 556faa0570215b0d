pub mod migrate;
pub mod superuser;
