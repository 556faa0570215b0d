pub mod builder;
pub mod types;

pub use builder::{bind_params_as, bind_params_scalar, FilterBuilder};
pub use types::{FilterParam, PaintingFilter, SqlQuery};
