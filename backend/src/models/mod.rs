//! Domain models.

pub mod macros;
pub mod tour;

pub use tour::*;
