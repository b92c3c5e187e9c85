//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`tour`]: The tour storage contract

pub mod error;
pub mod tour;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use tour::TourRepository;
