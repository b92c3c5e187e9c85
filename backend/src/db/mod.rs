//! Database module for tour storage.
//!
//! This module provides abstractions for database operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Payload and path id validation                       │
//! │  - Not-found semantics for delete                       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!          ┌──────────┴───────────┐
//!          │                      │
//!   ┌──────▼──────┐        ┌──────▼──────┐
//!   │   MongoDB   │        │    Local    │
//!   │ (documents) │        │ (in-memory) │
//!   └─────────────┘        └─────────────┘
//! ```
//!
//! The repository is built once by [`RepositoryFactory`] and passed to
//! whoever needs it; there is no process-wide instance.
//!
//! # Recommended Usage
//! ```ignore
//! use tourconnect::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let tours = services::list_tours(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "mongo-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Mongo config is colocated with the repository implementation.
#[cfg(feature = "mongo-repo")]
pub use repositories::mongo::MongoConfig;
#[cfg(not(feature = "mongo-repo"))]
#[derive(Debug, Clone)]
pub struct MongoConfig {
    _private: (),
}

// ==================== Service Layer ====================

pub use services::{create_tour, delete_tour, health_check, list_tours, update_tour};

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "mongo-repo")]
pub use repositories::MongoRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, TourRepository};
