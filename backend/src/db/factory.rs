//! Repository factory for dependency injection.
//!
//! The server builds exactly one repository at startup through this factory
//! and hands it to the HTTP layer; nothing else constructs storage handles.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "mongo-repo")]
use super::repositories::MongoRepository;
use super::repository::{RepositoryError, RepositoryResult, TourRepository};
use super::MongoConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// MongoDB document store
    Mongo,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("mongo", "mongodb", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to Mongo if
    /// `MONGODB_URL` is present, otherwise Local.
    pub fn from_env() -> Result<Self, RepositoryError> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().map_err(RepositoryError::configuration);
        }

        if std::env::var("MONGODB_URL").is_ok() {
            Ok(Self::Mongo)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Read `TOUR_UNIQUE_IDS` (default: enforce uniqueness).
pub fn unique_tour_ids_from_env() -> Result<bool, RepositoryError> {
    match std::env::var("TOUR_UNIQUE_IDS") {
        Err(_) => Ok(true),
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(RepositoryError::configuration(format!(
                "TOUR_UNIQUE_IDS must be a boolean, got '{}'",
                other
            ))),
        },
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use tourconnect::db::{MongoConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Requires the `mongo-repo` feature.
///     let config = MongoConfig::from_env()?;
///     let _mongo = RepositoryFactory::create(RepositoryType::Mongo, Some(&config), true).await?;
///
///     let _local = RepositoryFactory::create_local(true);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `mongo_config` - Connection settings (required for Mongo)
    /// * `unique_tour_ids` - Reject inserts that reuse an existing `tour_id`
    pub async fn create(
        repo_type: RepositoryType,
        mongo_config: Option<&MongoConfig>,
        unique_tour_ids: bool,
    ) -> RepositoryResult<Arc<dyn TourRepository>> {
        match repo_type {
            RepositoryType::Mongo => {
                #[cfg(feature = "mongo-repo")]
                {
                    let config = mongo_config.ok_or_else(|| {
                        RepositoryError::configuration("Mongo repository requires MongoConfig")
                    })?;
                    let config = MongoConfig {
                        unique_tour_ids,
                        ..config.clone()
                    };
                    let mongo = Self::create_mongo(config).await?;
                    Ok(mongo as Arc<dyn TourRepository>)
                }
                #[cfg(not(feature = "mongo-repo"))]
                {
                    let _ = mongo_config;
                    Err(RepositoryError::configuration(
                        "Mongo repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local(unique_tour_ids)),
        }
    }

    /// Connect a Mongo repository.
    #[cfg(feature = "mongo-repo")]
    pub async fn create_mongo(config: MongoConfig) -> RepositoryResult<Arc<MongoRepository>> {
        let repo = MongoRepository::connect(config).await?;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local(unique_tour_ids: bool) -> Arc<dyn TourRepository> {
        Arc::new(LocalRepository::new().with_unique_tour_ids(unique_tour_ids))
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE`, `TOUR_UNIQUE_IDS` and, for Mongo, the
    /// `MONGODB_*` variables.
    pub async fn from_env() -> RepositoryResult<Arc<dyn TourRepository>> {
        let repo_type = RepositoryType::from_env()?;
        let unique_tour_ids = unique_tour_ids_from_env()?;

        match repo_type {
            RepositoryType::Mongo => {
                #[cfg(feature = "mongo-repo")]
                {
                    let config = MongoConfig::from_env().map_err(RepositoryError::configuration)?;
                    Self::create(repo_type, Some(&config), unique_tour_ids).await
                }
                #[cfg(not(feature = "mongo-repo"))]
                {
                    Self::create(repo_type, None, unique_tour_ids).await
                }
            }
            RepositoryType::Local => Ok(Self::create_local(unique_tour_ids)),
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn TourRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create repository from a RepositoryConfig instance.
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn TourRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        let mongo_config = config.to_mongo_config()?;

        Self::create(repo_type, mongo_config.as_ref(), config.unique_tour_ids()).await
    }
}
