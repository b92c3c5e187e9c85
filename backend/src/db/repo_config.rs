//! Repository configuration file support.
//!
//! Reads repository settings from a `repository.toml` file:
//!
//! ```toml
//! [repository]
//! type = "mongo"
//! unique_tour_ids = true
//!
//! [mongo]
//! url = "mongodb://localhost:27017/tourconnect"
//! collection = "tours"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::MongoConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub mongo: MongoSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
    #[serde(default = "default_unique_tour_ids")]
    pub unique_tour_ids: bool,
}

/// MongoDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            database: None,
            collection: default_collection(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_unique_tour_ids() -> bool {
    true
}

fn default_collection() -> String {
    "tours".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    10
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find `repository.toml` in the standard locations.
    ///
    /// Searches:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default_location() -> Option<PathBuf> {
        [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    pub fn unique_tour_ids(&self) -> bool {
        self.repository.unique_tour_ids
    }

    /// Convert to MongoConfig if this is a Mongo configuration.
    #[cfg(feature = "mongo-repo")]
    pub fn to_mongo_config(&self) -> Result<Option<MongoConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Mongo {
            return Ok(None);
        }

        if self.mongo.url.is_empty() {
            return Err(RepositoryError::configuration(
                "Mongo repository requires 'mongo.url' setting",
            ));
        }

        Ok(Some(MongoConfig {
            url: self.mongo.url.clone(),
            database: self.mongo.database.clone(),
            collection: self.mongo.collection.clone(),
            max_pool_size: self.mongo.max_connections,
            connection_timeout_sec: self.mongo.connect_timeout,
            unique_tour_ids: self.repository.unique_tour_ids,
        }))
    }

    /// Convert to MongoConfig when the feature is disabled.
    #[cfg(not(feature = "mongo-repo"))]
    pub fn to_mongo_config(&self) -> Result<Option<MongoConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Mongo {
            return Err(RepositoryError::configuration(
                "Mongo repository feature not enabled",
            ));
        }

        Ok(None)
    }
}
