//! MongoDB repository implementation.
//!
//! Tours live in one collection as schema-less documents. The driver's
//! `Client` is pooled and cheap to clone, so one `MongoRepository` is built at
//! startup and shared by every request.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `MONGODB_URL`: Connection string (required)
//! - `MONGODB_DATABASE`: Database name (default: the URL's path, else `tourconnect`)
//! - `MONGODB_COLLECTION`: Collection name (default: `tours`)
//! - `MONGODB_POOL_MAX`: Maximum pool size (default: 10)
//! - `MONGODB_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 10)

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::error::{CommandError, ErrorKind};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, TourRepository,
};
use crate::models::{NewTour, StorageId, Tour, TourId, TourPatch, TOUR_ID_FIELD};

mod convert;

pub const DEFAULT_DATABASE: &str = "tourconnect";
pub const DEFAULT_COLLECTION: &str = "tours";
const TOUR_ID_INDEX: &str = "tour_id_unique";
const NAMESPACE_NOT_FOUND_CODE: i32 = 26;
const INDEX_NOT_FOUND_CODE: i32 = 27;

/// Configuration for connecting to MongoDB.
#[derive(Debug, Clone, PartialEq)]
pub struct MongoConfig {
    /// Connection string (`mongodb://` or `mongodb+srv://`)
    pub url: String,
    /// Database name; `None` uses the URL's default database
    pub database: Option<String>,
    /// Collection holding tour documents
    pub collection: String,
    /// Maximum number of pooled connections
    pub max_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Create a unique index on `tour_id`
    pub unique_tour_ids: bool,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            database: None,
            collection: DEFAULT_COLLECTION.to_string(),
            max_pool_size: 10,
            connection_timeout_sec: 10,
            unique_tour_ids: true,
        }
    }
}

impl MongoConfig {
    /// Create configuration from environment variables.
    ///
    /// `unique_tour_ids` is left at its default; it is a repository-wide
    /// setting read by the factory.
    pub fn from_env() -> Result<Self, String> {
        let url = std::env::var("MONGODB_URL")
            .map_err(|_| "MONGODB_URL must be set".to_string())?;

        let database = std::env::var("MONGODB_DATABASE")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let collection = std::env::var("MONGODB_COLLECTION")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        let max_pool_size = std::env::var("MONGODB_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let connection_timeout_sec = std::env::var("MONGODB_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        Ok(Self {
            url,
            database,
            collection,
            max_pool_size,
            connection_timeout_sec,
            ..Default::default()
        })
    }

    /// Create a new configuration with a connection URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Document-store repository backed by MongoDB.
#[derive(Clone, Debug)]
pub struct MongoRepository {
    database: Database,
    collection: Collection<Document>,
    config: MongoConfig,
}

impl MongoRepository {
    /// Connect, verify the server answers, and prepare the collection.
    ///
    /// # Returns
    /// * `Ok(MongoRepository)` on success
    /// * `Err(RepositoryError)` if the URL is invalid, the server is unreachable
    ///   or the `tour_id` index cannot be created or dropped
    pub async fn connect(config: MongoConfig) -> RepositoryResult<Self> {
        if !config.url.starts_with("mongodb://") && !config.url.starts_with("mongodb+srv://") {
            return Err(RepositoryError::configuration(format!(
                "connection URL does not have a `mongodb` scheme; url={}",
                config.url
            )));
        }

        let mut options = ClientOptions::parse(&config.url).await.map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("parse_client_options"),
            )
        })?;
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(Duration::from_secs(config.connection_timeout_sec));
        options.server_selection_timeout =
            Some(Duration::from_secs(config.connection_timeout_sec));
        options.app_name = Some("tourconnect".to_string());

        let db_name = config
            .database
            .clone()
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(options).map_err(|e| {
            RepositoryError::connection_with_context(e.to_string(), ErrorContext::new("create_client"))
        })?;
        let database = client.database(&db_name);
        let collection = database.collection::<Document>(&config.collection);

        let repo = Self {
            database,
            collection,
            config,
        };

        repo.ping()
            .await
            .map_err(|e| e.with_operation("connect"))?;

        if repo.config.unique_tour_ids {
            repo.ensure_tour_id_index().await?;
        } else {
            repo.drop_tour_id_index().await?;
        }

        log::info!(
            "Connected to MongoDB database '{}', collection '{}'",
            db_name,
            repo.config.collection
        );

        Ok(repo)
    }

    /// Unique index on `tour_id`; makes concurrent duplicate inserts fail in
    /// the store instead of racing.
    async fn ensure_tour_id_index(&self) -> RepositoryResult<()> {
        let mut options = IndexOptions::default();
        options.unique = Some(true);
        options.name = Some(TOUR_ID_INDEX.to_string());

        let mut keys = Document::new();
        keys.insert(TOUR_ID_FIELD, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(options)
            .build();

        self.collection.create_index(index).await.map_err(|e| {
            let err = RepositoryError::from(e);
            RepositoryError::query_with_context(
                err.message().to_string(),
                ErrorContext::new("create_index")
                    .with_entity("tour")
                    .with_details(format!("index={}", TOUR_ID_INDEX)),
            )
        })?;

        Ok(())
    }

    /// Remove an index left by an earlier run with uniqueness on; otherwise
    /// duplicates would still be rejected.
    async fn drop_tour_id_index(&self) -> RepositoryResult<()> {
        match self.collection.drop_index(TOUR_ID_INDEX).await {
            Ok(()) => {
                log::info!("Dropped index '{}'", TOUR_ID_INDEX);
                Ok(())
            }
            Err(e) if is_missing_index(&e) => Ok(()),
            Err(e) => {
                let err = RepositoryError::from(e);
                Err(RepositoryError::query_with_context(
                    err.message().to_string(),
                    ErrorContext::new("drop_index")
                        .with_entity("tour")
                        .with_details(format!("index={}", TOUR_ID_INDEX)),
                ))
            }
        }
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }

    fn tour_filter(tour_id: TourId) -> Document {
        let mut filter = Document::new();
        filter.insert(TOUR_ID_FIELD, tour_id.value());
        filter
    }
}

/// The index or the whole collection does not exist yet.
fn is_missing_index(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(CommandError { code, .. })
            if *code == INDEX_NOT_FOUND_CODE || *code == NAMESPACE_NOT_FOUND_CODE
    )
}

#[async_trait]
impl TourRepository for MongoRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match self.ping().await {
            Ok(()) => Ok(true),
            Err(RepositoryError::ConnectionError { .. }) => Ok(false),
            Err(e) => Err(e.with_operation("health_check")),
        }
    }

    async fn insert_tour(&self, tour: NewTour) -> RepositoryResult<StorageId> {
        let tour_id = tour.tour_id();
        let document = convert::to_document(tour.fields());

        let result = self.collection.insert_one(document).await.map_err(|e| {
            match RepositoryError::from(e) {
                RepositoryError::Conflict { .. } => RepositoryError::conflict_with_context(
                    format!("A tour with tour_id {} already exists", tour_id),
                    ErrorContext::new("insert_tour")
                        .with_entity("tour")
                        .with_entity_id(tour_id)
                        .with_details(format!("index={}", TOUR_ID_INDEX)),
                ),
                other => other.with_operation("insert_tour").with_entity_id(tour_id),
            }
        })?;

        Ok(StorageId::new(convert::storage_id_string(result.inserted_id)))
    }

    async fn list_tours(&self) -> RepositoryResult<Vec<Tour>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "$natural": 1 })
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("list_tours"))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("list_tours"))?;

        Ok(documents.into_iter().map(convert::document_to_tour).collect())
    }

    async fn update_tour(&self, tour_id: TourId, patch: TourPatch) -> RepositoryResult<u64> {
        // `$set` with an empty document is rejected by the server.
        if patch.is_empty() {
            return Ok(0);
        }

        let update = doc! { "$set": convert::to_document(patch.fields()) };
        let result = self
            .collection
            .update_one(Self::tour_filter(tour_id), update)
            .await
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation("update_tour")
                    .with_entity_id(tour_id)
            })?;

        Ok(result.modified_count)
    }

    async fn delete_tour(&self, tour_id: TourId) -> RepositoryResult<u64> {
        let result = self
            .collection
            .delete_one(Self::tour_filter(tour_id))
            .await
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation("delete_tour")
                    .with_entity_id(tour_id)
            })?;

        Ok(result.deleted_count)
    }
}
