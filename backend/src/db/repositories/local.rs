//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Tours live in a `Vec`
//! behind a single lock, which keeps insertion order and makes the
//! uniqueness check and the insert one atomic step.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::repository::*;
use crate::models::{NewTour, StorageId, Tour, TourId, TourPatch};

/// In-memory local repository.
///
/// # Example
/// ```
/// use tourconnect::db::repositories::LocalRepository;
/// use tourconnect::db::repository::TourRepository;
/// use tourconnect::models::NewTour;
///
/// # tokio_test_block_on(async {
/// let repo = LocalRepository::new();
/// let tour = NewTour::from_value(serde_json::json!({ "tour_id": 1, "name": "Shimla Trip" })).unwrap();
/// repo.insert_tour(tour).await.unwrap();
/// assert_eq!(repo.tour_count(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    unique_tour_ids: bool,
}

struct LocalData {
    tours: Vec<Tour>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            tours: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository enforcing unique `tour_id` values.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            unique_tour_ids: true,
        }
    }

    /// Toggle `tour_id` uniqueness enforcement on insert.
    pub fn with_unique_tour_ids(mut self, unique: bool) -> Self {
        self.unique_tour_ids = unique;
        self
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        self.data.write().tours.clear();
    }

    /// Get the number of tours stored.
    pub fn tour_count(&self) -> usize {
        self.data.read().tours.len()
    }

    /// Check if a tour exists.
    pub fn has_tour(&self, tour_id: TourId) -> bool {
        self.find_tour(tour_id).is_some()
    }

    /// First tour matching `tour_id`, if any.
    pub fn find_tour(&self, tour_id: TourId) -> Option<Tour> {
        self.data
            .read()
            .tours
            .iter()
            .find(|tour| tour.tour_id() == Some(tour_id))
            .cloned()
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository is unavailable",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TourRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn insert_tour(&self, tour: NewTour) -> RepositoryResult<StorageId> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "insert_tour")?;

        let tour_id = tour.tour_id();
        if self.unique_tour_ids && data.tours.iter().any(|t| t.tour_id() == Some(tour_id)) {
            return Err(RepositoryError::conflict_with_context(
                format!("A tour with tour_id {} already exists", tour_id),
                ErrorContext::new("insert_tour")
                    .with_entity("tour")
                    .with_entity_id(tour_id),
            ));
        }

        let storage_id = StorageId::new(Uuid::new_v4().simple().to_string());
        data.tours.push(tour.into_stored(&storage_id));

        Ok(storage_id)
    }

    async fn list_tours(&self) -> RepositoryResult<Vec<Tour>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_tours")?;

        Ok(data.tours.clone())
    }

    async fn update_tour(&self, tour_id: TourId, patch: TourPatch) -> RepositoryResult<u64> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "update_tour")?;

        let modified = data
            .tours
            .iter_mut()
            .find(|tour| tour.tour_id() == Some(tour_id))
            .map(|tour| tour.merge(&patch))
            .unwrap_or(false);

        Ok(u64::from(modified))
    }

    async fn delete_tour(&self, tour_id: TourId) -> RepositoryResult<u64> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "delete_tour")?;

        match data
            .tours
            .iter()
            .position(|tour| tour.tour_id() == Some(tour_id))
        {
            Some(index) => {
                // `remove` keeps the remaining tours in insertion order.
                data.tours.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_tour(tour_id: i64, name: &str) -> NewTour {
        NewTour::from_value(json!({ "tour_id": tour_id, "name": name })).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_storage_ids() {
        let repo = LocalRepository::new();
        let a = repo.insert_tour(new_tour(1, "Shimla Trip")).await.unwrap();
        let b = repo.insert_tour(new_tour(2, "Manali Trip")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);

        let tours = repo.list_tours().await.unwrap();
        assert_eq!(tours[0].storage_id(), Some(a.as_str()));
        assert_eq!(tours[1].storage_id(), Some(b.as_str()));
    }

    #[tokio::test]
    async fn test_duplicate_tour_id_rejected_when_unique() {
        let repo = LocalRepository::new();
        repo.insert_tour(new_tour(1, "first")).await.unwrap();

        let err = repo.insert_tour(new_tour(1, "second")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { .. }));
        assert_eq!(repo.tour_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_tour_id_allowed_when_not_unique() {
        let repo = LocalRepository::new().with_unique_tour_ids(false);
        repo.insert_tour(new_tour(1, "first")).await.unwrap();
        repo.insert_tour(new_tour(1, "second")).await.unwrap();
        assert_eq!(repo.tour_count(), 2);

        // First match wins for update and delete.
        let patch = TourPatch::from_value(TourId::new(1), json!({ "price": 10 })).unwrap();
        assert_eq!(repo.update_tour(TourId::new(1), patch).await.unwrap(), 1);
        let tours = repo.list_tours().await.unwrap();
        assert_eq!(tours[0].get("price"), Some(&json!(10)));
        assert_eq!(tours[1].get("price"), None);

        assert_eq!(repo.delete_tour(TourId::new(1)).await.unwrap(), 1);
        let remaining = repo.list_tours().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get("name"), Some(&json!("second")));
    }

    #[tokio::test]
    async fn test_update_and_delete_miss() {
        let repo = LocalRepository::new();
        let patch = TourPatch::from_value(TourId::new(5), json!({ "price": 1 })).unwrap();

        assert_eq!(repo.update_tour(TourId::new(5), patch).await.unwrap(), 0);
        assert_eq!(repo.delete_tour(TourId::new(5)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        assert!(!repo.health_check().await.unwrap());
        let err = repo.list_tours().await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert!(repo.insert_tour(new_tour(1, "x")).await.is_err());
        assert_eq!(repo.tour_count(), 0);

        repo.set_healthy(true);
        assert!(repo.list_tours().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = LocalRepository::new();
        let clone = repo.clone();
        clone.insert_tour(new_tour(3, "shared")).await.unwrap();

        assert!(repo.has_tour(TourId::new(3)));
        repo.clear();
        assert_eq!(clone.tour_count(), 0);
    }
}
