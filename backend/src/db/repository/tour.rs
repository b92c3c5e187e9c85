//! Tour repository trait for CRUD operations.
//!
//! This trait is the storage contract the tour service is written against.
//! Lookups for update and delete go through the application-level `tour_id`,
//! never the storage-assigned `_id`.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewTour, StorageId, Tour, TourId, TourPatch};

/// Repository trait for tour storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TourRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Tour Operations ====================

    /// Persist a new tour verbatim and return the generated storage id.
    ///
    /// Fails with `RepositoryError::Conflict` when the store enforces unique
    /// `tour_id` values and one already exists.
    async fn insert_tour(&self, tour: NewTour) -> RepositoryResult<StorageId>;

    /// All tours in insertion order.
    async fn list_tours(&self) -> RepositoryResult<Vec<Tour>>;

    /// Merge `patch` into the first tour whose `tour_id` matches.
    ///
    /// # Returns
    /// * `Ok(0)` - No tour matched, or the stored values already equal the patch
    /// * `Ok(1)` - The matching tour was modified
    async fn update_tour(&self, tour_id: TourId, patch: TourPatch) -> RepositoryResult<u64>;

    /// Remove the first tour whose `tour_id` matches.
    ///
    /// # Returns
    /// * `Ok(0)` - No tour matched
    /// * `Ok(1)` - The matching tour was removed
    async fn delete_tour(&self, tour_id: TourId) -> RepositoryResult<u64>;
}
