//! Tour service layer.
//!
//! These functions own the request-level rules (payload validation, path id
//! parsing, not-found semantics for delete) and are written against the
//! [`TourRepository`] trait, so they work with any storage backend.
//!
//! # Example
//! ```
//! use tourconnect::db::{services, LocalRepository};
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = LocalRepository::new();
//! services::create_tour(&repo, json!({ "tour_id": 1, "name": "Shimla Trip" })).await.unwrap();
//! let tours = services::list_tours(&repo).await.unwrap();
//! assert_eq!(tours.len(), 1);
//! # });
//! ```

use serde_json::Value;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, TourRepository};
use crate::models::{NewTour, StorageId, Tour, TourId, TourPatch};

pub const TOUR_NOT_FOUND: &str = "Tour not found";

/// Check if the repository is healthy and accessible.
pub async fn health_check<R: TourRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Return every stored tour.
pub async fn list_tours<R: TourRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Tour>> {
    let tours = repo.list_tours().await?;
    log::debug!("Listed {} tours", tours.len());
    Ok(tours)
}

/// Validate `body` and store it as a new tour.
///
/// # Returns
/// The storage id assigned to the new tour.
///
/// # Errors
/// * `ValidationError` - body is not an object, lacks an integer `tour_id`,
///   supplies `_id`, or uses a reserved field name
/// * `Conflict` - `tour_id` already exists and uniqueness is enforced
pub async fn create_tour<R: TourRepository + ?Sized>(
    repo: &R,
    body: Value,
) -> RepositoryResult<StorageId> {
    let tour = NewTour::from_value(body)
        .map_err(|e| RepositoryError::from(e).with_operation("create_tour"))?;
    let tour_id = tour.tour_id();

    let storage_id = repo.insert_tour(tour).await?;
    log::info!("Created tour {} with _id {}", tour_id, storage_id);

    Ok(storage_id)
}

/// Merge the fields of `body` into the tour identified by `raw_id`.
///
/// `raw_id` is the path segment as received. A body `tour_id` equal to the
/// target is ignored; any other value is rejected.
///
/// # Returns
/// The number of modified tours (0 or 1). A miss is not an error.
pub async fn update_tour<R: TourRepository + ?Sized>(
    repo: &R,
    raw_id: &str,
    body: Value,
) -> RepositoryResult<u64> {
    let tour_id = parse_tour_id(raw_id, "update_tour")?;
    let patch = TourPatch::from_value(tour_id, body).map_err(|e| {
        RepositoryError::from(e)
            .with_operation("update_tour")
            .with_entity_id(tour_id)
    })?;

    if patch.is_empty() {
        log::debug!("Empty update for tour {}; nothing to write", tour_id);
        return Ok(0);
    }

    let modified = repo.update_tour(tour_id, patch).await?;
    if modified == 0 {
        log::debug!("Update of tour {} modified nothing", tour_id);
    } else {
        log::info!("Updated tour {}", tour_id);
    }

    Ok(modified)
}

/// Remove the tour identified by `raw_id`.
///
/// # Errors
/// * `NotFound` - no tour has this `tour_id`
pub async fn delete_tour<R: TourRepository + ?Sized>(
    repo: &R,
    raw_id: &str,
) -> RepositoryResult<u64> {
    let tour_id = parse_tour_id(raw_id, "delete_tour")?;

    let deleted = repo.delete_tour(tour_id).await?;
    if deleted == 0 {
        return Err(RepositoryError::not_found_with_context(
            TOUR_NOT_FOUND,
            ErrorContext::new("delete_tour")
                .with_entity("tour")
                .with_entity_id(tour_id),
        ));
    }

    log::info!("Deleted tour {}", tour_id);
    Ok(deleted)
}

fn parse_tour_id(raw_id: &str, operation: &str) -> RepositoryResult<TourId> {
    TourId::parse_path(raw_id).map_err(|e| RepositoryError::from(e).with_operation(operation))
}
