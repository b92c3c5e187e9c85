//! Tests for repository error construction, context and classification.

use tourconnect::db::repository::{ErrorContext, RepositoryError};
use tourconnect::models::{NewTour, TourId, TourPatch, TourValidationError};

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("update_tour")
        .with_entity("tour")
        .with_entity_id(TourId::new(12))
        .with_details("index=tour_id_unique");

    assert_eq!(
        ctx.to_string(),
        " [operation=update_tour, entity=tour, id=12, details=index=tour_id_unique]"
    );
    assert_eq!(ErrorContext::default().to_string(), "");
}

#[test]
fn test_error_display_prefixes() {
    let cases = [
        (RepositoryError::connection("down"), "Connection error: down"),
        (RepositoryError::query("bad filter"), "Query error: bad filter"),
        (RepositoryError::not_found("Tour not found"), "Not found: Tour not found"),
        (RepositoryError::validation("bad"), "Validation error: bad"),
        (RepositoryError::conflict("dup"), "Conflict: dup"),
        (RepositoryError::configuration("no url"), "Configuration error: no url"),
        (RepositoryError::internal("boom"), "Internal error: boom"),
    ];

    for (err, expected) in cases {
        assert!(
            err.to_string().starts_with(expected),
            "{} should start with {}",
            err,
            expected
        );
    }
}

#[test]
fn test_with_operation_and_entity_id_override_context() {
    let err = RepositoryError::query_with_context("timeout", ErrorContext::new("list_tours"))
        .with_operation("list_tours_retry")
        .with_entity_id(5);

    assert_eq!(err.message(), "timeout");
    assert_eq!(err.context().operation.as_deref(), Some("list_tours_retry"));
    assert_eq!(err.context().entity_id.as_deref(), Some("5"));
    assert!(err.to_string().contains("operation=list_tours_retry"));
}

#[test]
fn test_client_error_classification() {
    assert!(RepositoryError::not_found("x").is_client_error());
    assert!(RepositoryError::validation("x").is_client_error());
    assert!(RepositoryError::conflict("x").is_client_error());

    assert!(!RepositoryError::connection("x").is_client_error());
    assert!(!RepositoryError::query("x").is_client_error());
    assert!(!RepositoryError::configuration("x").is_client_error());
    assert!(!RepositoryError::internal("x").is_client_error());
}

#[test]
fn test_tour_validation_errors_become_validation_errors() {
    let err: RepositoryError = NewTour::from_value(serde_json::json!({ "name": "x" }))
        .unwrap_err()
        .into();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert_eq!(err.context().entity.as_deref(), Some("tour"));

    let err: RepositoryError =
        TourPatch::from_value(TourId::new(1), serde_json::json!({ "$set": {} }))
            .unwrap_err()
            .into();
    assert!(err.message().contains("$set"));

    let err: RepositoryError = TourValidationError::InvalidPathId("abc".to_string()).into();
    assert_eq!(err.message(), "invalid tour id 'abc'");
}
