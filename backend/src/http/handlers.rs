//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for validation and storage.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::dto::{
    CreateTourResponse, DeleteTourResponse, HealthResponse, TourSchema, UpdateTourResponse,
    DELETED_MESSAGE, INSERTED_MESSAGE, UPDATED_MESSAGE,
};
use super::error::{ApiError, AppError};
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::Tour;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
/// Mounted at the root, outside the API prefix.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Tour CRUD
// =============================================================================

/// GET /tour
///
/// List every stored tour, in insertion order.
#[utoipa::path(
    get,
    path = "/tour",
    responses(
        (status = 200, description = "All tours", body = [TourSchema]),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["tours"],
    operation_id = "listTours"
)]
pub async fn list_tours(State(state): State<AppState>) -> HandlerResult<Vec<Tour>> {
    let tours = db_services::list_tours(state.repository.as_ref()).await?;
    Ok(Json(tours))
}

/// POST /tour
///
/// Store the body as a new tour.
#[utoipa::path(
    post,
    path = "/tour",
    request_body = TourSchema,
    responses(
        (status = 201, description = "Tour created", body = CreateTourResponse),
        (status = 400, description = "Invalid body or missing tour_id", body = ApiError),
        (status = 409, description = "tour_id already exists", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["tours"],
    operation_id = "createTour"
)]
pub async fn create_tour(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTourResponse>), AppError> {
    let Json(body) = payload?;
    let storage_id = db_services::create_tour(state.repository.as_ref(), body).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTourResponse {
            message: INSERTED_MESSAGE.to_string(),
            inserted_id: storage_id.to_string(),
        }),
    ))
}

/// PUT /tour/{id}
///
/// Merge the body's fields into the tour whose `tour_id` is `id`.
#[utoipa::path(
    put,
    path = "/tour/{id}",
    params(("id" = i64, Path, description = "tour_id of the tour to update")),
    request_body(content = TourSchema, description = "Fields to set; tour_id may be omitted"),
    responses(
        (status = 200, description = "Update applied; modifiedCount is 0 when nothing matched or changed", body = UpdateTourResponse),
        (status = 400, description = "Invalid id or body", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["tours"],
    operation_id = "updateTour"
)]
pub async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<UpdateTourResponse> {
    let Json(body) = payload?;
    let modified_count = db_services::update_tour(state.repository.as_ref(), &id, body).await?;

    Ok(Json(UpdateTourResponse {
        message: UPDATED_MESSAGE.to_string(),
        modified_count,
    }))
}

/// DELETE /tour/{id}
///
/// Remove the tour whose `tour_id` is `id`.
#[utoipa::path(
    delete,
    path = "/tour/{id}",
    params(("id" = i64, Path, description = "tour_id of the tour to delete")),
    responses(
        (status = 200, description = "Tour deleted", body = DeleteTourResponse),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 404, description = "Tour not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["tours"],
    operation_id = "deleteTour"
)]
pub async fn delete_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<DeleteTourResponse> {
    let deleted_count = db_services::delete_tour(state.repository.as_ref(), &id).await?;

    Ok(Json(DeleteTourResponse {
        message: DELETED_MESSAGE.to_string(),
        deleted_count,
    }))
}
