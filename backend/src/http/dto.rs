//! Data Transfer Objects for the HTTP API.
//!
//! Tour bodies themselves are free-form JSON and pass through as
//! `serde_json::Value`; [`TourSchema`] only documents them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const INSERTED_MESSAGE: &str = "Data inserted successfully";
pub const UPDATED_MESSAGE: &str = "Data updated successfully";
pub const DELETED_MESSAGE: &str = "Data deleted successfully";

/// Response for tour creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTourResponse {
    #[schema(example = "Data inserted successfully")]
    pub message: String,
    /// Storage id assigned to the new tour
    pub inserted_id: String,
}

/// Response for tour update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTourResponse {
    #[schema(example = "Data updated successfully")]
    pub message: String,
    /// 0 when nothing matched or nothing changed
    pub modified_count: u64,
}

/// Response for tour deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTourResponse {
    #[schema(example = "Data deleted successfully")]
    pub message: String,
    pub deleted_count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected` or `error: <detail>`
    pub database: String,
}

/// A tour record. Only `tour_id` is required; any other field is stored as sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "tour_id": 1,
    "name": "Shimla Trip",
    "price": 2500,
    "country": "India"
}))]
pub struct TourSchema {
    /// Storage id, present on listed tours
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Application-level identifier
    pub tour_id: i64,
}
