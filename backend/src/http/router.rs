//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa_swagger_ui::SwaggerUi;

use super::config::ServerConfig;
use super::docs::openapi_for;
use super::handlers;
use super::state::AppState;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    // CORS configuration - permissive, the browser frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let tours = Router::new()
        .route("/tour", get(handlers::list_tours).post(handlers::create_tour))
        .route("/tours", get(handlers::list_tours))
        .route(
            "/tour/{id}",
            put(handlers::update_tour).delete(handlers::delete_tour),
        );

    let api = if config.api_prefix.is_empty() {
        tours
    } else {
        Router::new().nest(&config.api_prefix, tours)
    };

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api);

    if config.enable_docs {
        app = app.merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, openapi_for(&config.api_prefix)));
    }

    app.layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
