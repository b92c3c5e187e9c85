//! TourConnect HTTP Server Binary
//!
//! Main entry point for the tour REST API server.
//! It builds the repository, sets up the HTTP router, and serves requests
//! until Ctrl+C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory repository (default)
//! cargo run --bin tourconnect-server
//!
//! # Run against MongoDB
//! MONGODB_URL=mongodb://localhost:27017/tourconnect \
//!   cargo run --bin tourconnect-server --features mongo-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `API_PREFIX`: Mount point of the tour routes (default: /api)
//! - `ENABLE_DOCS`: Serve Swagger UI at /api-docs (default: true)
//! - `REPOSITORY_CONFIG`: Path to a repository.toml file
//! - `REPOSITORY_TYPE`: `local` or `mongo` when no config file is used
//! - `TOUR_UNIQUE_IDS`: Reject duplicate tour_id values (default: true)
//! - `MONGODB_URL`: MongoDB connection string (mongo repository)
//! - `RUST_LOG`: Log filter (default: info)

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tourconnect::db::{RepositoryConfig, RepositoryFactory, TourRepository};
use tourconnect::http::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting TourConnect HTTP Server");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let repository = build_repository().await?;
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = create_router(state, &config);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let prefix = if config.api_prefix.is_empty() {
        "/"
    } else {
        config.api_prefix.as_str()
    };
    info!("Server listening on http://{}", addr);
    info!("Tour API mounted at {}", prefix);
    if config.enable_docs {
        info!("API documentation: http://{}/api-docs", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Config file when one is named or found, environment otherwise.
async fn build_repository() -> anyhow::Result<Arc<dyn TourRepository>> {
    let config_path = std::env::var("REPOSITORY_CONFIG")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(RepositoryConfig::find_default_location);

    let repository = match config_path {
        Some(path) => {
            info!("Loading repository configuration from {}", path.display());
            RepositoryFactory::from_config_file(&path).await
        }
        None => RepositoryFactory::from_env().await,
    };

    repository.context("Failed to initialize repository")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
