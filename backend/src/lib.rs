//! # TourConnect Backend
//!
//! CRUD service for tour records.
//!
//! Tours are free-form JSON documents identified by an integer `tour_id`.
//! The crate stores them in MongoDB (or in memory for development and
//! tests) and exposes them over a small REST API used by the frontend.
//!
//! ## Architecture
//!
//! - [`models`]: Tour records, identifiers and payload validation
//! - [`db`]: Repository pattern, storage backends and the tour service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
