//! OpenAPI documentation for the REST API.
//!
//! Tour paths are declared relative to the API prefix; [`openapi_for`] adds
//! the configured prefix as the document's server so "try it out" requests
//! land on the mounted routes.

use utoipa::openapi::{OpenApi as OpenApiDoc, Server};
use utoipa::OpenApi;

use super::dto::{
    CreateTourResponse, DeleteTourResponse, TourSchema, UpdateTourResponse,
};
use super::error::ApiError;

/// OpenAPI document for the tour API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TourConnect API",
        description = "Create, list, update and delete tour records."
    ),
    paths(
        super::handlers::list_tours,
        super::handlers::create_tour,
        super::handlers::update_tour,
        super::handlers::delete_tour,
    ),
    components(schemas(
        TourSchema,
        CreateTourResponse,
        UpdateTourResponse,
        DeleteTourResponse,
        ApiError
    )),
    tags((name = "tours", description = "Tour records"))
)]
pub struct ApiDoc;

/// Build the document for routes mounted under `api_prefix`.
pub fn openapi_for(api_prefix: &str) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi();
    let url = if api_prefix.is_empty() { "/" } else { api_prefix };
    doc.servers = Some(vec![Server::new(url)]);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_tour_paths() {
        let doc = openapi_for("/api");
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/tour"));
        assert!(paths.iter().any(|p| p.as_str() == "/tour/{id}"));

        let servers = doc.servers.unwrap();
        assert_eq!(servers[0].url, "/api");
    }

    #[test]
    fn test_document_without_prefix_uses_root_server() {
        let doc = openapi_for("");
        assert_eq!(doc.servers.unwrap()[0].url, "/");
    }

    #[test]
    fn test_schemas_registered() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.unwrap().schemas;
        assert!(schemas.contains_key("TourSchema"));
        assert!(schemas.contains_key("ApiError"));
    }
}
