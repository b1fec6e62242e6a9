//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the media-dl HTTP API
///
/// Served at `/openapi.json` and, when enabled, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-dl HTTP API",
        version = "0.1.0",
        description = "Submit a media page URL and retrieve the media through yt-dlp",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::create_download,
        crate::api::routes::get_artifact,

        // System
        crate::api::routes::index,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::DownloadRequest,
        crate::types::DownloadResponse,
        crate::types::ResponseStatus,
        crate::types::JobId,
        crate::error::ApiError,
    )),
    tags(
        (name = "downloads", description = "Submit URLs and fetch finished media"),
        (name = "system", description = "Landing page, health check, OpenAPI spec"),
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();

        for path in ["/", "/api/download", "/api/download/{id}", "/health", "/openapi.json"] {
            assert!(
                spec.paths.paths.contains_key(path),
                "OpenAPI spec should document {}",
                path
            );
        }
    }

    #[test]
    fn spec_has_request_and_response_schemas() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components should be present");

        for schema in ["DownloadRequest", "DownloadResponse", "ApiError"] {
            assert!(
                components.schemas.contains_key(schema),
                "missing schema {}",
                schema
            );
        }
    }

    #[test]
    fn spec_serializes_to_json() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("media-dl HTTP API"));
    }
}
