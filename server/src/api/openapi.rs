//! OpenAPI specification

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, metrics};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AdReport API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Advertising metrics CRUD and reporting"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "metrics", description = "Metric records and aggregate reports")
    ),
    paths(
        health::health,
        metrics::list_metrics,
        metrics::create_metric,
        metrics::get_metric,
        metrics::update_metric,
        metrics::patch_metric,
        metrics::delete_metric,
    ),
    components(schemas(
        health::HealthResponse,
        metrics::types::MetricDto,
        metrics::types::CreateMetricRequest,
        metrics::types::PatchMetricRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_metric_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v1/health"));
        assert!(paths.contains_key("/api/v1/metrics"));
        assert!(paths.contains_key("/api/v1/metrics/{id}"));
        assert!(doc["components"]["schemas"]["MetricDto"].is_object());
    }
}
