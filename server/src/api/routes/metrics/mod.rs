//! Metric API endpoints
//!
//! `GET /` runs an aggregate report; the `/{id}` routes are plain record CRUD.

pub mod projection;
pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::api::extractors::{MetricIdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::DatabaseService;
use crate::data::report::ReportQuery;

use projection::FieldSelection;
use types::{CreateMetricRequest, ListMetricsQuery, MetricDto, PatchMetricRequest};

/// Shared state for Metrics API endpoints
#[derive(Clone)]
pub struct MetricsApiState {
    pub database: Arc<DatabaseService>,
}

/// Build Metrics API routes
pub fn routes(database: Arc<DatabaseService>) -> Router<()> {
    let state = MetricsApiState { database };

    Router::new()
        .route("/", get(list_metrics).post(create_metric))
        .route(
            "/{id}",
            get(get_metric)
                .put(update_metric)
                .patch(patch_metric)
                .delete(delete_metric),
        )
        .with_state(state)
}

fn metric_not_found(id: i64) -> ApiError {
    ApiError::not_found("METRIC_NOT_FOUND", format!("Metric not found: {}", id))
}

/// Aggregate report over metrics
#[utoipa::path(
    get,
    path = "/api/v1/metrics",
    tag = "metrics",
    params(
        ("sums" = Option<String>, Query, description = "Comma-separated numeric fields to sum"),
        ("groupby" = Option<String>, Query, description = "Comma-separated fields to group by"),
        ("sort_value" = Option<String>, Query, description = "Field to sort by, including cpi"),
        ("sort_direction" = Option<String>, Query, description = "asc, anything else sorts descending"),
        ("country" = Option<String>, Query, description = "Exact country filter"),
        ("os" = Option<String>, Query, description = "Exact os filter"),
        ("channel" = Option<String>, Query, description = "Exact channel filter"),
        ("date_from" = Option<String>, Query, description = "Inclusive lower date bound"),
        ("date_to" = Option<String>, Query, description = "Inclusive upper date bound"),
        ("fields" = Option<String>, Query, description = "Comma-separated output fields")
    ),
    responses(
        (status = 200, description = "Report rows restricted to the requested fields"),
        (status = 400, description = "Unknown, unsummable or conflicting field, or invalid date"),
        (status = 500, description = "A group summed to zero installs")
    )
)]
pub async fn list_metrics(
    State(state): State<MetricsApiState>,
    ValidatedQuery(query): ValidatedQuery<ListMetricsQuery>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let report = ReportQuery::from_params(&query.report)?;
    let selection = FieldSelection::parse(query.fields.as_deref());

    let rows = state
        .database
        .repository()
        .report(&report)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.iter().map(|row| selection.project(row)).collect()))
}

/// Create a metric record
#[utoipa::path(
    post,
    path = "/api/v1/metrics",
    tag = "metrics",
    request_body = CreateMetricRequest,
    responses(
        (status = 201, description = "Metric created", body = MetricDto),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_metric(
    State(state): State<MetricsApiState>,
    ValidatedJson(body): ValidatedJson<CreateMetricRequest>,
) -> Result<(StatusCode, Json<MetricDto>), ApiError> {
    let values = body.into_values(Utc::now().timestamp());

    let row = state
        .database
        .repository()
        .create_metric(&values)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(id = row.id, "Metric created");
    Ok((StatusCode::CREATED, Json(MetricDto::from(row))))
}

/// Get a single metric record
#[utoipa::path(
    get,
    path = "/api/v1/metrics/{id}",
    tag = "metrics",
    params(
        ("id" = i64, Path, description = "Metric ID")
    ),
    responses(
        (status = 200, description = "Metric details", body = MetricDto),
        (status = 404, description = "Metric not found")
    )
)]
pub async fn get_metric(
    State(state): State<MetricsApiState>,
    MetricIdPath(id): MetricIdPath,
) -> Result<Json<MetricDto>, ApiError> {
    let row = state
        .database
        .repository()
        .get_metric(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| metric_not_found(id))?;

    Ok(Json(MetricDto::from(row)))
}

/// Replace every field of a metric record
#[utoipa::path(
    put,
    path = "/api/v1/metrics/{id}",
    tag = "metrics",
    params(
        ("id" = i64, Path, description = "Metric ID")
    ),
    request_body = CreateMetricRequest,
    responses(
        (status = 200, description = "Metric updated", body = MetricDto),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Metric not found")
    )
)]
pub async fn update_metric(
    State(state): State<MetricsApiState>,
    MetricIdPath(id): MetricIdPath,
    ValidatedJson(body): ValidatedJson<CreateMetricRequest>,
) -> Result<Json<MetricDto>, ApiError> {
    let values = body.into_values(Utc::now().timestamp());

    let row = state
        .database
        .repository()
        .update_metric(id, &values)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| metric_not_found(id))?;

    Ok(Json(MetricDto::from(row)))
}

/// Update some fields of a metric record
#[utoipa::path(
    patch,
    path = "/api/v1/metrics/{id}",
    tag = "metrics",
    params(
        ("id" = i64, Path, description = "Metric ID")
    ),
    request_body = PatchMetricRequest,
    responses(
        (status = 200, description = "Metric updated", body = MetricDto),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Metric not found")
    )
)]
pub async fn patch_metric(
    State(state): State<MetricsApiState>,
    MetricIdPath(id): MetricIdPath,
    ValidatedJson(body): ValidatedJson<PatchMetricRequest>,
) -> Result<Json<MetricDto>, ApiError> {
    let repo = state.database.repository();

    let current = repo
        .get_metric(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| metric_not_found(id))?;

    let row = repo
        .update_metric(id, &body.apply(current.values()))
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| metric_not_found(id))?;

    Ok(Json(MetricDto::from(row)))
}

/// Delete a metric record
#[utoipa::path(
    delete,
    path = "/api/v1/metrics/{id}",
    tag = "metrics",
    params(
        ("id" = i64, Path, description = "Metric ID")
    ),
    responses(
        (status = 204, description = "Metric deleted"),
        (status = 404, description = "Metric not found")
    )
)]
pub async fn delete_metric(
    State(state): State<MetricsApiState>,
    MetricIdPath(id): MetricIdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .database
        .repository()
        .delete_metric(id)
        .await
        .map_err(ApiError::from_data)?;

    if !deleted {
        return Err(metric_not_found(id));
    }

    tracing::debug!(id, "Metric deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, header};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::data::SqliteService;

    async fn test_router() -> Router {
        let sqlite = SqliteService::in_memory().await.unwrap();
        routes(Arc::new(DatabaseService::Sqlite(Arc::new(sqlite))))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn metric(channel: &str, country: &str, date: &str, spend: f64, installs: i64) -> Value {
        json!({
            "channel": channel,
            "country": country,
            "date": date,
            "os": "ios",
            "impressions": 1000,
            "clicks": 100,
            "installs": installs,
            "spend": spend,
            "revenue": spend * 2.0,
        })
    }

    async fn seed(router: &Router, metrics: Vec<Value>) {
        for m in metrics {
            let response = send(router, "POST", "/", Some(m)).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let router = test_router().await;

        let response = send(
            &router,
            "POST",
            "/",
            Some(metric("facebook", "US", "2023-01-05", 10.0, 2)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["date"], json!("2023-01-05T00:00:00Z"));

        let fetched = json_body(send(&router, "GET", &format!("/{}", id), None).await).await;
        assert_eq!(fetched, created);

        let response = send(
            &router,
            "PATCH",
            &format!("/{}", id),
            Some(json!({"installs": 5})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let patched = json_body(response).await;
        assert_eq!(patched["installs"], json!(5));
        assert_eq!(patched["channel"], json!("facebook"));

        let response = send(
            &router,
            "PUT",
            &format!("/{}", id),
            Some(metric("google", "DE", "2023-02-01", 3.0, 1)),
        )
        .await;
        let replaced = json_body(response).await;
        assert_eq!(replaced["channel"], json!("google"));
        assert_eq!(replaced["country"], json!("DE"));

        let response = send(&router, "DELETE", &format!("/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&router, "GET", &format!("/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], json!("METRIC_NOT_FOUND"));

        let response = send(&router, "DELETE", &format!("/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_defaults_date_to_now() {
        let router = test_router().await;
        let mut body = metric("facebook", "US", "", 1.0, 1);
        body.as_object_mut().unwrap().remove("date");

        let before = Utc::now().timestamp();
        let created = json_body(send(&router, "POST", "/", Some(body)).await).await;
        let date = chrono::DateTime::parse_from_rfc3339(created["date"].as_str().unwrap())
            .unwrap()
            .timestamp();
        assert!(date >= before && date <= Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let router = test_router().await;
        let response = send(
            &router,
            "POST",
            "/",
            Some(metric("facebook", "USA", "2023-01-01", 1.0, 1)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], json!("VALIDATION_ERROR"));

        let response = send(&router, "POST", "/", Some(json!({"channel": "x"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], json!("JSON_PARSE_ERROR"));
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let router = test_router().await;
        let response = send(&router, "GET", "/0", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], json!("INVALID_METRIC_ID"));

        let response = send(&router, "GET", "/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overall_sum_and_cpi() {
        let router = test_router().await;
        seed(
            &router,
            vec![
                metric("facebook", "US", "2023-01-01", 10.0, 1),
                metric("google", "US", "2023-01-02", 20.0, 2),
                metric("adcolony", "DE", "2023-01-03", 30.0, 3),
            ],
        )
        .await;

        let rows = json_body(send(&router, "GET", "/", None).await).await;
        assert_eq!(
            rows,
            json!([{
                "country": null,
                "date": null,
                "os": null,
                "channel": null,
                "impressions": null,
                "clicks": null,
                "revenue": null,
                "cpi": 10.0,
                "spend": 60.0,
                "installs": 6.0,
            }])
        );
    }

    #[tokio::test]
    async fn test_filtered_grouped_sorted_report() {
        let router = test_router().await;
        seed(
            &router,
            vec![
                metric("facebook", "US", "2023-01-01", 10.0, 1),
                metric("facebook", "US", "2023-01-31T23:00:00Z", 30.0, 1),
                metric("google", "US", "2023-01-15", 8.0, 4),
                metric("google", "DE", "2023-01-15", 100.0, 1),
                metric("google", "US", "2023-02-01", 100.0, 1),
            ],
        )
        .await;

        let response = send(
            &router,
            "GET",
            "/?date_from=2023-01-01&date_to=2023-01-31&country=US&groupby=channel&sums=impressions&sort_value=cpi&fields=channel,cpi,impressions",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([
                {"channel": "facebook", "impressions": 2000, "cpi": 20.0},
                {"channel": "google", "impressions": 1000, "cpi": 2.0},
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_match_returns_empty_list() {
        let router = test_router().await;
        seed(&router, vec![metric("facebook", "US", "2023-01-01", 10.0, 1)]).await;

        let rows = json_body(send(&router, "GET", "/?country=FR", None).await).await;
        assert_eq!(rows, json!([]));
    }

    #[tokio::test]
    async fn test_long_fields_list_ignores_unknown_names() {
        let router = test_router().await;
        seed(&router, vec![metric("fb", "US", "2023-01-01", 10.0, 1)]).await;

        let uri = format!("/?groupby=channel&fields=channel,{}", "x".repeat(300));
        let response = send(&router, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([{ "channel": "fb" }]));
    }

    #[tokio::test]
    async fn test_repeated_query_param_is_rejected() {
        let router = test_router().await;

        let response = send(&router, "GET", "/?country=US&country=GB", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], json!("QUERY_PARSE_ERROR"));
    }

    #[tokio::test]
    async fn test_report_errors() {
        let router = test_router().await;
        seed(&router, vec![metric("facebook", "US", "2023-01-01", 10.0, 0)]).await;

        for (uri, code) in [
            ("/?groupby=cost", "UNKNOWN_FIELD"),
            ("/?sums=country", "NOT_SUMMABLE"),
            ("/?groupby=clicks&sums=clicks", "FIELD_CONFLICT"),
            ("/?sort_value=os", "NOT_SORTABLE"),
            ("/?date_from=yesterday", "INVALID_DATE"),
        ] {
            let response = send(&router, "GET", uri, None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json_body(response).await["code"], json!(code), "{}", uri);
        }

        let response = send(&router, "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
