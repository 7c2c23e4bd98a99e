//! Shared API types
//!
//! Error responses and timestamp parsing used across endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::data::DataError;
use crate::data::report::ReportError;

/// Parse a record timestamp (RFC 3339, or `YYYY-MM-DD` as midnight UTC) into unix seconds.
/// Fractional seconds are truncated.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Render unix seconds as an RFC 3339 UTC timestamp
pub fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        let backend = e.backend();
        if let DataError::DivisionByZero { .. } = e {
            tracing::error!(error = %e, backend, "Report failed");
            return Self::internal("Division by zero computing cpi: a group has no installs");
        }
        if e.is_transient() {
            tracing::warn!(error = %e, backend, "Database unavailable");
            return Self::service_unavailable("Database temporarily unavailable");
        }
        tracing::error!(error = %e, backend, "Data error");
        Self::internal("Database operation failed")
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self::bad_request(e.code(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2023-01-01"), Some(1_672_531_200));
        assert_eq!(parse_timestamp("2023-01-01T00:00:00Z"), Some(1_672_531_200));
        assert_eq!(
            parse_timestamp("2023-01-01T02:00:00+02:00"),
            Some(1_672_531_200)
        );
        assert_eq!(parse_timestamp("01/01/2023"), None);
    }

    #[test]
    fn test_parse_timestamp_drops_subsecond_precision() {
        assert_eq!(
            parse_timestamp("2023-01-01T00:00:00.750Z"),
            Some(1_672_531_200)
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_672_531_200), "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_report_error_is_bad_request() {
        let err: ApiError = ReportError::NotSummable("country".to_string()).into();
        match err {
            ApiError::BadRequest { code, .. } => assert_eq!(code, "NOT_SUMMABLE"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_transient_error_is_unavailable() {
        let err = ApiError::from_data(DataError::Sqlite(sqlx::Error::PoolTimedOut));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_division_by_zero_is_internal() {
        let err = ApiError::from_data(DataError::DivisionByZero { backend: "sqlite" });
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
