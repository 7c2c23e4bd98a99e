//! Metric API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::types::{format_timestamp, parse_timestamp};
use crate::data::report::ReportParams;
use crate::data::types::{MetricRow, MetricValues};

/// Metric DTO for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricDto {
    pub id: i64,
    pub channel: String,
    pub country: String,
    /// RFC 3339 UTC timestamp
    pub date: String,
    pub os: String,
    pub impressions: i64,
    pub clicks: i64,
    pub installs: i64,
    pub spend: f64,
    pub revenue: f64,
}

impl From<MetricRow> for MetricDto {
    fn from(row: MetricRow) -> Self {
        Self {
            id: row.id,
            channel: row.channel,
            country: row.country,
            date: format_timestamp(row.date),
            os: row.os,
            impressions: row.impressions,
            clicks: row.clicks,
            installs: row.installs,
            spend: row.spend,
            revenue: row.revenue,
        }
    }
}

/// Validator for record timestamps
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    if parse_timestamp(date).is_none() {
        return Err(ValidationError::new("date_format")
            .with_message("date must be RFC 3339 or YYYY-MM-DD".into()));
    }
    Ok(())
}

/// Request body for creating or fully replacing a metric
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMetricRequest {
    #[validate(length(min = 1, max = 100, message = "channel must be 1-100 characters"))]
    pub channel: String,

    #[validate(length(min = 1, max = 2, message = "country must be 1-2 characters"))]
    pub country: String,

    /// Defaults to the current time when omitted
    #[serde(default)]
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,

    #[validate(length(min = 1, max = 100, message = "os must be 1-100 characters"))]
    pub os: String,

    pub impressions: i64,
    pub clicks: i64,
    pub installs: i64,
    pub spend: f64,
    pub revenue: f64,
}

impl CreateMetricRequest {
    /// Column values, with `now` (unix seconds) as the fallback date
    pub fn into_values(self, now: i64) -> MetricValues {
        let date = self
            .date
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);
        MetricValues {
            channel: self.channel,
            country: self.country,
            date,
            os: self.os,
            impressions: self.impressions,
            clicks: self.clicks,
            installs: self.installs,
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

/// Request body for a partial update; absent fields keep their value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PatchMetricRequest {
    #[validate(length(min = 1, max = 100, message = "channel must be 1-100 characters"))]
    pub channel: Option<String>,

    #[validate(length(min = 1, max = 2, message = "country must be 1-2 characters"))]
    pub country: Option<String>,

    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,

    #[validate(length(min = 1, max = 100, message = "os must be 1-100 characters"))]
    pub os: Option<String>,

    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub installs: Option<i64>,
    pub spend: Option<f64>,
    pub revenue: Option<f64>,
}

impl PatchMetricRequest {
    /// Overlay the present fields onto existing values
    pub fn apply(self, mut values: MetricValues) -> MetricValues {
        if let Some(channel) = self.channel {
            values.channel = channel;
        }
        if let Some(country) = self.country {
            values.country = country;
        }
        if let Some(date) = self.date.as_deref().and_then(parse_timestamp) {
            values.date = date;
        }
        if let Some(os) = self.os {
            values.os = os;
        }
        if let Some(impressions) = self.impressions {
            values.impressions = impressions;
        }
        if let Some(clicks) = self.clicks {
            values.clicks = clicks;
        }
        if let Some(installs) = self.installs {
            values.installs = installs;
        }
        if let Some(spend) = self.spend {
            values.spend = spend;
        }
        if let Some(revenue) = self.revenue {
            values.revenue = revenue;
        }
        values
    }
}

/// Query params for the metric report listing
#[derive(Debug, Deserialize, Validate)]
pub struct ListMetricsQuery {
    #[serde(flatten)]
    pub report: ReportParams,

    /// Comma-separated output fields; unknown names are dropped
    pub fields: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateMetricRequest {
        CreateMetricRequest {
            channel: "facebook".to_string(),
            country: "US".to_string(),
            date: None,
            os: "ios".to_string(),
            impressions: 100,
            clicks: 10,
            installs: 2,
            spend: 5.0,
            revenue: 7.5,
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request().validate().is_ok());

        let mut req = create_request();
        req.country = "USA".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("country"));

        let mut req = create_request();
        req.os = "x".repeat(101);
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.date = Some("yesterday".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_date_defaults_to_now() {
        let values = create_request().into_values(1_700_000_000);
        assert_eq!(values.date, 1_700_000_000);

        let mut req = create_request();
        req.date = Some("2023-01-15".to_string());
        assert_eq!(req.into_values(1_700_000_000).date, 1_673_740_800);
    }

    #[test]
    fn test_patch_applies_present_fields_only() {
        let base = create_request().into_values(1_672_531_200);
        let patch = PatchMetricRequest {
            installs: Some(4),
            channel: Some("google".to_string()),
            ..Default::default()
        };
        let values = patch.apply(base.clone());
        assert_eq!(values.installs, 4);
        assert_eq!(values.channel, "google");
        assert_eq!(values.country, base.country);
        assert_eq!(values.date, base.date);
        assert_eq!(values.spend, base.spend);
    }

    #[test]
    fn test_dto_renders_rfc3339_date() {
        let row = MetricRow::from_values(3, &create_request().into_values(1_672_531_200));
        let dto = MetricDto::from(row);
        assert_eq!(dto.id, 3);
        assert_eq!(dto.date, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_list_query_flattens_report_params() {
        let query: ListMetricsQuery =
            parse_list_query("groupby=channel&fields=channel,cpi&country=");
        assert_eq!(query.report.groupby.as_deref(), Some("channel"));
        assert_eq!(query.report.country.as_deref(), Some(""));
        assert_eq!(query.fields.as_deref(), Some("channel,cpi"));
    }

    fn parse_list_query(raw: &str) -> ListMetricsQuery {
        let uri: axum::http::Uri = format!("/api/v1/metrics?{}", raw).parse().unwrap();
        axum::extract::Query::<ListMetricsQuery>::try_from_uri(&uri)
            .unwrap()
            .0
    }
}
