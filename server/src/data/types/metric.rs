//! Metric record types shared by the transactional backends

use serde::{Deserialize, Serialize};

/// Metric row from database
///
/// `date` is stored as unix seconds (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub id: i64,
    pub channel: String,
    pub country: String,
    pub date: i64,
    pub os: String,
    pub impressions: i64,
    pub clicks: i64,
    pub installs: i64,
    pub spend: f64,
    pub revenue: f64,
}

/// Column values for inserting or replacing a metric row
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValues {
    pub channel: String,
    pub country: String,
    pub date: i64,
    pub os: String,
    pub impressions: i64,
    pub clicks: i64,
    pub installs: i64,
    pub spend: f64,
    pub revenue: f64,
}

impl MetricRow {
    /// Attach a store-assigned id to inserted values
    pub fn from_values(id: i64, values: &MetricValues) -> Self {
        Self {
            id,
            channel: values.channel.clone(),
            country: values.country.clone(),
            date: values.date,
            os: values.os.clone(),
            impressions: values.impressions,
            clicks: values.clicks,
            installs: values.installs,
            spend: values.spend,
            revenue: values.revenue,
        }
    }

    /// Current column values, used as the base of a partial update
    pub fn values(&self) -> MetricValues {
        MetricValues {
            channel: self.channel.clone(),
            country: self.country.clone(),
            date: self.date,
            os: self.os.clone(),
            impressions: self.impressions,
            clicks: self.clicks,
            installs: self.installs,
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

/// Tuple shape of a `SELECT id, channel, ... FROM metrics` row
pub type MetricTuple = (i64, String, String, i64, String, i64, i64, i64, f64, f64);

impl From<MetricTuple> for MetricRow {
    fn from(
        (id, channel, country, date, os, impressions, clicks, installs, spend, revenue): MetricTuple,
    ) -> Self {
        Self {
            id,
            channel,
            country,
            date,
            os,
            impressions,
            clicks,
            installs,
            spend,
            revenue,
        }
    }
}

/// Column list matching [`MetricTuple`]
pub const METRIC_COLUMNS: &str =
    "id, channel, country, date, os, impressions, clicks, installs, spend, revenue";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_values_round_trip() {
        let row = MetricRow {
            id: 7,
            channel: "facebook".to_string(),
            country: "US".to_string(),
            date: 1_672_531_200,
            os: "ios".to_string(),
            impressions: 1000,
            clicks: 50,
            installs: 5,
            spend: 12.5,
            revenue: 30.0,
        };
        assert_eq!(MetricRow::from_values(7, &row.values()), row);
    }
}
