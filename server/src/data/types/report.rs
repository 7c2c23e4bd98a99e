//! Aggregated report row returned by the report query

/// One aggregated row
///
/// Dimension and optionally-summed columns are `None` when the query neither
/// grouped nor summed them. `spend`, `installs` and `cpi` are always present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    pub country: Option<String>,
    pub date: Option<i64>,
    pub os: Option<String>,
    pub channel: Option<String>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub revenue: Option<f64>,
    pub spend: f64,
    pub installs: f64,
    pub cpi: f64,
}
