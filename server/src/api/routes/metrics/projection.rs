//! Output field selection for report rows
//!
//! Every row serializes the same ordered field set, restricted by the
//! `fields` parameter. Fields a row does not carry are `null`.

use serde_json::{Map, Value};

use crate::api::types::format_timestamp;
use crate::data::types::ReportRow;

/// Output fields in serialization order
pub const OUTPUT_FIELDS: [&str; 10] = [
    "country",
    "date",
    "os",
    "channel",
    "impressions",
    "clicks",
    "revenue",
    "cpi",
    "spend",
    "installs",
];

/// The subset of [`OUTPUT_FIELDS`] to serialize, kept in output order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection(Vec<&'static str>);

impl FieldSelection {
    /// Parse a comma-separated `fields` value
    ///
    /// Absent or empty selects everything; unknown names are ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let requested: Vec<&str> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        if requested.is_empty() {
            return Self(OUTPUT_FIELDS.to_vec());
        }

        Self(
            OUTPUT_FIELDS
                .into_iter()
                .filter(|field| requested.contains(field))
                .collect(),
        )
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.0
    }

    pub fn project(&self, row: &ReportRow) -> Map<String, Value> {
        self.0
            .iter()
            .map(|&field| (field.to_string(), field_value(row, field)))
            .collect()
    }
}

fn field_value(row: &ReportRow, field: &str) -> Value {
    match field {
        "country" => row.country.clone().into(),
        "date" => row.date.map(format_timestamp).into(),
        "os" => row.os.clone().into(),
        "channel" => row.channel.clone().into(),
        "impressions" => row.impressions.into(),
        "clicks" => row.clicks.into(),
        "revenue" => row.revenue.into(),
        "cpi" => row.cpi.into(),
        "spend" => row.spend.into(),
        "installs" => row.installs.into(),
        _ => Value::Null,
    }
}
