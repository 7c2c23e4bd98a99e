//! PostgreSQL repositories
//!
//! Types (MetricRow, ReportRow) should be imported from `crate::data::types`.

pub mod metric;

pub use metric::{create_metric, delete_metric, get_metric, report, update_metric};
