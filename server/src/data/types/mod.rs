//! Shared data types for all database backends
//!
//! This module contains types that are used across the transactional
//! backends (SQLite, PostgreSQL) to ensure consistent data models.

mod metric;
mod report;

pub use metric::{METRIC_COLUMNS, MetricRow, MetricTuple, MetricValues};
pub use report::ReportRow;
