//! Report query layer
//!
//! Turns request parameters into a single aggregate query over `metrics`:
//! - `query` - raw parameters and their validated [`ReportQuery`] form
//! - `fields` - whitelist of groupable, summable and sortable fields
//! - `builder` - dialect-aware SQL generation with bound values
//! - `error` - parameter validation errors

pub mod builder;
pub mod error;
pub mod fields;
pub mod query;

pub use builder::{ReportSql, SqlValue, build_report_sql};
pub use error::ReportError;
pub use fields::{CPI_ALIAS, MetricField, RECORD_COUNT_ALIAS, SortColumn};
pub use query::{FilterSpec, ReportParams, ReportQuery, SortDirection, SortSpec};
