//! Repository traits for database backends
//!
//! This module defines the trait that provides a unified interface for metric
//! operations across the SQLite and PostgreSQL backends.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::report::ReportQuery;
use crate::data::types::{MetricRow, MetricValues, ReportRow};

/// Repository trait for metric records and reports
///
/// Implemented by SQLite and PostgreSQL backends.
#[async_trait]
pub trait MetricRepository: Send + Sync {
    // ==================== Record Operations ====================

    /// Insert a metric row and return it with its assigned id
    async fn create_metric(&self, values: &MetricValues) -> Result<MetricRow, DataError>;

    /// Get a metric row by id
    async fn get_metric(&self, id: i64) -> Result<Option<MetricRow>, DataError>;

    /// Replace every column of a metric row. Returns `None` if it does not exist.
    async fn update_metric(
        &self,
        id: i64,
        values: &MetricValues,
    ) -> Result<Option<MetricRow>, DataError>;

    /// Delete a metric row. Returns whether a row was removed.
    async fn delete_metric(&self, id: i64) -> Result<bool, DataError>;

    // ==================== Report Operations ====================

    /// Run an aggregate report
    ///
    /// Fails with [`DataError::DivisionByZero`] when a result row has an
    /// installs sum of 0.
    async fn report(&self, query: &ReportQuery) -> Result<Vec<ReportRow>, DataError>;
}
