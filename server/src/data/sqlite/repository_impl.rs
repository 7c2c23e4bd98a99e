//! MetricRepository trait implementation for SQLite
//!
//! This module implements the MetricRepository trait for Arc<SqliteService>,
//! providing a unified interface for metric operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::report::ReportQuery;
use crate::data::traits::MetricRepository;
use crate::data::types::{MetricRow, MetricValues, ReportRow};

use super::SqliteService;
use super::repositories::metric;

#[async_trait]
impl MetricRepository for Arc<SqliteService> {
    async fn create_metric(&self, values: &MetricValues) -> Result<MetricRow, DataError> {
        metric::create_metric(self.pool(), values)
            .await
            .map_err(Into::into)
    }

    async fn get_metric(&self, id: i64) -> Result<Option<MetricRow>, DataError> {
        metric::get_metric(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn update_metric(
        &self,
        id: i64,
        values: &MetricValues,
    ) -> Result<Option<MetricRow>, DataError> {
        metric::update_metric(self.pool(), id, values)
            .await
            .map_err(Into::into)
    }

    async fn delete_metric(&self, id: i64) -> Result<bool, DataError> {
        metric::delete_metric(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn report(&self, query: &ReportQuery) -> Result<Vec<ReportRow>, DataError> {
        metric::report(self.pool(), query).await.map_err(Into::into)
    }
}
