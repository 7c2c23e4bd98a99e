//! Metric repository for SQLite operations

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::data::report::{
    CPI_ALIAS, MetricField, RECORD_COUNT_ALIAS, ReportQuery, SqlValue, build_report_sql,
};
use crate::data::sql::SqliteDialect;
use crate::data::sqlite::SqliteError;
use crate::data::types::{METRIC_COLUMNS, MetricRow, MetricTuple, MetricValues, ReportRow};

/// Insert a metric row
pub async fn create_metric(
    pool: &SqlitePool,
    values: &MetricValues,
) -> Result<MetricRow, SqliteError> {
    let result = sqlx::query(
        "INSERT INTO metrics (channel, country, date, os, impressions, clicks, installs, spend, revenue) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&values.channel)
    .bind(&values.country)
    .bind(values.date)
    .bind(&values.os)
    .bind(values.impressions)
    .bind(values.clicks)
    .bind(values.installs)
    .bind(values.spend)
    .bind(values.revenue)
    .execute(pool)
    .await?;

    Ok(MetricRow::from_values(result.last_insert_rowid(), values))
}

/// Get a metric row by id
pub async fn get_metric(pool: &SqlitePool, id: i64) -> Result<Option<MetricRow>, SqliteError> {
    let row = sqlx::query_as::<_, MetricTuple>(&format!(
        "SELECT {} FROM metrics WHERE id = ?",
        METRIC_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(MetricRow::from))
}

/// Replace all columns of a metric row
pub async fn update_metric(
    pool: &SqlitePool,
    id: i64,
    values: &MetricValues,
) -> Result<Option<MetricRow>, SqliteError> {
    let result = sqlx::query(
        "UPDATE metrics SET channel = ?, country = ?, date = ?, os = ?, impressions = ?, clicks = ?, installs = ?, spend = ?, revenue = ? WHERE id = ?",
    )
    .bind(&values.channel)
    .bind(&values.country)
    .bind(values.date)
    .bind(&values.os)
    .bind(values.impressions)
    .bind(values.clicks)
    .bind(values.installs)
    .bind(values.spend)
    .bind(values.revenue)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(MetricRow::from_values(id, values)))
}

/// Delete a metric row
pub async fn delete_metric(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM metrics WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Run an aggregate report
pub async fn report(
    pool: &SqlitePool,
    query: &ReportQuery,
) -> Result<Vec<ReportRow>, SqliteError> {
    let built = build_report_sql(query, &SqliteDialect);
    tracing::debug!(sql = %built.sql, binds = ?built.binds, "Report query");

    let mut q = sqlx::query(&built.sql);
    for value in &built.binds {
        q = match value {
            SqlValue::Text(s) => q.bind(s.as_str()),
            SqlValue::Int(i) => q.bind(*i),
        };
    }
    let rows = q.fetch_all(pool).await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(report_row) = map_report_row(row, query)? {
            out.push(report_row);
        }
    }
    Ok(out)
}

/// Map one result row. An ungrouped query over no records yields a single
/// row with a zero count, which is dropped.
fn map_report_row(row: &SqliteRow, query: &ReportQuery) -> Result<Option<ReportRow>, SqliteError> {
    let record_count: i64 = row.try_get(RECORD_COUNT_ALIAS)?;
    if record_count == 0 {
        return Ok(None);
    }

    let cpi: Option<f64> = row.try_get(CPI_ALIAS)?;
    let cpi = cpi.ok_or(SqliteError::DivisionByZero)?;

    let text = |field: MetricField| -> Result<Option<String>, sqlx::Error> {
        if query.carries(field) {
            row.try_get(field.column())
        } else {
            Ok(None)
        }
    };
    let int = |field: MetricField| -> Result<Option<i64>, sqlx::Error> {
        if query.carries(field) {
            row.try_get(field.column())
        } else {
            Ok(None)
        }
    };
    let float = |field: MetricField| -> Result<Option<f64>, sqlx::Error> {
        if query.carries(field) {
            row.try_get(field.column())
        } else {
            Ok(None)
        }
    };

    Ok(Some(ReportRow {
        country: text(MetricField::Country)?,
        date: int(MetricField::Date)?,
        os: text(MetricField::Os)?,
        channel: text(MetricField::Channel)?,
        impressions: int(MetricField::Impressions)?,
        clicks: int(MetricField::Clicks)?,
        revenue: float(MetricField::Revenue)?,
        spend: float(MetricField::Spend)?.unwrap_or(0.0),
        installs: float(MetricField::Installs)?.unwrap_or(0.0),
        cpi,
    }))
}
