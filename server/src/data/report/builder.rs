//! SQL builder for report queries
//!
//! Produces one `SELECT` over `metrics`:
//! filters → GROUP BY → optional sums → spend, installs, cpi → ORDER BY.
//! Identifiers come only from [`MetricField`]; values are always bound.

use crate::data::sql::SqlDialect;

use super::fields::{CPI_ALIAS, MetricField, RECORD_COUNT_ALIAS};
use super::query::ReportQuery;

/// A value bound to a report query placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

/// Generated SQL with its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSql {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

struct Params<'d> {
    dialect: &'d dyn SqlDialect,
    values: Vec<SqlValue>,
}

impl Params<'_> {
    fn push(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        self.dialect.placeholder(self.values.len())
    }
}

pub fn build_report_sql(query: &ReportQuery, dialect: &dyn SqlDialect) -> ReportSql {
    let mut columns: Vec<String> = Vec::new();

    for field in &query.group_by {
        columns.push(dialect.quote_ident(field.column()));
    }

    for field in &query.sums {
        columns.push(format!(
            "{} AS {}",
            sum_expr(*field, dialect),
            dialect.quote_ident(field.column())
        ));
    }

    let spend_sum = sum_expr(MetricField::Spend, dialect);
    let installs_sum = dialect.cast_to_float(&format!(
        "SUM({})",
        dialect.quote_ident(MetricField::Installs.column())
    ));
    columns.push(format!(
        "{} AS {}",
        spend_sum,
        dialect.quote_ident(MetricField::Spend.column())
    ));
    columns.push(format!(
        "{} AS {}",
        installs_sum,
        dialect.quote_ident(MetricField::Installs.column())
    ));
    // NULL when the installs sum is 0; rejected when rows are read
    columns.push(format!(
        "{} / NULLIF({}, 0) AS {}",
        spend_sum,
        installs_sum,
        dialect.quote_ident(CPI_ALIAS)
    ));
    columns.push(format!(
        "COUNT(*) AS {}",
        dialect.quote_ident(RECORD_COUNT_ALIAS)
    ));

    let mut sql = format!("SELECT {} FROM metrics", columns.join(", "));

    let mut params = Params {
        dialect,
        values: Vec::new(),
    };
    let conditions = build_conditions(query, &mut params);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if !query.group_by.is_empty() {
        let keys: Vec<String> = query
            .group_by
            .iter()
            .map(|f| dialect.quote_ident(f.column()))
            .collect();
        sql.push_str(" GROUP BY ");
        sql.push_str(&keys.join(", "));
    }

    if let Some(sort) = &query.sort {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            dialect.quote_ident(sort.column.alias()),
            sort.direction.as_sql()
        ));
    }

    tracing::trace!(dialect = dialect.name(), "Built report SQL");

    ReportSql {
        sql,
        binds: params.values,
    }
}

fn sum_expr(field: MetricField, dialect: &dyn SqlDialect) -> String {
    let sum = format!("SUM({})", dialect.quote_ident(field.column()));
    if field.is_integer() {
        dialect.cast_to_bigint(&sum)
    } else {
        dialect.cast_to_float(&sum)
    }
}

fn build_conditions(query: &ReportQuery, params: &mut Params<'_>) -> Vec<String> {
    let filter = &query.filter;
    let date = params.dialect.quote_ident(MetricField::Date.column());
    let mut conditions = Vec::new();

    match (filter.date_from, filter.date_to) {
        (Some(from), Some(to)) => {
            let lo = params.push(SqlValue::Int(from));
            let hi = params.push(SqlValue::Int(to));
            conditions.push(format!("{} BETWEEN {} AND {}", date, lo, hi));
        }
        (Some(from), None) => {
            let p = params.push(SqlValue::Int(from));
            conditions.push(format!("{} >= {}", date, p));
        }
        (None, Some(to)) => {
            let p = params.push(SqlValue::Int(to));
            conditions.push(format!("{} <= {}", date, p));
        }
        (None, None) => {}
    }

    let text_filters = [
        (MetricField::Channel, &filter.channel),
        (MetricField::Os, &filter.os),
        (MetricField::Country, &filter.country),
    ];
    for (field, value) in text_filters {
        if let Some(value) = value {
            let col = params.dialect.quote_ident(field.column());
            let p = params.push(SqlValue::Text(value.clone()));
            conditions.push(format!("{} = {}", col, p));
        }
    }

    conditions
}
