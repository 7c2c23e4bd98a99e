//! Report query parameters
//!
//! [`ReportParams`] is the raw request shape. [`ReportQuery::from_params`]
//! validates it into an immutable query the SQL builder can trust.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use super::error::ReportError;
use super::fields::{MetricField, SortColumn};

const SECONDS_PER_DAY: i64 = 86_400;

/// Raw report parameters as received in the query string
///
/// A parameter that is present but empty is still present: `country=`
/// filters by the empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    pub sums: Option<String>,
    pub groupby: Option<String>,
    pub sort_value: Option<String>,
    pub sort_direction: Option<String>,
    pub country: Option<String>,
    pub os: Option<String>,
    pub channel: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Row filters, AND-ed together. `None` applies no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Inclusive lower bound (unix seconds)
    pub date_from: Option<i64>,
    /// Inclusive upper bound (unix seconds)
    pub date_to: Option<i64>,
    pub country: Option<String>,
    pub os: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Ascending only for `asc` (any case); anything else sorts descending
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// A validated report query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportQuery {
    pub filter: FilterSpec,
    /// Grouping fields, deduplicated, in table column order
    pub group_by: Vec<MetricField>,
    /// Optionally summed fields, never including spend or installs
    pub sums: Vec<MetricField>,
    pub sort: Option<SortSpec>,
}

impl ReportQuery {
    pub fn from_params(params: &ReportParams) -> Result<Self, ReportError> {
        let filter = FilterSpec {
            date_from: params
                .date_from
                .as_deref()
                .map(|v| parse_date_bound("date_from", v, DateBound::Start))
                .transpose()?,
            date_to: params
                .date_to
                .as_deref()
                .map(|v| parse_date_bound("date_to", v, DateBound::End))
                .transpose()?,
            country: params.country.clone(),
            os: params.os.clone(),
            channel: params.channel.clone(),
        };

        let group_by = match params.groupby.as_deref() {
            Some(raw) => parse_field_list("groupby", raw)?,
            None => Vec::new(),
        };
        if let Some(field) = group_by.iter().find(|f| f.is_always_summed()) {
            return Err(ReportError::FieldConflict(field.to_string()));
        }

        let mut sums = Vec::new();
        if let Some(raw) = params.sums.as_deref() {
            for field in parse_field_list("sums", raw)? {
                if field.is_always_summed() {
                    continue;
                }
                if !field.is_numeric() {
                    return Err(ReportError::NotSummable(field.to_string()));
                }
                if group_by.contains(&field) {
                    return Err(ReportError::FieldConflict(field.to_string()));
                }
                sums.push(field);
            }
        }

        let mut query = Self {
            filter,
            group_by,
            sums,
            sort: None,
        };

        if let Some(raw) = params.sort_value.as_deref() {
            let name = raw.trim();
            let column = SortColumn::parse(name).ok_or_else(|| ReportError::UnknownField {
                param: "sort_value",
                field: name.to_string(),
            })?;
            if let SortColumn::Field(field) = column
                && !query.carries(field)
            {
                return Err(ReportError::NotSortable(field.to_string()));
            }
            query.sort = Some(SortSpec {
                column,
                direction: SortDirection::parse(params.sort_direction.as_deref()),
            });
        }

        Ok(query)
    }

    /// Whether result rows carry a value for this field
    pub fn carries(&self, field: MetricField) -> bool {
        field.is_always_summed() || self.group_by.contains(&field) || self.sums.contains(&field)
    }
}

/// Parse a comma-separated field list
///
/// Empty segments are skipped and duplicates collapse. The result is in
/// table column order so the generated SQL does not depend on input order.
fn parse_field_list(param: &'static str, raw: &str) -> Result<Vec<MetricField>, ReportError> {
    let mut fields = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            MetricField::parse(name).ok_or_else(|| ReportError::UnknownField {
                param,
                field: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    fields.sort();
    fields.dedup();
    Ok(fields)
}

#[derive(Debug, Clone, Copy)]
enum DateBound {
    Start,
    End,
}

/// Parse a date filter value into unix seconds
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare date. A bare
/// date as an upper bound covers the whole day.
fn parse_date_bound(param: &'static str, value: &str, bound: DateBound) -> Result<i64, ReportError> {
    let v = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Ok(dt.timestamp());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Ok(ndt.and_utc().timestamp());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(v, "%Y-%m-%d") {
        let start = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        return Ok(match bound {
            DateBound::Start => start,
            DateBound::End => start + SECONDS_PER_DAY - 1,
        });
    }

    Err(ReportError::InvalidDate {
        param,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ReportParams {
        ReportParams::default()
    }

    #[test]
    fn test_empty_params() {
        let query = ReportQuery::from_params(&params()).unwrap();
        assert_eq!(query, ReportQuery::default());
    }

    #[test]
    fn test_date_only_bounds_cover_whole_days() {
        let query = ReportQuery::from_params(&ReportParams {
            date_from: Some("2023-01-01".into()),
            date_to: Some("2023-01-31".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.filter.date_from, Some(1_672_531_200));
        assert_eq!(query.filter.date_to, Some(1_675_209_599));
    }

    #[test]
    fn test_rfc3339_and_naive_datetimes() {
        let query = ReportQuery::from_params(&ReportParams {
            date_from: Some("2023-01-01T12:00:00+02:00".into()),
            date_to: Some("2023-01-02 00:00:00".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.filter.date_from, Some(1_672_567_200));
        assert_eq!(query.filter.date_to, Some(1_672_617_600));
    }

    #[test]
    fn test_invalid_date() {
        let err = ReportQuery::from_params(&ReportParams {
            date_to: Some("31/01/2023".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_DATE");
    }

    #[test]
    fn test_empty_string_filters_are_present() {
        let query = ReportQuery::from_params(&ReportParams {
            country: Some(String::new()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.filter.country.as_deref(), Some(""));
        assert_eq!(query.filter.os, None);
    }

    #[test]
    fn test_groupby_dedup_and_order() {
        let query = ReportQuery::from_params(&ReportParams {
            groupby: Some("os, channel,,os,".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.group_by, vec![MetricField::Channel, MetricField::Os]);
    }

    #[test]
    fn test_groupby_unknown_field() {
        let err = ReportQuery::from_params(&ReportParams {
            groupby: Some("channel,platform".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ReportError::UnknownField {
                param: "groupby",
                field: "platform".to_string()
            }
        );
    }

    #[test]
    fn test_groupby_always_summed_field_conflicts() {
        let err = ReportQuery::from_params(&ReportParams {
            groupby: Some("spend".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err, ReportError::FieldConflict("spend".to_string()));
    }

    #[test]
    fn test_sums_skip_spend_and_installs() {
        let query = ReportQuery::from_params(&ReportParams {
            sums: Some("spend,impressions,installs,revenue".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(
            query.sums,
            vec![MetricField::Impressions, MetricField::Revenue]
        );
    }

    #[test]
    fn test_sums_reject_non_numeric() {
        let err = ReportQuery::from_params(&ReportParams {
            sums: Some("country".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err, ReportError::NotSummable("country".to_string()));
    }

    #[test]
    fn test_sums_conflict_with_groupby() {
        let err = ReportQuery::from_params(&ReportParams {
            groupby: Some("clicks".into()),
            sums: Some("clicks".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.code(), "FIELD_CONFLICT");
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("up")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn test_sort_by_cpi_defaults_descending() {
        let query = ReportQuery::from_params(&ReportParams {
            sort_value: Some("cpi".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(
            query.sort,
            Some(SortSpec {
                column: SortColumn::Cpi,
                direction: SortDirection::Desc
            })
        );
    }

    #[test]
    fn test_sort_by_field_not_in_result() {
        let err = ReportQuery::from_params(&ReportParams {
            groupby: Some("channel".into()),
            sort_value: Some("date".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err, ReportError::NotSortable("date".to_string()));

        let ok = ReportQuery::from_params(&ReportParams {
            groupby: Some("channel".into()),
            sort_value: Some("channel".into()),
            sort_direction: Some("asc".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(ok.sort.map(|s| s.direction), Some(SortDirection::Asc));
    }

    #[test]
    fn test_sort_unknown_field() {
        let err = ReportQuery::from_params(&ReportParams {
            sort_value: Some("".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_FIELD");
    }
}
