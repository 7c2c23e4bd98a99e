//! Report parameter errors

use thiserror::Error;

/// A report request that cannot be turned into a query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Unknown field '{field}' in {param}")]
    UnknownField { param: &'static str, field: String },

    #[error("Field '{0}' is not numeric and cannot be summed")]
    NotSummable(String),

    #[error("Field '{0}' cannot be both grouped and aggregated")]
    FieldConflict(String),

    #[error("Cannot sort by '{0}': it is neither grouped nor aggregated")]
    NotSortable(String),

    #[error("Invalid date for {param}: '{value}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate { param: &'static str, value: String },
}

impl ReportError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::NotSummable(_) => "NOT_SUMMABLE",
            Self::FieldConflict(_) => "FIELD_CONFLICT",
            Self::NotSortable(_) => "NOT_SORTABLE",
            Self::InvalidDate { .. } => "INVALID_DATE",
        }
    }
}
