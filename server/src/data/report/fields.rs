//! Field whitelist for report queries
//!
//! Request parameters name fields as free text. Only names that parse into a
//! [`MetricField`] or [`SortColumn`] are ever written into SQL.

use std::fmt;

/// A column of the `metrics` table that reports can group, sum or sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricField {
    Channel,
    Country,
    Date,
    Os,
    Impressions,
    Clicks,
    Installs,
    Spend,
    Revenue,
}

impl MetricField {
    /// All fields in table column order
    pub const ALL: [MetricField; 9] = [
        MetricField::Channel,
        MetricField::Country,
        MetricField::Date,
        MetricField::Os,
        MetricField::Impressions,
        MetricField::Clicks,
        MetricField::Installs,
        MetricField::Spend,
        MetricField::Revenue,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "channel" => Some(Self::Channel),
            "country" => Some(Self::Country),
            "date" => Some(Self::Date),
            "os" => Some(Self::Os),
            "impressions" => Some(Self::Impressions),
            "clicks" => Some(Self::Clicks),
            "installs" => Some(Self::Installs),
            "spend" => Some(Self::Spend),
            "revenue" => Some(Self::Revenue),
            _ => None,
        }
    }

    /// Column name in the `metrics` table
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Country => "country",
            Self::Date => "date",
            Self::Os => "os",
            Self::Impressions => "impressions",
            Self::Clicks => "clicks",
            Self::Installs => "installs",
            Self::Spend => "spend",
            Self::Revenue => "revenue",
        }
    }

    /// Whether the column can be summed
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Impressions | Self::Clicks | Self::Installs | Self::Spend | Self::Revenue
        )
    }

    /// Integer columns sum to BIGINT, the rest to double precision
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Impressions | Self::Clicks | Self::Installs)
    }

    /// Fields every report aggregates regardless of the `sums` parameter
    pub const fn is_always_summed(&self) -> bool {
        matches!(self, Self::Spend | Self::Installs)
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Output column a report can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Field(MetricField),
    Cpi,
}

impl SortColumn {
    pub fn parse(name: &str) -> Option<Self> {
        if name == CPI_ALIAS {
            return Some(Self::Cpi);
        }
        MetricField::parse(name).map(Self::Field)
    }

    /// Output alias the ORDER BY clause refers to
    pub const fn alias(&self) -> &'static str {
        match self {
            Self::Field(field) => field.column(),
            Self::Cpi => CPI_ALIAS,
        }
    }
}

/// Alias of the derived cost-per-install column
pub const CPI_ALIAS: &str = "cpi";

/// Alias of the matched-row count carried by every report row
pub const RECORD_COUNT_ALIAS: &str = "record_count";
