//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Floating point type names
/// - Aggregate result types
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Name of the double precision floating point type
    ///
    /// - SQLite: `REAL`
    /// - PostgreSQL: `DOUBLE PRECISION`
    fn float_type(&self) -> &'static str;

    /// Quote an identifier. Both backends accept ANSI double quotes.
    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident)
    }

    /// Cast an expression to the double precision type
    fn cast_to_float(&self, expr: &str) -> String {
        format!("CAST({} AS {})", expr, self.float_type())
    }

    /// Cast an expression to a 64-bit integer
    ///
    /// PostgreSQL widens `SUM(BIGINT)` to NUMERIC, so integer sums are
    /// narrowed back to BIGINT on both backends.
    fn cast_to_bigint(&self, expr: &str) -> String {
        format!("CAST({} AS BIGINT)", expr)
    }
}
