//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn float_type(&self) -> &'static str {
        "REAL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(5), "?");
    }

    #[test]
    fn test_casts() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.cast_to_float("SUM(\"spend\")"),
            "CAST(SUM(\"spend\") AS REAL)"
        );
        assert_eq!(
            dialect.cast_to_bigint("SUM(\"clicks\")"),
            "CAST(SUM(\"clicks\") AS BIGINT)"
        );
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(SqliteDialect.quote_ident("date"), "\"date\"");
    }
}
