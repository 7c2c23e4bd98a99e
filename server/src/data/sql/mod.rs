//! SQL dialect layer
//!
//! The report builder writes one statement for both transactional backends
//! (SQLite, PostgreSQL); each dialect supplies placeholders and casts.

mod dialect;
mod postgres_dialect;
mod sqlite_dialect;

pub use dialect::SqlDialect;
pub use postgres_dialect::PostgresDialect;
pub use sqlite_dialect::SqliteDialect;
