//! SQLite schema definitions
//!
//! Initial schema with all tables. No migrations needed for first version.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- Metrics: one advertising performance observation per row
-- =============================================================================
CREATE TABLE IF NOT EXISTS metrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel TEXT NOT NULL CHECK(length(channel) <= 100),
    country TEXT NOT NULL CHECK(length(country) <= 2),
    date INTEGER NOT NULL,
    os TEXT NOT NULL CHECK(length(os) <= 100),
    impressions INTEGER NOT NULL,
    clicks INTEGER NOT NULL,
    installs INTEGER NOT NULL,
    spend REAL NOT NULL,
    revenue REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_metrics_date ON metrics(date);
CREATE INDEX IF NOT EXISTS idx_metrics_country ON metrics(country);
CREATE INDEX IF NOT EXISTS idx_metrics_channel ON metrics(channel);
CREATE INDEX IF NOT EXISTS idx_metrics_os ON metrics(os);
"#;
