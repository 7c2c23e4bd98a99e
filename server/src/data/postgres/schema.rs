//! PostgreSQL schema definitions
//!
//! Initial schema with all tables. Compatible with SQLite schema structure.
//! Integer columns are BIGINT so rows decode into `i64` on both backends.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL for PostgreSQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at BIGINT NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms BIGINT,
    success BOOLEAN NOT NULL DEFAULT TRUE
);

-- =============================================================================
-- Metrics: one advertising performance observation per row
-- =============================================================================
CREATE TABLE IF NOT EXISTS metrics (
    id BIGSERIAL PRIMARY KEY,
    channel VARCHAR(100) NOT NULL,
    country VARCHAR(2) NOT NULL,
    date BIGINT NOT NULL,
    os VARCHAR(100) NOT NULL,
    impressions BIGINT NOT NULL,
    clicks BIGINT NOT NULL,
    installs BIGINT NOT NULL,
    spend DOUBLE PRECISION NOT NULL,
    revenue DOUBLE PRECISION NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_metrics_date ON metrics(date);
CREATE INDEX IF NOT EXISTS idx_metrics_country ON metrics(country);
CREATE INDEX IF NOT EXISTS idx_metrics_channel ON metrics(channel);
CREATE INDEX IF NOT EXISTS idx_metrics_os ON metrics(os);
"#;
