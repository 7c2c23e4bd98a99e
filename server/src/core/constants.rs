// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "AdReport";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "adreport";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".adreport";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "adreport.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "ADREPORT_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "ADREPORT_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "ADREPORT_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "ADREPORT_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "ADREPORT_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default request body limit (metric records are small)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "ADREPORT_DATA_DIR";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the database backend (sqlite or postgres)
pub const ENV_DATABASE_BACKEND: &str = "ADREPORT_DATABASE_BACKEND";

/// Environment variable for the PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "ADREPORT_POSTGRES_URL";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "adreport.db";

/// Maximum pooled SQLite connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 8;

/// Busy timeout for locked database (seconds)
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

/// Page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// WAL pages before automatic checkpoint
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between background WAL checkpoints (seconds)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// PostgreSQL Database
// =============================================================================

pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between PostgreSQL health checks (seconds)
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
