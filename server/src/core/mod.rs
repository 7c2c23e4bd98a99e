//! Core application infrastructure

pub(crate) mod banner;
pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;
pub mod storage;

pub use crate::app::CoreApp;
pub use cli::{CliConfig, Commands};
pub use config::{AppConfig, DatabaseBackend, ServerConfig};
pub use storage::{AppStorage, DataSubdir};

// Re-export service enum from data layer
pub use crate::data::DatabaseService;
pub use shutdown::ShutdownService;
