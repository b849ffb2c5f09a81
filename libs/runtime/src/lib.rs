//! Process-level plumbing shared by the server binary: layered configuration
//! and subsystem-routed logging.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig, IN_MEMORY_DSN,
};
