pub mod config;
pub mod logging;
pub mod paths;

pub use config::{default_logging_config, AppConfig, CliArgs, LoggingConfig, Section, StorageConfig};
pub use paths::home_dir::{resolve_home_dir, HomeDirError};
