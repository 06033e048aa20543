//! One module per subcommand.

pub mod ask;
pub mod doctor;
pub mod init;
pub mod serve;
pub mod status;

use ecowatt_config::AppConfig;
use std::path::{Path, PathBuf};

/// The config file a command should read.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path)
}

/// Load the config file plus environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = resolve_path(explicit);
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}
