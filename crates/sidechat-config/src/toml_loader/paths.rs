//! Where the config file lives, and seeding it on first run.

use std::path::{Path, PathBuf};

use sidechat_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "sidechat";
const CONFIG_FILE: &str = "config.toml";

/// `<config_dir>/sidechat/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, default_config_toml()).map_err(write_err)?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}
