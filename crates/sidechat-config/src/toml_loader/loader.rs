//! Reading `SidechatConfig` from TOML.

use std::io::ErrorKind;
use std::path::Path;

use sidechat_common::ConfigError;
use tracing::{debug, info};

use crate::schema::SidechatConfig;

use super::paths::{create_default_config, default_config_path};

/// Parse the file at `path`. Absent keys keep their defaults.
///
/// No validation happens here: environment overrides still need to fill
/// in credentials.
pub fn load_from_path(path: &Path) -> Result<SidechatConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let config = parse_config(path, &content)?;
    debug!(path = %path.display(), "config parsed");
    Ok(config)
}

fn parse_config(path: &Path, content: &str) -> Result<SidechatConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

/// Load the platform config file, seeding it with the template on first run.
pub fn load_default() -> Result<SidechatConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "no config file yet");
            create_default_config(&path)?;
            Ok(SidechatConfig::default())
        }
        other => other,
    }
}
