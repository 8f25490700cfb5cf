//! Sidechat configuration system.
//!
//! TOML-based configuration for the model endpoint, the web-search tool,
//! chat behaviour and logging. All sections use defaults so partial
//! configs work out of the box; credentials may come from the environment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = sidechat_config::load_config().expect("failed to load config");
//! println!("model: {}", config.gemini.model);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_env_overrides, load_dotenv};
pub use schema::{mask_secret, ChatConfig, GeminiConfig, LogLevel, LoggingConfig, SearchConfig, SidechatConfig};

use sidechat_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, apply environment
/// overrides and validate the result.
pub fn load_config() -> Result<SidechatConfig, ConfigError> {
    let mut config = toml_loader::load_default()?;
    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Same as [`load_config`] but from an explicit file.
pub fn load_config_from(path: &Path) -> Result<SidechatConfig, ConfigError> {
    let mut config = toml_loader::load_from_path(path)?;
    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with secrets masked.
pub fn config_to_json(config: &SidechatConfig) -> String {
    let mut masked = config.clone();
    masked.gemini.api_key = mask_secret(&config.gemini.api_key).into();
    masked.search.api_key = mask_secret(&config.search.api_key).into();
    serde_json::to_string_pretty(&masked)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
