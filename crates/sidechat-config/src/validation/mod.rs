//! Configuration validation.
//!
//! Each check pushes onto a shared error list; the caller gets a single
//! `ConfigError` naming every problem.

mod helpers;


use crate::schema::SidechatConfig;
use sidechat_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_url};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SidechatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_non_empty(&mut errors, "gemini.model", &config.gemini.model);
    validate_url(&mut errors, "gemini.base_url", &config.gemini.base_url);

    validate_url(&mut errors, "search.base_url", &config.search.base_url);
    validate_range(&mut errors, "search.max_results", config.search.max_results, 1, 10);

    validate_non_empty(&mut errors, "chat.session_key", &config.chat.session_key);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(errors.join("; ")))
    }
}
