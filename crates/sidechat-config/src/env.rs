//! Environment-based credential overrides.

use std::path::Path;

use tracing::debug;

use crate::schema::SidechatConfig;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const SEARCH_API_KEY_VAR: &str = "GOOGLE_SEARCH_API_KEY";
pub const SEARCH_ENGINE_ID_VAR: &str = "CUSTOM_SEARCH_ENGINE_ID";

/// Load `KEY=VALUE` lines from a `.env` file into the process
/// environment. Variables that are already set win.
pub fn load_dotenv(path: &Path) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var(&key).is_err() {
            std::env::set_var(&key, value);
        }
    }
    debug!("loaded environment from {}", path.display());
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

/// Fill empty or placeholder credential fields from the process environment.
pub fn apply_env_overrides(config: &mut SidechatConfig) {
    apply_overrides_with(config, |name| std::env::var(name).ok());
}

pub(crate) fn apply_overrides_with(
    config: &mut SidechatConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let fields = [
        (GEMINI_API_KEY_VAR, &mut config.gemini.api_key),
        (SEARCH_API_KEY_VAR, &mut config.search.api_key),
        (SEARCH_ENGINE_ID_VAR, &mut config.search.engine_id),
    ];
    for (var, field) in fields {
        if is_placeholder(field.as_str()) {
            debug!(var, "ignoring placeholder credential in config file");
            field.clear();
        }
        if !field.trim().is_empty() {
            continue;
        }
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty() && !is_placeholder(v)) {
            debug!(var, "credential taken from environment");
            *field = value;
        }
    }
}

/// Template values such as `YOUR_GEMINI_API_KEY` or `<api key>`.
pub(crate) fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    let your_prefix = value.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("your_"));
    your_prefix || (value.len() > 2 && value.starts_with('<') && value.ends_with('>'))
}
