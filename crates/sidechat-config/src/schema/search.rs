//! Custom Search tool settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mask_secret;

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key: String,
    /// Programmable search engine id (`cx`).
    pub engine_id: String,
    pub base_url: String,
    /// Upper bound on items handed back to the model (valid range: 1-10).
    pub max_results: u32,
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("engine_id", &self.engine_id)
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            base_url: DEFAULT_SEARCH_BASE_URL.into(),
            max_results: 10,
        }
    }
}
