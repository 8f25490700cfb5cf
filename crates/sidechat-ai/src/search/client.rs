use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::{SearchItem, ToolResult};
use crate::ToolExecutor;

use super::config::SearchConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// Web-search tool backed by the Custom Search JSON API.
pub struct SearchClient {
    config: SearchConfig,
    http: reqwest::Client,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SearchItem>, String> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("q", query),
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.engine_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {status}: {text}"));
        }

        let body: SearchResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.items)
    }
}

#[async_trait]
impl ToolExecutor for SearchClient {
    async fn search(&self, query: &str) -> ToolResult {
        match self.fetch(query).await {
            Ok(items) => {
                debug!(query, hits = items.len(), "search completed");
                ToolResult::from_items(items, self.config.max_results)
            }
            Err(error) => {
                warn!(query, %error, "search failed");
                ToolResult::Error { error }
            }
        }
    }
}
