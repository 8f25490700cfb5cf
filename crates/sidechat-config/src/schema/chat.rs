//! Chat behaviour: response language and history persistence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sidechat_common::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub language: Language,
    pub persist_history: bool,
    /// Key under which the conversation is persisted and mirrored.
    pub session_key: String,
    /// Overrides the platform data directory for history files.
    pub history_dir: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            persist_history: true,
            session_key: "default".into(),
            history_dir: None,
        }
    }
}

impl ChatConfig {
    /// Resolved history directory (`history_dir` or `<data_dir>/sidechat/history`).
    pub fn resolved_history_dir(&self) -> Option<PathBuf> {
        self.history_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("sidechat").join("history")))
    }
}
