//! Configuration schema types for Sidechat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod gemini;
mod search;
mod system;

pub use chat::*;
pub use gemini::*;
pub use search::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Sidechat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SidechatConfig {
    pub gemini: GeminiConfig,
    pub search: SearchConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

/// What a secret looks like in `Debug` output and dumps: empty when unset.
pub fn mask_secret(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}
