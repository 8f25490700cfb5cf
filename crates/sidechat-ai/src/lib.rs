//! Conversation engine for Sidechat.
//!
//! Provides the pieces behind the chat widget:
//! - Turn/Part conversation model matching the Gemini wire format
//! - Gemini `generateContent` client with one declared tool (web search)
//! - Custom Search tool executor that never fails, only reports
//! - History store with write-through persistence and pub/sub mirroring
//! - Orchestrator driving one user turn through at most one tool round-trip

pub mod data_uri;
pub mod error;
pub mod gemini;
pub mod history;
pub mod search;
pub mod session;
pub mod tools;
pub mod types;
pub mod usage;

use async_trait::async_trait;
use sidechat_common::Language;

pub use error::{AiError, HistoryError};
pub use gemini::{GeminiClient, GeminiConfig, GenerateResponse};
pub use history::{FileBackend, HistoryBackend, HistoryEvent, HistoryStore, MemoryBackend};
pub use search::{SearchClient, SearchConfig};
pub use session::{NullPresenter, Orchestrator, Presenter, TurnOutcome, TurnState};
pub use types::{Citation, FunctionCall, FunctionResponse, InlineData, Part, Reply, Role, SearchItem, ToolResult, Turn};
pub use usage::{Usage, UsageTracker};

/// Issues one generation request per call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `history` (plus a trailing `function` turn built from
    /// `tool_result`, when given) and return the parsed response.
    async fn generate(
        &self,
        history: &[Turn],
        tool_result: Option<&FunctionResponse>,
        language: Language,
    ) -> Result<GenerateResponse, AiError>;
}

/// Runs the web-search tool. Failures are reported inside the result.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn search(&self, query: &str) -> ToolResult;
}
