//! Per-session call and token accounting.

use crate::gemini::UsageMetadata;

/// Snapshot of the counters in a [`UsageTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub model_calls: u64,
    pub tool_calls: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Counts model requests, tool dispatches and token usage.
#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: Usage,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one model call and whatever usage metadata came with it.
    pub fn record_model_call(&mut self, metadata: Option<&UsageMetadata>) {
        self.usage.model_calls += 1;
        if let Some(meta) = metadata {
            self.usage.input_tokens += meta.prompt_token_count.unwrap_or(0);
            self.usage.output_tokens += meta.candidates_token_count.unwrap_or(0);
        }
    }

    pub fn record_tool_call(&mut self) {
        self.usage.tool_calls += 1;
    }

    pub fn snapshot(&self) -> Usage {
        self.usage
    }

    pub fn reset(&mut self) {
        self.usage = Usage::default();
    }
}
