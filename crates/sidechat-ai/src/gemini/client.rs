//! Gemini API client struct and request building.

use chrono::NaiveDateTime;
use serde::Serialize;
use sidechat_common::Language;

use crate::tools::{google_search_declaration, FunctionDeclaration};
use crate::types::{FunctionResponse, Turn};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub system_instruction: SystemInstruction,
    pub tools: Vec<ToolSet>,
    pub contents: Vec<&'a Turn>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolSet {
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// System context sent with every request: wall-clock time plus the
/// language directive.
pub fn system_instruction_text(now: NaiveDateTime, language: Language) -> String {
    format!(
        "System context: The current date and time is {}. {}",
        now.format("%A, %B %-d, %Y at %-I:%M %p"),
        language.directive()
    )
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self) -> String {
        self.config.generate_content_url()
    }

    /// `contents` is the history followed by the function turn for
    /// `tool_result`, which is owned by the caller.
    pub(crate) fn build_request<'a>(
        &self,
        contents: Vec<&'a Turn>,
        language: Language,
        now: NaiveDateTime,
    ) -> GenerateRequest<'a> {
        GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: system_instruction_text(now, language),
                }],
            },
            tools: vec![ToolSet {
                function_declarations: vec![google_search_declaration()],
            }],
            contents,
        }
    }
}

/// Function-role turn appended after the history for a tool round-trip.
pub(crate) fn tool_turn(tool_result: Option<&FunctionResponse>) -> Option<Turn> {
    tool_result.cloned().map(Turn::function_response)
}
