//! Gemini response types and the part-selection contract.
//!
//! - usable candidate: `candidates[0]` with at least one content part
//! - function call: the first `functionCall` part of that candidate
//! - final text: the first non-empty `text` part
//! - citations: grounding chunks carrying both `uri` and `title`

use serde::Deserialize;

use crate::types::{Citation, FunctionCall, Part, Role};
use crate::AiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// Either a flat `{uri, title}` or the nested `{web: {uri, title}}` form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u64>,
    pub candidates_token_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateResponse {
    /// The top candidate, or `BlockedResponse` when there is none with content.
    pub fn into_usable_candidate(self) -> Result<Candidate, AiError> {
        match self.candidates.into_iter().next() {
            Some(candidate) if candidate.has_parts() => Ok(candidate),
            Some(candidate) => {
                tracing::warn!(
                    finish_reason = ?candidate.finish_reason,
                    "top candidate carried no content"
                );
                Err(AiError::BlockedResponse)
            }
            None => {
                tracing::warn!(
                    block_reason = ?self.prompt_feedback.and_then(|f| f.block_reason),
                    "response had no candidates"
                );
                Err(AiError::BlockedResponse)
            }
        }
    }
}

impl Candidate {
    fn parts(&self) -> &[Part] {
        self.content.as_ref().map(|c| c.parts.as_slice()).unwrap_or(&[])
    }

    fn has_parts(&self) -> bool {
        !self.parts().is_empty()
    }

    pub fn function_call(&self) -> Option<&FunctionCall> {
        self.parts().iter().find_map(Part::as_function_call)
    }

    /// The whole `functionCall` part, keeping sibling fields such as the
    /// thought signature for replay in history.
    pub fn function_call_part(&self) -> Option<&Part> {
        self.parts()
            .iter()
            .find(|p| p.as_function_call().is_some())
    }

    pub fn text(&self) -> Option<&str> {
        self.parts()
            .iter()
            .filter_map(Part::as_text)
            .find(|t| !t.is_empty())
    }

    pub fn citations(&self) -> Vec<Citation> {
        let Some(meta) = &self.grounding_metadata else {
            return Vec::new();
        };
        meta.grounding_chunks
            .iter()
            .filter_map(GroundingChunk::citation)
            .collect()
    }
}

impl GroundingChunk {
    fn citation(&self) -> Option<Citation> {
        let (uri, title) = match &self.web {
            Some(web) => (web.uri.as_ref(), web.title.as_ref()),
            None => (self.uri.as_ref(), self.title.as_ref()),
        };
        match (uri, title) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => Some(Citation {
                uri: uri.clone(),
                title: title.clone(),
            }),
            _ => None,
        }
    }
}
