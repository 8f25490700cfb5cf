//! Conversation data model.
//!
//! These types serialize to exactly the shape the generation endpoint
//! expects in `contents`, so the history can be sent and persisted as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Function,
}

/// Base64 payload with its mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// One typed fragment of a turn. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
        /// Opaque token some models attach to a call; it must be sent back
        /// unchanged with the call in later requests.
        #[serde(
            rename = "thoughtSignature",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        thought_signature: Option<String>,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_inline_data(&self) -> Option<&InlineData> {
        match self {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Part::FunctionCall { function_call, .. } => Some(function_call),
            _ => None,
        }
    }

    pub fn as_function_response(&self) -> Option<&FunctionResponse> {
        match self {
            Part::FunctionResponse { function_response } => Some(function_response),
            _ => None,
        }
    }
}

/// One role-tagged entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    pub fn user(parts: Vec<Part>) -> Self {
        Self::new(Role::User, parts)
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self::new(
            Role::Model,
            vec![Part::FunctionCall {
                function_call: call,
                thought_signature: None,
            }],
        )
    }

    pub fn function_response(response: FunctionResponse) -> Self {
        Self::new(
            Role::Function,
            vec![Part::FunctionResponse {
                function_response: response,
            }],
        )
    }

    /// A turn must carry at least one part.
    pub fn is_valid(&self) -> bool {
        !self.parts.is_empty()
    }

    /// First non-empty text part.
    pub fn first_text(&self) -> Option<&str> {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .find(|t| !t.is_empty())
    }

    pub fn first_function_call(&self) -> Option<&FunctionCall> {
        self.parts.iter().find_map(Part::as_function_call)
    }

    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts.iter().find_map(Part::as_inline_data)
    }
}

/// One web-search hit. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

pub const NO_RESULTS_SNIPPET: &str = "No search results found.";

/// Output of a tool invocation, fed back to the model as a function response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResult {
    Results { results: Vec<SearchItem> },
    Error { error: String },
}

impl ToolResult {
    pub fn error(message: impl Into<String>) -> Self {
        ToolResult::Error {
            error: message.into(),
        }
    }

    /// Keep at most `limit` items; an empty list becomes the single
    /// "no results" sentinel.
    pub fn from_items(mut items: Vec<SearchItem>, limit: usize) -> Self {
        if items.is_empty() {
            return ToolResult::Results {
                results: vec![SearchItem {
                    snippet: Some(NO_RESULTS_SNIPPET.to_string()),
                    ..SearchItem::default()
                }],
            };
        }
        items.truncate(limit);
        ToolResult::Results { results: items }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Error { .. })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
    }
}

/// A source reference attached to a grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

/// The final text of a turn together with its citations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub citations: Vec<Citation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_turn_serializes_to_wire_shape() {
        let turn = Turn::user(vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: "image/png".into(),
                    data: "AAAA".into(),
                },
            },
            Part::text("what is this?"),
        ]);
        assert_eq!(
            serde_json::to_value(&turn).unwrap(),
            json!({
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                    { "text": "what is this?" }
                ]
            })
        );
    }

    #[test]
    fn parses_function_call_part() {
        let part: Part = serde_json::from_value(json!({
            "functionCall": { "name": "googleSearch", "args": { "query": "rust" } }
        }))
        .unwrap();
        let call = part.as_function_call().unwrap();
        assert_eq!(call.name, "googleSearch");
        assert_eq!(call.args["query"], "rust");
    }

    #[test]
    fn thought_signature_survives_round_trip() {
        let wire = json!({
            "functionCall": { "name": "googleSearch", "args": { "query": "rust" } },
            "thoughtSignature": "c2lnLTE="
        });
        let part: Part = serde_json::from_value(wire.clone()).unwrap();
        assert!(matches!(
            &part,
            Part::FunctionCall { thought_signature: Some(sig), .. } if sig == "c2lnLTE="
        ));
        assert_eq!(serde_json::to_value(&part).unwrap(), wire);

        let unsigned = Turn::function_call(FunctionCall {
            name: "googleSearch".into(),
            args: json!({ "query": "rust" }),
        });
        assert_eq!(
            serde_json::to_value(&unsigned.parts[0]).unwrap(),
            json!({ "functionCall": { "name": "googleSearch", "args": { "query": "rust" } } })
        );
    }

    #[test]
    fn function_call_without_args_defaults_to_null() {
        let part: Part =
            serde_json::from_value(json!({ "functionCall": { "name": "ping" } })).unwrap();
        assert!(part.as_function_call().unwrap().args.is_null());
    }

    #[test]
    fn accepts_snake_case_inline_data() {
        let part: Part = serde_json::from_value(json!({
            "inline_data": { "mime_type": "image/jpeg", "data": "/9j/" }
        }))
        .unwrap();
        assert_eq!(part.as_inline_data().unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn function_response_turn_has_function_role() {
        let turn = Turn::function_response(FunctionResponse {
            name: "googleSearch".into(),
            response: json!({ "error": "boom" }),
        });
        assert_eq!(
            serde_json::to_value(&turn).unwrap(),
            json!({
                "role": "function",
                "parts": [{ "functionResponse": { "name": "googleSearch", "response": { "error": "boom" } } }]
            })
        );
    }

    #[test]
    fn first_text_skips_other_parts_and_empty_text() {
        let turn = Turn::new(
            Role::Model,
            vec![
                Part::FunctionCall {
                    function_call: FunctionCall {
                        name: "googleSearch".into(),
                        args: json!({}),
                    },
                    thought_signature: None,
                },
                Part::text(""),
                Part::text("answer"),
            ],
        );
        assert_eq!(turn.first_text(), Some("answer"));
        assert!(turn.first_function_call().is_some());
        assert!(turn.first_inline_data().is_none());
    }

    #[test]
    fn empty_turn_is_invalid() {
        assert!(!Turn::user(Vec::new()).is_valid());
        assert!(Turn::model_text("hi").is_valid());
    }

    #[test]
    fn tool_result_shapes() {
        let ok = ToolResult::Results {
            results: vec![SearchItem {
                title: Some("A".into()),
                snippet: Some("B".into()),
                link: Some("C".into()),
            }],
        };
        assert_eq!(
            ok.to_value(),
            json!({ "results": [{ "title": "A", "snippet": "B", "link": "C" }] })
        );
        assert_eq!(
            ToolResult::error("Unknown function: x").to_value(),
            json!({ "error": "Unknown function: x" })
        );
    }

    #[test]
    fn empty_items_become_sentinel() {
        assert_eq!(
            ToolResult::from_items(Vec::new(), 10).to_value(),
            json!({ "results": [{ "snippet": "No search results found." }] })
        );
    }

    #[test]
    fn items_are_truncated_to_limit() {
        let items = (0..5)
            .map(|i| SearchItem {
                title: Some(format!("t{i}")),
                ..SearchItem::default()
            })
            .collect();
        match ToolResult::from_items(items, 3) {
            ToolResult::Results { results } => assert_eq!(results.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }
}
