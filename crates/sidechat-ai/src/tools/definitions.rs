//! Function declarations advertised to the model.

use serde::{Deserialize, Serialize};
use serde_json::json;

pub const GOOGLE_SEARCH: &str = "googleSearch";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Declaration of the web-search function with its required `query`.
pub fn google_search_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        name: GOOGLE_SEARCH.to_string(),
        description: "Search Google for information.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to send to Google."
                }
            },
            "required": ["query"]
        }),
    }
}
