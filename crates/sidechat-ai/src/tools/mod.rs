//! The model-callable tool surface.
//!
//! Only one function is declared (`googleSearch`). Calls to anything else,
//! or with a missing query, are answered with an error result instead of
//! failing the turn, so the model can still respond.

mod definitions;

pub use definitions::{google_search_declaration, FunctionDeclaration, GOOGLE_SEARCH};

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{FunctionCall, ToolResult};
use crate::ToolExecutor;

/// Route a model function call to the executor.
pub async fn dispatch(executor: &dyn ToolExecutor, call: &FunctionCall) -> ToolResult {
    if call.name != GOOGLE_SEARCH {
        warn!(tool = %call.name, "model requested an unknown function");
        return ToolResult::error(format!("Unknown function: {}", call.name));
    }

    let query = call
        .args
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty());

    match query {
        Some(query) => {
            debug!(query, "dispatching web search");
            executor.search(query).await
        }
        None => ToolResult::error("Missing required argument: query"),
    }
}
