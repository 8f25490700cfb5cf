//! ModelClient implementation for GeminiClient.

use async_trait::async_trait;
use sidechat_common::Language;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{FunctionResponse, Turn};
use crate::{AiError, ModelClient};

use super::client::{tool_turn, GeminiClient};
use super::response::GenerateResponse;

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        history: &[Turn],
        tool_result: Option<&FunctionResponse>,
        language: Language,
    ) -> Result<GenerateResponse, AiError> {
        let tool = tool_turn(tool_result);
        let contents: Vec<&Turn> = history.iter().chain(tool.iter()).collect();
        let body = self.build_request(contents, language, chrono::Local::now().naive_local());
        let url = self.api_url();

        debug!(
            model = %self.config.model,
            turns = body.contents.len(),
            tool_result = tool_result.is_some(),
            "Gemini API request"
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "Gemini API request failed");
            return Err(AiError::Transport {
                status: status.as_u16(),
                reason: status_reason(status, &text),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| AiError::Decode(e.to_string()))
    }
}

const MAX_REASON_CHARS: usize = 120;

/// Short description of a failed response for the user. The full body
/// only goes to the log.
fn status_reason(status: StatusCode, body: &str) -> String {
    if let Some(reason) = status.canonical_reason() {
        return reason.to_string();
    }
    let body = body.trim();
    if body.chars().count() <= MAX_REASON_CHARS {
        return body.to_string();
    }
    let head: String = body.chars().take(MAX_REASON_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GeminiConfig;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new("test-key")
                .with_model("gemini-test")
                .with_base_url(server.url()),
        )
    }

    #[tokio::test]
    async fn posts_history_and_parses_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": "hello" }] } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let history = vec![Turn::user(vec![crate::types::Part::text("hi")])];
        let response = client_for(&server)
            .generate(&history, None, Language::English)
            .await
            .unwrap();

        mock.assert_async().await;
        let candidate = response.into_usable_candidate().unwrap();
        assert_eq!(candidate.text(), Some("hello"));
    }

    #[tokio::test]
    async fn appends_function_turn_for_tool_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-test:generateContent")
            .match_body(Matcher::PartialJson(json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "news" }] },
                    { "role": "function", "parts": [{ "functionResponse": {
                        "name": "googleSearch",
                        "response": { "error": "quota exceeded" }
                    } }] }
                ]
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let history = vec![Turn::user(vec![crate::types::Part::text("news")])];
        let tool = FunctionResponse {
            name: "googleSearch".into(),
            response: json!({ "error": "quota exceeded" }),
        };
        client_for(&server)
            .generate(&history, Some(&tool), Language::English)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-test:generateContent")
            .with_status(400)
            .with_body(
                json!({
                    "error": {
                        "code": 400,
                        "message": "API key not valid. Please pass a valid API key.",
                        "status": "INVALID_ARGUMENT",
                        "details": [{ "reason": "API_KEY_INVALID", "domain": "googleapis.com" }]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client_for(&server)
            .generate(&[], None, Language::English)
            .await
            .unwrap_err();
        match &err {
            AiError::Transport { status, reason } => {
                assert_eq!(*status, 400);
                assert_eq!(reason, "Bad Request");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(
            err.user_message(),
            "An unhandled error occurred: HTTP 400: Bad Request"
        );
    }

    #[test]
    fn unknown_status_reason_is_truncated_body() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(status_reason(status, "  upstream gone \n"), "upstream gone");

        let long = "x".repeat(500);
        let reason = status_reason(status, &long);
        assert_eq!(reason.len(), MAX_REASON_CHARS + 3);
        assert!(reason.ends_with("..."));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-test:generateContent")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .generate(&[], None, Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Decode(_)));
    }
}
