//! The per-turn protocol: prompt, optional tool round-trip, answer.

use tracing::{debug, info, warn};

use crate::data_uri::parse_data_uri;
use crate::gemini::{Candidate, GenerateResponse};
use crate::tools;
use crate::types::{FunctionResponse, Part, Reply, Role, Turn};
use crate::AiError;

use super::manager::Orchestrator;
use super::types::{lock, TurnGuard, TurnOutcome, TurnState};

impl Orchestrator {
    /// Run one user turn.
    ///
    /// Empty text without an image is ignored, and a submission while
    /// another turn is in flight is rejected; neither touches the history
    /// or the network. Every failure after that is reported once through
    /// `Presenter::on_error`. Turns appended before a failure stay.
    pub async fn submit_prompt(&self, text: &str, image_data_uri: Option<&str>) -> TurnOutcome {
        let text = text.trim();
        let image = image_data_uri.filter(|uri| !uri.trim().is_empty());
        if text.is_empty() && image.is_none() {
            debug!("ignoring empty prompt");
            return TurnOutcome::Ignored;
        }

        let guard = match TurnGuard::acquire(&self.state) {
            Ok(guard) => guard,
            Err(_) => {
                warn!(state = ?self.state(), "prompt rejected: a turn is already in flight");
                return TurnOutcome::Rejected;
            }
        };

        match self.run_turn(&guard, text, image).await {
            Ok(reply) => {
                self.presenter.on_response(&reply.text, &reply.citations);
                TurnOutcome::Completed(reply)
            }
            Err(e) => {
                warn!("turn failed: {e}");
                let message = e.user_message();
                self.presenter.on_error(&message);
                TurnOutcome::Failed(message)
            }
        }
    }

    async fn run_turn(
        &self,
        guard: &TurnGuard<'_>,
        text: &str,
        image: Option<&str>,
    ) -> Result<Reply, AiError> {
        let mut parts = Vec::with_capacity(2);
        if let Some(uri) = image {
            parts.push(Part::InlineData {
                inline_data: parse_data_uri(uri)?,
            });
        }
        if !text.is_empty() {
            parts.push(Part::text(text));
        }
        self.append(Turn::user(parts));

        let language = self.language();
        let response = self
            .client
            .generate(&self.history_snapshot(), None, language)
            .await;
        let mut candidate = self.accept(response)?;

        if let Some(call) = candidate.function_call().cloned() {
            guard.advance(TurnState::AwaitingToolResult);
            info!(tool = %call.name, "model requested a tool call");
            // the part is replayed as received so its thought signature survives
            let call_part = candidate.function_call_part().into_iter().cloned().collect();
            self.append(Turn::new(Role::Model, call_part));

            let result = tools::dispatch(self.executor.as_ref(), &call).await;
            lock(&self.usage).record_tool_call();
            let tool_response = FunctionResponse {
                name: call.name,
                response: result.to_value(),
            };

            // The request carries the function turn after the snapshot,
            // matching the history once it is appended.
            let snapshot = self.history_snapshot();
            self.append(Turn::function_response(tool_response.clone()));

            guard.advance(TurnState::AwaitingSecondResponse);
            let response = self
                .client
                .generate(&snapshot, Some(&tool_response), language)
                .await;
            candidate = self.accept(response)?;
        }

        let text = candidate
            .text()
            .ok_or(AiError::EmptyTextResponse)?
            .to_string();
        let citations = candidate.citations();
        self.append(Turn::model_text(text.clone()));
        debug!(chars = text.len(), citations = citations.len(), "turn completed");

        Ok(Reply { text, citations })
    }

    /// Count the call whether or not it succeeded, then pick the candidate.
    fn accept(&self, response: Result<GenerateResponse, AiError>) -> Result<Candidate, AiError> {
        let metadata = response.as_ref().ok().and_then(|r| r.usage_metadata.as_ref());
        lock(&self.usage).record_model_call(metadata);
        response?.into_usable_candidate()
    }
}
