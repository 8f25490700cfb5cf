//! Orchestrator types and the per-turn state guard.

use std::sync::{Mutex, PoisonError};

use crate::types::{Citation, Reply, Turn};
use crate::AiError;

/// Receives the results of orchestration.
pub trait Presenter: Send + Sync {
    fn on_response(&self, text: &str, citations: &[Citation]);
    fn on_error(&self, message: &str);
    fn on_history_restored(&self, turns: &[Turn]);
}

/// Presenter that discards everything.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn on_response(&self, _text: &str, _citations: &[Citation]) {}
    fn on_error(&self, _message: &str) {}
    fn on_history_restored(&self, _turns: &[Turn]) {}
}

/// Where the in-flight turn is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingFirstResponse,
    AwaitingToolResult,
    AwaitingSecondResponse,
}

/// What `submit_prompt` did with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Empty text and no image; nothing happened.
    Ignored,
    /// Another turn was in flight; nothing happened.
    Rejected,
    Completed(Reply),
    /// The message passed to `Presenter::on_error`.
    Failed(String),
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the orchestrator out of `Idle` for the duration of one turn and
/// puts it back on drop, including early returns and cancellation.
pub(crate) struct TurnGuard<'a> {
    state: &'a Mutex<TurnState>,
}

impl<'a> TurnGuard<'a> {
    pub(crate) fn acquire(state: &'a Mutex<TurnState>) -> Result<Self, AiError> {
        let mut current = lock(state);
        if *current != TurnState::Idle {
            return Err(AiError::Busy);
        }
        *current = TurnState::AwaitingFirstResponse;
        Ok(Self { state })
    }

    pub(crate) fn advance(&self, next: TurnState) {
        *lock(self.state) = next;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = TurnState::Idle;
    }
}
