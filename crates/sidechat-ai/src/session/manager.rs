//! Orchestrator struct, construction and history management.

use std::sync::{Arc, Mutex};

use sidechat_common::Language;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::HistoryError;
use crate::history::{HistoryEvent, HistoryStore};
use crate::types::Turn;
use crate::usage::{Usage, UsageTracker};
use crate::{AiError, ModelClient, ToolExecutor};

use super::types::{lock, NullPresenter, Presenter, TurnState};

/// Drives user turns against a model client and the search tool.
pub struct Orchestrator {
    pub(super) client: Arc<dyn ModelClient>,
    pub(super) executor: Arc<dyn ToolExecutor>,
    pub(super) presenter: Arc<dyn Presenter>,
    pub(super) history: Mutex<HistoryStore>,
    pub(super) language: Mutex<Language>,
    pub(super) state: Mutex<TurnState>,
    pub(super) usage: Mutex<UsageTracker>,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn ModelClient>,
        executor: Arc<dyn ToolExecutor>,
        history: HistoryStore,
    ) -> Self {
        Self {
            client,
            executor,
            presenter: Arc::new(NullPresenter),
            history: Mutex::new(history),
            language: Mutex::new(Language::default()),
            state: Mutex::new(TurnState::Idle),
            usage: Mutex::new(UsageTracker::new()),
        }
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_language(self, language: Language) -> Self {
        *lock(&self.language) = language;
        self
    }

    pub fn state(&self) -> TurnState {
        *lock(&self.state)
    }

    pub fn language(&self) -> Language {
        *lock(&self.language)
    }

    /// Switch the response language for subsequent requests.
    pub fn set_language(&self, code: &str) -> Result<Language, AiError> {
        let language: Language = code.parse()?;
        *lock(&self.language) = language;
        info!(language = %language, "response language changed");
        Ok(language)
    }

    /// Snapshot of the conversation.
    pub fn history(&self) -> Vec<Turn> {
        lock(&self.history).get().to_vec()
    }

    pub fn subscribe_history(&self) -> broadcast::Receiver<HistoryEvent> {
        lock(&self.history).subscribe()
    }

    pub fn usage(&self) -> Usage {
        lock(&self.usage).snapshot()
    }

    /// Empty the history (and its persisted record) and reset usage.
    pub fn clear_history(&self) {
        if let Err(e) = lock(&self.history).clear() {
            warn!("failed to clear persisted history: {e}");
        }
        lock(&self.usage).reset();
        info!("history cleared");
    }

    /// Load the persisted record and hand it to the presenter.
    pub fn restore_history(&self) -> Result<usize, HistoryError> {
        let turns = {
            let mut history = lock(&self.history);
            history.load()?;
            history.get().to_vec()
        };
        self.presenter.on_history_restored(&turns);
        Ok(turns.len())
    }

    /// Apply a change mirrored from another observer of the same key.
    /// The presenter is told only when the local history changed.
    pub fn sync_history(&self, event: &HistoryEvent) -> bool {
        let turns = {
            let mut history = lock(&self.history);
            if !history.apply_remote(event) {
                return false;
            }
            history.get().to_vec()
        };
        debug!(turns = turns.len(), "history mirrored from another observer");
        self.presenter.on_history_restored(&turns);
        true
    }

    pub(super) fn append(&self, turn: Turn) {
        match lock(&self.history).append(turn) {
            Ok(()) => {}
            Err(HistoryError::EmptyTurn) => debug!("skipping turn without parts"),
            Err(e) => warn!("failed to persist history: {e}"),
        }
    }

    pub(super) fn history_snapshot(&self) -> Vec<Turn> {
        lock(&self.history).get().to_vec()
    }
}
