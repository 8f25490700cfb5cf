use std::sync::Arc;

use sidechat_common::StoreId;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::HistoryError;
use crate::types::Turn;

use super::backend::HistoryBackend;
use super::events::{new_history_bus, HistoryBus, HistoryChange, HistoryEvent};

/// Ordered log of turns for one session key.
///
/// Mutations always apply in memory. When a backend is attached the new
/// state is written through; an `Err` from a mutator reports only that
/// write, not a rejected mutation.
pub struct HistoryStore {
    key: String,
    id: StoreId,
    turns: Vec<Turn>,
    backend: Option<Arc<dyn HistoryBackend>>,
    bus: HistoryBus,
}

impl HistoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: StoreId::new(),
            turns: Vec::new(),
            backend: None,
            bus: new_history_bus(),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn HistoryBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Share a bus with other stores so they can mirror each other.
    pub fn with_bus(mut self, bus: HistoryBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id(&self) -> &StoreId {
        &self.id
    }

    pub fn bus(&self) -> &HistoryBus {
        &self.bus
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Replace the in-memory log with the persisted record, if any.
    /// Nothing is written back or published.
    pub fn load(&mut self) -> Result<usize, HistoryError> {
        let Some(backend) = &self.backend else {
            return Ok(0);
        };
        let turns = backend.load(&self.key)?.unwrap_or_default();
        self.turns = keep_valid(turns);
        debug!(key = %self.key, turns = self.turns.len(), "history loaded");
        Ok(self.turns.len())
    }

    pub fn append(&mut self, turn: Turn) -> Result<(), HistoryError> {
        if !turn.is_valid() {
            return Err(HistoryError::EmptyTurn);
        }
        self.turns.push(turn);
        let written = self.write_through();
        self.publish(HistoryChange::Updated(self.turns.clone()));
        written
    }

    /// Truncate to empty. Calling it on an empty log is harmless.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.turns.clear();
        let removed = match &self.backend {
            Some(backend) => backend.remove(&self.key),
            None => Ok(()),
        };
        self.publish(HistoryChange::Cleared);
        removed
    }

    /// Replace the whole log, e.g. from an exported conversation.
    pub fn restore(&mut self, turns: Vec<Turn>) -> Result<(), HistoryError> {
        self.turns = keep_valid(turns);
        let written = self.write_through();
        self.publish(HistoryChange::Updated(self.turns.clone()));
        written
    }

    /// Receive every change published on this store's bus, including
    /// other stores sharing it. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.bus.subscribe()
    }

    /// Mirror a change made by another store on the same key.
    ///
    /// Returns `false` for own events and other keys. The origin has
    /// already persisted the change, so nothing is written here.
    pub fn apply_remote(&mut self, event: &HistoryEvent) -> bool {
        if event.key != self.key || event.origin == self.id {
            return false;
        }
        self.turns = keep_valid(event.turns().to_vec());
        debug!(key = %self.key, origin = %event.origin.short(), turns = self.turns.len(), "mirrored remote history");
        true
    }

    fn write_through(&self) -> Result<(), HistoryError> {
        match &self.backend {
            Some(backend) => backend.save(&self.key, &self.turns),
            None => Ok(()),
        }
    }

    fn publish(&self, change: HistoryChange) {
        self.bus.publish(HistoryEvent {
            key: self.key.clone(),
            origin: self.id,
            change,
        });
    }
}

fn keep_valid(turns: Vec<Turn>) -> Vec<Turn> {
    let before = turns.len();
    let kept: Vec<Turn> = turns.into_iter().filter(Turn::is_valid).collect();
    if kept.len() != before {
        warn!(dropped = before - kept.len(), "dropped turns without parts");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{FileBackend, MemoryBackend};
    use crate::types::{FunctionCall, InlineData, Part, Role};
    use serde_json::json;

    fn conversation() -> Vec<Turn> {
        vec![
            Turn::user(vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/png".into(),
                        data: "AAAA".into(),
                    },
                },
                Part::text("what is this?"),
            ]),
            Turn::function_call(FunctionCall {
                name: "googleSearch".into(),
                args: json!({ "query": "png" }),
            }),
            Turn::model_text("A tiny image."),
        ]
    }

    #[test]
    fn append_preserves_order() {
        let mut store = HistoryStore::new("k");
        for turn in conversation() {
            store.append(turn).unwrap();
        }
        assert_eq!(store.get(), conversation().as_slice());
    }

    #[test]
    fn append_rejects_empty_turn() {
        let mut store = HistoryStore::new("k");
        assert!(matches!(
            store.append(Turn::new(Role::User, Vec::new())),
            Err(HistoryError::EmptyTurn)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn restore_then_get_round_trips() {
        let mut store = HistoryStore::new("k");
        store.restore(conversation()).unwrap();
        assert_eq!(store.get(), conversation().as_slice());
    }

    #[test]
    fn restore_drops_turns_without_parts() {
        let mut store = HistoryStore::new("k");
        let mut turns = conversation();
        turns.insert(1, Turn::new(Role::Model, Vec::new()));
        store.restore(turns).unwrap();
        assert_eq!(store.get(), conversation().as_slice());
    }

    #[test]
    fn clear_is_idempotent() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = HistoryStore::new("k").with_backend(backend.clone());
        store.restore(conversation()).unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());
        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(backend.load("k").unwrap(), None);
    }

    #[test]
    fn mutations_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FileBackend::new(dir.path()));
        let mut store = HistoryStore::new("tab").with_backend(backend.clone());

        store.append(Turn::model_text("one")).unwrap();
        store.append(Turn::model_text("two")).unwrap();

        let mut reopened = HistoryStore::new("tab").with_backend(backend);
        assert_eq!(reopened.load().unwrap(), 2);
        assert_eq!(reopened.get(), store.get());
    }

    #[test]
    fn load_without_backend_is_empty() {
        let mut store = HistoryStore::new("k");
        assert_eq!(store.load().unwrap(), 0);
        assert!(!store.is_persistent());
    }

    #[tokio::test]
    async fn subscribers_see_every_mutation() {
        let mut store = HistoryStore::new("k");
        let mut rx = store.subscribe();

        store.append(Turn::model_text("one")).unwrap();
        store.clear().unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.change, HistoryChange::Updated(vec![Turn::model_text("one")]));
        assert_eq!(&first.origin, store.id());
        let second = rx.recv().await.unwrap();
        assert_eq!(second.change, HistoryChange::Cleared);
    }

    #[tokio::test]
    async fn mirrors_converge_on_last_writer() {
        let bus = new_history_bus();
        let backend = Arc::new(MemoryBackend::new());
        let mut tab_a = HistoryStore::new("shared")
            .with_backend(backend.clone())
            .with_bus(bus.clone());
        let mut tab_b = HistoryStore::new("shared")
            .with_backend(backend)
            .with_bus(bus.clone());
        let mut rx_b = tab_b.subscribe();

        tab_a.append(Turn::model_text("from a")).unwrap();
        let event = rx_b.recv().await.unwrap();
        assert!(tab_b.apply_remote(&event));
        assert_eq!(tab_b.get(), tab_a.get());

        tab_a.clear().unwrap();
        let event = rx_b.recv().await.unwrap();
        assert!(tab_b.apply_remote(&event));
        assert!(tab_b.is_empty());
    }

    #[test]
    fn own_and_foreign_key_events_are_ignored() {
        let bus = new_history_bus();
        let mut store = HistoryStore::new("a").with_bus(bus.clone());

        let own = HistoryEvent {
            key: "a".into(),
            origin: *store.id(),
            change: HistoryChange::Cleared,
        };
        let other_key = HistoryEvent {
            key: "b".into(),
            origin: StoreId::new(),
            change: HistoryChange::Updated(vec![Turn::model_text("x")]),
        };
        store.append(Turn::model_text("keep")).unwrap();

        assert!(!store.apply_remote(&own));
        assert!(!store.apply_remote(&other_key));
        assert_eq!(store.len(), 1);
    }
}
