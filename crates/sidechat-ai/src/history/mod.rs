//! Conversation history: an append-only log of turns per session key.
//!
//! Every mutation writes through to an optional [`HistoryBackend`] and is
//! published on a [`HistoryBus`]. Other stores observing the same key
//! mirror it by feeding received events to [`HistoryStore::apply_remote`]
//! (last writer wins, no merge). A [`HistoryWatcher`] turns writes made by
//! other processes to a [`FileBackend`] record into events on the bus.

mod backend;
mod events;
mod store;
mod watcher;

pub use backend::{FileBackend, HistoryBackend, MemoryBackend};
pub use events::{new_history_bus, HistoryBus, HistoryChange, HistoryEvent};
pub use store::HistoryStore;
pub use watcher::HistoryWatcher;
