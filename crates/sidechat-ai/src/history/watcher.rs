//! Cross-process mirroring for file-backed history.
//!
//! Watches the history directory with `notify`, debounces bursts of file
//! events, and publishes changes to one key's record that this process did
//! not write.

use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use sidechat_common::StoreId;
use tracing::{debug, error, info, warn};

use crate::error::HistoryError;

use super::backend::FileBackend;
use super::events::{HistoryBus, HistoryEvent};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Publishes other processes' writes to `<dir>/<key>.json` on a bus.
///
/// Share the `FileBackend` with the local store: its own writes are then
/// recognised and skipped.
pub struct HistoryWatcher {
    backend: Arc<FileBackend>,
    key: String,
    origin: StoreId,
    debounce: Duration,
}

impl HistoryWatcher {
    pub fn new(backend: Arc<FileBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            origin: StoreId::new(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Origin stamped on the events this watcher publishes.
    pub fn origin(&self) -> StoreId {
        self.origin
    }

    /// Re-read the record once; publish and return `true` if it changed
    /// outside this process.
    pub fn poll(&self, bus: &HistoryBus) -> Result<bool, HistoryError> {
        let Some(change) = self.backend.external_change(&self.key)? else {
            return Ok(false);
        };
        debug!(key = %self.key, "history record changed on disk");
        bus.publish(HistoryEvent {
            key: self.key.clone(),
            origin: self.origin,
            change,
        });
        Ok(true)
    }

    /// Watch until the notify channel closes. Runs indefinitely in practice.
    pub async fn watch(self, bus: HistoryBus) -> Result<(), HistoryError> {
        let dir = self.backend.dir().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let file_name: OsString = self
            .backend
            .path_for(&self.key)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();

        // bridges the sync notify callback into the async loop
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    let relevant = matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    );
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if relevant && ours {
                        let _ = tx.try_send(());
                    }
                }
                Err(e) => error!("history watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| HistoryError::Watch(format!("failed to create watcher: {e}")))?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| HistoryError::Watch(format!("failed to watch {}: {e}", dir.display())))?;

        info!(key = %self.key, dir = %dir.display(), "watching history for other sessions");

        while rx.recv().await.is_some() {
            let debounce = tokio::time::sleep(self.debounce);
            tokio::pin!(debounce);
            loop {
                tokio::select! {
                    _ = &mut debounce => break,
                    msg = rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                    }
                }
            }

            if let Err(e) = self.poll(&bus) {
                warn!(key = %self.key, "failed to read changed history: {e}");
            }
        }

        drop(watcher);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{new_history_bus, HistoryChange, HistoryStore};
    use crate::types::{Part, Turn};

    fn shared_dir_store(dir: &std::path::Path) -> (HistoryStore, HistoryWatcher, HistoryBus) {
        let backend = Arc::new(FileBackend::new(dir));
        let bus = new_history_bus();
        let store = HistoryStore::new("default")
            .with_backend(backend.clone())
            .with_bus(bus.clone());
        (store, HistoryWatcher::new(backend, "default"), bus)
    }

    #[test]
    fn second_session_sees_first_sessions_turns() {
        let dir = tempfile::tempdir().unwrap();
        let (mut a, a_watcher, a_bus) = shared_dir_store(dir.path());
        let (mut b, b_watcher, b_bus) = shared_dir_store(dir.path());
        a.load().unwrap();
        b.load().unwrap();
        let mut a_rx = a_bus.subscribe();
        let mut b_rx = b_bus.subscribe();

        a.append(Turn::user(vec![Part::text("from A")])).unwrap();
        // A's own write is not reported back to A
        assert!(!a_watcher.poll(&a_bus).unwrap());

        assert!(b_watcher.poll(&b_bus).unwrap());
        let event = b_rx.try_recv().unwrap();
        assert_eq!(event.origin, b_watcher.origin());
        assert!(b.apply_remote(&event));
        assert_eq!(b.get(), &[Turn::user(vec![Part::text("from A")])]);

        b.append(Turn::model_text("from B")).unwrap();
        let on_disk = FileBackend::new(dir.path()).external_change("default").unwrap();
        assert_eq!(
            on_disk,
            Some(HistoryChange::Updated(vec![
                Turn::user(vec![Part::text("from A")]),
                Turn::model_text("from B"),
            ]))
        );

        // A's bus carried its own append; drain it before checking the mirror
        while a_rx.try_recv().is_ok() {}
        assert!(a_watcher.poll(&a_bus).unwrap());
        let event = a_rx.try_recv().unwrap();
        assert!(a.apply_remote(&event));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn clear_in_other_session_is_mirrored() {
        let dir = tempfile::tempdir().unwrap();
        let (mut a, _, _) = shared_dir_store(dir.path());
        let (mut b, b_watcher, b_bus) = shared_dir_store(dir.path());
        a.append(Turn::model_text("hello")).unwrap();
        b.load().unwrap();
        let mut b_rx = b_bus.subscribe();

        a.clear().unwrap();

        assert!(b_watcher.poll(&b_bus).unwrap());
        let event = b_rx.try_recv().unwrap();
        assert_eq!(event.change, HistoryChange::Cleared);
        assert!(b.apply_remote(&event));
        assert!(b.is_empty());
    }

    #[tokio::test]
    async fn file_events_trigger_publication() {
        let dir = tempfile::tempdir().unwrap();
        let (_, watcher, bus) = shared_dir_store(dir.path());
        let mut rx = bus.subscribe();
        let other = FileBackend::new(dir.path());

        let watcher = watcher.with_debounce(Duration::from_millis(50));
        let handle = tokio::spawn(watcher.watch(bus.clone()));
        // give the OS watcher time to register
        tokio::time::sleep(Duration::from_millis(200)).await;
        crate::history::HistoryBackend::save(&other, "default", &[Turn::model_text("elsewhere")])
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no history event within 5s")
            .unwrap();
        assert_eq!(event.turns(), &[Turn::model_text("elsewhere")]);
        handle.abort();
    }
}
