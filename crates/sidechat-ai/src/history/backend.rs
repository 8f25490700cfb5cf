//! Durable storage for history records, one record per session key.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::HistoryError;
use crate::types::Turn;

use super::events::HistoryChange;

pub trait HistoryBackend: Send + Sync {
    /// `None` when nothing was stored under `key`.
    fn load(&self, key: &str) -> Result<Option<Vec<Turn>>, HistoryError>;
    fn save(&self, key: &str, turns: &[Turn]) -> Result<(), HistoryError>;
    /// Removing a missing record is not an error.
    fn remove(&self, key: &str) -> Result<(), HistoryError>;
}

/// Stores each key as a JSON array in `<dir>/<key>.json`.
///
/// Other processes may write the same files. The backend remembers the
/// last record it read or wrote per key so [`FileBackend::external_change`]
/// can tell their writes from its own.
pub struct FileBackend {
    dir: PathBuf,
    /// `None` records a key whose file is known to be absent.
    seen: Mutex<HashMap<String, Option<Vec<Turn>>>>,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    /// Re-read `key` and report how it differs from what this backend last
    /// read or wrote. `None` means the file holds nothing new.
    pub fn external_change(&self, key: &str) -> Result<Option<HistoryChange>, HistoryError> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.read_record(key)?;
        if seen.get(key) == Some(&current) {
            return Ok(None);
        }
        seen.insert(key.to_string(), current.clone());
        Ok(Some(match current {
            Some(turns) => HistoryChange::Updated(turns),
            None => HistoryChange::Cleared,
        }))
    }

    fn read_record(&self, key: &str) -> Result<Option<Vec<Turn>>, HistoryError> {
        let path = self.path_for(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let turns = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "read history record");
        Ok(Some(turns))
    }
}

/// Map a session key onto a safe file name.
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

// The `seen` lock is held across each file operation so a concurrent
// `external_change` never observes a write before it is recorded.
impl HistoryBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<Vec<Turn>>, HistoryError> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let record = self.read_record(key)?;
        seen.insert(key.to_string(), record.clone());
        Ok(record)
    }

    fn save(&self, key: &str, turns: &[Turn]) -> Result<(), HistoryError> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(turns)?)?;
        std::fs::rename(&tmp, &path)?;
        seen.insert(key.to_string(), Some(turns.to_vec()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HistoryError> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        seen.insert(key.to_string(), None);
        Ok(())
    }
}

/// In-process backend; clones of the `Arc` share records.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<String, Vec<Turn>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<Vec<Turn>>, HistoryError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &str, turns: &[Turn]) -> Result<(), HistoryError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.insert(key.to_string(), turns.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HistoryError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.remove(key);
        Ok(())
    }
}
