//! Quiz history storage.
//!
//! The session core only ever appends; listing and deleting are driven by
//! the history screens.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::HistoryEntry;

use super::error::HistoryError;

/// Persistent list of completed quiz attempts.
pub trait HistoryStore: Send {
    /// Store a new entry; it becomes the first item returned by [`list`](Self::list).
    fn append(&mut self, entry: HistoryEntry) -> Result<(), HistoryError>;

    /// All entries, most recent first.
    fn list(&self) -> &[HistoryEntry];

    /// Remove the entry with the given id. Returns whether anything was removed.
    fn delete(&mut self, id: Uuid) -> Result<bool, HistoryError>;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.list().is_empty()
    }
}

/// In-memory history, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries.insert(0, entry);
        Ok(())
    }

    fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn delete(&mut self, id: Uuid) -> Result<bool, HistoryError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        Ok(self.entries.len() != before)
    }
}

/// History kept in a JSON file, rewritten on every change.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl JsonHistoryStore {
    /// Open the store at `path`. A missing file is an empty history.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = entries.len(), "opened history");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).inspect_err(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to replace history file");
        })?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn append(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries.insert(0, entry);
        if let Err(e) = self.persist() {
            self.entries.remove(0);
            return Err(e);
        }
        Ok(())
    }

    fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn delete(&mut self, id: Uuid) -> Result<bool, HistoryError> {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        let removed = self.entries.remove(position);
        if let Err(e) = self.persist() {
            self.entries.insert(position, removed);
            return Err(e);
        }
        Ok(true)
    }
}
