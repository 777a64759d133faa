//! Repository state and its durable mirror.

mod repository;

pub use repository::{IngestOutcome, IngestStatus, Repository};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::StoreError;
use crate::models::StoreData;

/// Durable mirror of the repository state. Implementations must replace
/// the stored document atomically: a reader never observes a partial
/// write.
pub trait StateStore {
    /// Load the persisted state; a missing document yields the default.
    fn load(&self) -> Result<StoreData, StoreError>;

    /// Persist the full state document.
    fn save(&self, data: &StoreData) -> Result<(), StoreError>;
}

/// JSON file store with write-to-temp-then-rename replacement.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<StoreData, StoreError> {
        if !self.path.exists() {
            debug!("No state document at {}, starting empty", self.path.display());
            return Ok(StoreData::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(StoreError::Read)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(data)?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(StoreError::Persist)?;
        tmp.write_all(content.as_bytes()).map_err(StoreError::Persist)?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Persist(e.error))?;

        debug!("Persisted state to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and embedding callers that manage their own
/// durability.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<StoreData, StoreError> {
        Ok(self.data.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        *self.data.lock().expect("store lock poisoned") = data.clone();
        Ok(())
    }
}
