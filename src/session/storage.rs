// ABOUTME: Key-value persistence adapter — the local store the session snapshot lives in.
// ABOUTME: A JSON file store with atomic writes for real use, and an in-memory store for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synchronous string key-value storage.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// On-disk layout of [`FileStorage`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageFile {
    /// Schema version for forward compatibility.
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: HashMap<String, String>,
}

impl Default for StorageFile {
    fn default() -> Self {
        Self {
            version: 1,
            updated_at: Utc::now(),
            entries: HashMap::new(),
        }
    }
}

/// Storage backed by a single JSON file. Every `set` rewrites the whole file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    file: StorageFile,
}

impl FileStorage {
    /// Open the storage file at `path`.
    ///
    /// A missing file opens as empty. A file that can't be parsed also opens as
    /// empty (and is replaced on the next write) so one bad write never locks the
    /// user out of the app.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let file = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "storage file is corrupt, starting empty");
                    StorageFile::default()
                }
            }
        } else {
            StorageFile::default()
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the file atomically via tmp + rename.
    fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.file)?;
        std::fs::write(&tmp_path, &content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.file.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.file.entries.insert(key.to_string(), value.to_string());
        self.file.updated_at = Utc::now();
        self.flush()
    }
}

/// In-memory storage, counting writes so callers can assert on them.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    pub writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value without counting it as a write.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
