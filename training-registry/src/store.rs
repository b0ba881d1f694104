//! Persistence adapters
//!
//! A store maps a collection key (`subjects`, `courses`, `batches`,
//! `students`) to the JSON text of that whole collection. The registry never
//! talks to a store directly: snapshots are loaded once at startup and saves
//! go through the background writer.

use crate::error::Result;
use crate::registry::Snapshot;
use crate::types::Collection;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Key-value storage for serialized collections
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// The stored JSON for `key`, or `None` if nothing was saved yet
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the stored JSON for `key`
    async fn save(&self, key: &str, content: &str) -> Result<()>;
}

/// One `<key>.json` file per collection in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path to a collection's file
    pub fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn save(&self, key: &str, content: &str) -> Result<()> {
        atomic_write(&self.path(key), content.as_bytes()).await
    }
}

/// Process-local store, handy for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, as if a previous session had saved it
    pub async fn insert(&self, key: impl Into<String>, content: impl Into<String>) {
        self.entries.lock().await.insert(key.into(), content.into());
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).await)
    }

    async fn save(&self, key: &str, content: &str) -> Result<()> {
        self.insert(key, content).await;
        Ok(())
    }
}

/// Load all four collections, falling back to empty per collection
///
/// A missing key, an unreadable value or a parse failure each yield an empty
/// collection rather than an error.
pub async fn load_snapshot(store: &dyn SnapshotStore) -> Snapshot {
    let snapshot = Snapshot {
        subjects: load_collection(store, Collection::Subjects).await,
        courses: load_collection(store, Collection::Courses).await,
        batches: load_collection(store, Collection::Batches).await,
        students: load_collection(store, Collection::Students).await,
    };
    info!(
        subjects = snapshot.subjects.len(),
        courses = snapshot.courses.len(),
        batches = snapshot.batches.len(),
        students = snapshot.students.len(),
        "Loaded registry snapshot"
    );
    snapshot
}

async fn load_collection<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    collection: Collection,
) -> Vec<T> {
    let key = collection.key();
    match store.load(key).await {
        Ok(None) => {
            debug!(key, "No stored collection, starting empty");
            Vec::new()
        }
        Ok(Some(content)) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(key, error = %e, "Stored collection is not valid, starting empty");
            Vec::new()
        }),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored collection, starting empty");
            Vec::new()
        }
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await?;

    Ok(())
}
