//! RegistryContext - shared state passed to every command
//!
//! The context owns the registry behind a lock, the persistence writer, the
//! change-event channel and the in-memory activity log. Commands do the
//! validation work through [`Registry`] methods; the context only applies a
//! mutation, queues saves for whatever it changed and announces the change.

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::registry::{Registry, Snapshot};
use crate::store::{load_snapshot, JsonFileStore, MemoryStore, SnapshotStore};
use crate::types::Collection;
use crate::writer::PersistenceWriter;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};
use training_operations::LogEntry;

/// Capacity of the change-event channel; slow subscribers see `Lagged`
const EVENT_CAPACITY: usize = 64;

/// Announced after every mutation that changed at least one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEvent {
    /// Canonical op string, e.g. "delete course"
    pub op: String,
    pub changed: Vec<Collection>,
}

/// Context passed to every command
pub struct RegistryContext {
    registry: RwLock<Registry>,
    writer: PersistenceWriter,
    events: broadcast::Sender<RegistryEvent>,
    activity: Mutex<VecDeque<LogEntry>>,
    activity_limit: usize,
}

impl RegistryContext {
    /// Load the registry from `store` and start the background writer
    ///
    /// Must be called inside a tokio runtime. If loading had to drop
    /// inconsistent records, the cleaned collections are saved right away.
    pub async fn open(store: Arc<dyn SnapshotStore>, config: &RegistryConfig) -> Self {
        let snapshot = load_snapshot(store.as_ref()).await;
        let mut registry = Registry::from_snapshot(snapshot, config.policy.clone());
        let writer = PersistenceWriter::spawn(store);

        let repaired = registry.take_changes();
        if !repaired.is_empty() {
            info!(collections = ?repaired, "Saving repaired collections");
            queue_saves(&registry, &writer, &repaired);
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            registry: RwLock::new(registry),
            writer,
            events,
            activity: Mutex::new(VecDeque::new()),
            activity_limit: config.activity_limit,
        }
    }

    /// Open with a [`JsonFileStore`] rooted at `config.data_dir`
    pub async fn open_dir(config: &RegistryConfig) -> Self {
        info!("Opening registry at {}", config.data_dir.display());
        let store = Arc::new(JsonFileStore::new(&config.data_dir));
        Self::open(store, config).await
    }

    /// Empty registry backed by a [`MemoryStore`]
    pub async fn in_memory(config: &RegistryConfig) -> Self {
        Self::open(Arc::new(MemoryStore::new()), config).await
    }

    // =========================================================================
    // Registry access
    // =========================================================================

    /// Run a read against the current state
    pub async fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        let registry = self.registry.read().await;
        f(&*registry)
    }

    /// Apply a mutation, then persist and announce what it changed
    ///
    /// A failed mutation has changed nothing, so nothing is saved or sent.
    pub async fn mutate<T>(
        &self,
        op: impl Into<String>,
        f: impl FnOnce(&mut Registry) -> Result<T>,
    ) -> Result<T> {
        let mut registry = self.registry.write().await;
        let value = f(&mut *registry)?;

        let changed = registry.take_changes();
        if changed.is_empty() {
            return Ok(value);
        }

        // Encode while still holding the lock so each save matches this mutation
        queue_saves(&*registry, &self.writer, &changed);
        drop(registry);

        let event = RegistryEvent {
            op: op.into(),
            changed,
        };
        debug!(op = %event.op, changed = ?event.changed, "Registry changed");
        // No subscribers is fine
        let _ = self.events.send(event);

        Ok(value)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.read(Registry::snapshot).await
    }

    /// Receive a [`RegistryEvent`] for every later mutation
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Wait for all queued saves to be written
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Record a log entry, dropping the oldest beyond the configured limit
    pub async fn append_activity(&self, entry: LogEntry) {
        let mut activity = self.activity.lock().await;
        activity.push_front(entry);
        activity.truncate(self.activity_limit);
    }

    /// Activity entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Vec<LogEntry> {
        let activity = self.activity.lock().await;
        let take = limit.unwrap_or(activity.len());
        activity.iter().take(take).cloned().collect()
    }
}

fn queue_saves(registry: &Registry, writer: &PersistenceWriter, changed: &[Collection]) {
    for collection in changed {
        match registry.encode(*collection) {
            Ok(content) => writer.save(collection.key(), content),
            Err(e) => warn!(key = collection.key(), error = %e, "Failed to encode collection"),
        }
    }
}
