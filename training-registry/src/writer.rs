//! Fire-and-forget persistence
//!
//! Saves are queued on an unbounded channel and written in order by one
//! background task, so a mutation never waits on storage. Failed writes are
//! logged and dropped.

use crate::error::{RegistryError, Result};
use crate::store::SnapshotStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriteRequest {
    Save { key: &'static str, content: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer task
pub(crate) struct PersistenceWriter {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl PersistenceWriter {
    /// Start the writer. Must be called inside a tokio runtime.
    pub(crate) fn spawn(store: Arc<dyn SnapshotStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                match request {
                    WriteRequest::Save { key, content } => match store.save(key, &content).await {
                        Ok(()) => debug!(key, bytes = content.len(), "Saved collection"),
                        Err(e) => warn!(key, error = %e, "Failed to save collection"),
                    },
                    WriteRequest::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("Persistence writer stopped");
        });

        Self { tx }
    }

    /// Queue a save without waiting for it
    pub(crate) fn save(&self, key: &'static str, content: String) {
        if self.tx.send(WriteRequest::Save { key, content }).is_err() {
            warn!(key, "Persistence writer stopped, save dropped");
        }
    }

    /// Wait until every save queued before this call has been attempted
    pub(crate) async fn flush(&self) -> Result<()> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(WriteRequest::Flush(done))
            .map_err(|_| RegistryError::WriterClosed)?;
        wait.await.map_err(|_| RegistryError::WriterClosed)
    }
}
