use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::ports::BlobStore;

enum WriteRequest {
    Save(String),
    Flush(oneshot::Sender<()>),
}

/// Hands encoded snapshots to a single background task that saves them in
/// the order they were queued. Queuing never waits on storage.
///
/// The task ends once the writer is dropped and the queue is drained.
pub struct SnapshotWriter {
    requests: mpsc::UnboundedSender<WriteRequest>,
}

impl SnapshotWriter {
    /// Must be called from within a Tokio runtime.
    pub fn spawn(blob_store: Arc<dyn BlobStore>, key: String) -> Self {
        let (requests, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(blob_store, key, rx));
        Self { requests }
    }

    pub fn enqueue(&self, blob: String) {
        if self.requests.send(WriteRequest::Save(blob)).is_err() {
            tracing::warn!("Snapshot writer is gone, dropping save");
        }
    }

    /// Wait until every snapshot queued before this call has been handed to
    /// storage. Hangs for as long as storage does.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.requests.send(WriteRequest::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

async fn drain(
    blob_store: Arc<dyn BlobStore>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Save(blob) => {
                if let Err(e) = blob_store.save(&key, &blob).await {
                    tracing::warn!("Failed to persist board: {}", e);
                }
            }
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Snapshot writer for '{}' stopped", key);
}
