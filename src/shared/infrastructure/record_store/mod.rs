// Port for the remote realtime record store.
//
// Purpose
// - Append one record under a path and receive a server-generated key.
// - Subscribe to the full record set under a path. The first update is the current
//   snapshot, later updates follow every change. Errors arrive as updates too.
//
// Boundaries
// - No unsubscribe. A subscription lives as long as its receiver.

use crate::modules::rsvps::core::record::{RecordKey, RsvpRecord};
use crate::modules::rsvps::core::snapshot::Snapshot;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record store offline")]
    Offline,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend error ({status}): {body}")]
    Backend { status: u16, body: String },

    #[error("could not decode store response: {0}")]
    Decode(String),

    #[error("subscription cancelled: {0}")]
    Cancelled(String),
}

pub type SnapshotUpdate = Result<Snapshot, StoreError>;

pub struct Subscription {
    updates: mpsc::UnboundedReceiver<SnapshotUpdate>,
}

impl Subscription {
    pub fn channel() -> (mpsc::UnboundedSender<SnapshotUpdate>, Self) {
        let (sender, updates) = mpsc::unbounded_channel();
        (sender, Self { updates })
    }

    /// Next update, or `None` once the store side has gone away.
    pub async fn next(&mut self) -> Option<SnapshotUpdate> {
        self.updates.recv().await
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, path: &str, record: RsvpRecord) -> Result<RecordKey, StoreError>;
    async fn subscribe(&self, path: &str) -> Subscription;
}

pub mod firebase;
pub mod in_memory;
