// In memory implementation of the RecordStore port.
//
// Purpose
// - Support tests and local development without a hosted database.
//
// Responsibilities
// - Keep records per path, keyed by time ordered UUID v7 strings.
// - Stamp records with the store clock at write time.
// - Push a fresh snapshot to every open subscription of a path after each append.

use crate::modules::rsvps::core::record::{RecordKey, RsvpRecord, StoredRsvp};
use crate::modules::rsvps::core::snapshot::Snapshot;
use crate::shared::infrastructure::record_store::{
    RecordStore, SnapshotUpdate, StoreError, Subscription,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock, mpsc};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryRecordStore {
    paths: RwLock<HashMap<String, Snapshot>>,
    subscribers: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<SnapshotUpdate>>>>,
    append_attempts: AtomicUsize,
    subscriptions_opened: AtomicUsize,
    is_offline: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.is_offline.store(offline, Ordering::SeqCst);
    }

    pub fn toggle_offline(&mut self) {
        let offline = self.is_offline.get_mut();
        *offline = !*offline;
    }

    pub async fn snapshot(&self, path: &str) -> Snapshot {
        self.paths.read().await.get(path).cloned().unwrap_or_default()
    }

    /// Calls to `append`, including rejected ones.
    pub fn append_attempts(&self) -> usize {
        self.append_attempts.load(Ordering::SeqCst)
    }

    pub fn subscriptions_opened(&self) -> usize {
        self.subscriptions_opened.load(Ordering::SeqCst)
    }

    /// Broadcast a subscription error on `path`, as a dropped connection would.
    pub async fn fail_subscribers(&self, path: &str, error: StoreError) {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(senders) = subscribers.get_mut(path) {
            senders.retain(|sender| sender.send(Err(error.clone())).is_ok());
        }
    }

    fn offline(&self) -> bool {
        self.is_offline.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn append(&self, path: &str, record: RsvpRecord) -> Result<RecordKey, StoreError> {
        self.append_attempts.fetch_add(1, Ordering::SeqCst);
        if self.offline() {
            return Err(StoreError::Offline);
        }

        let key = Uuid::now_v7().to_string();
        let stored = StoredRsvp::resolved(record, Utc::now().timestamp_millis());
        // Lock order: subscribers, then paths. Same as `subscribe`.
        let mut subscribers = self.subscribers.lock().await;
        let snapshot = {
            let mut guard = self.paths.write().await;
            let snapshot = guard.entry(path.to_string()).or_default();
            snapshot.insert(key.clone(), stored);
            snapshot.clone()
        };
        if let Some(senders) = subscribers.get_mut(path) {
            senders.retain(|sender| sender.send(Ok(snapshot.clone())).is_ok());
        }
        Ok(key)
    }

    async fn subscribe(&self, path: &str) -> Subscription {
        self.subscriptions_opened.fetch_add(1, Ordering::SeqCst);
        let (sender, subscription) = Subscription::channel();
        let mut subscribers = self.subscribers.lock().await;
        let first = if self.offline() {
            Err(StoreError::Offline)
        } else {
            Ok(self.snapshot(path).await)
        };
        // The receiver is still in hand, so this send cannot fail.
        let _ = sender.send(first);
        subscribers.entry(path.to_string()).or_default().push(sender);
        subscription
    }
}
