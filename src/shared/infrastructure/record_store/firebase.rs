// Realtime Database REST implementation of the RecordStore port.
//
// Purpose
// - Append with `POST {database_url}/{path}.json`; the response names the new key.
// - Subscribe with a streaming `GET` (`Accept: text/event-stream`) and fold the server
//   sent `put` / `patch` events into a local copy of the path.
//
// Responsibilities
// - Forward a snapshot after every change, and `cancel` / `auth_revoked` as errors.
// - Ignore `keep-alive` events.
// - Report a closed stream as a transport error. No reconnect.

use crate::modules::rsvps::core::record::{RecordKey, RsvpRecord};
use crate::modules::rsvps::core::snapshot::Snapshot;
use crate::shared::infrastructure::record_store::{
    RecordStore, SnapshotUpdate, StoreError, Subscription,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct FirebaseRecordStore {
    client: Client,
    database_url: String,
}

impl FirebaseRecordStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), database_url)
    }

    pub fn with_client(client: Client, database_url: impl Into<String>) -> Self {
        Self {
            client,
            database_url: database_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn path_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.database_url, path.trim_matches('/'))
    }
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

#[async_trait]
impl RecordStore for FirebaseRecordStore {
    async fn append(&self, path: &str, record: RsvpRecord) -> Result<RecordKey, StoreError> {
        let response = self
            .client
            .post(self.path_url(path))
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let pushed: PushResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(pushed.name)
    }

    async fn subscribe(&self, path: &str) -> Subscription {
        let (updates, subscription) = Subscription::channel();
        let request = self
            .client
            .get(self.path_url(path))
            .header(ACCEPT, "text/event-stream");
        tokio::spawn(stream_snapshots(request, updates));
        subscription
    }
}

async fn stream_snapshots(request: RequestBuilder, updates: mpsc::UnboundedSender<SnapshotUpdate>) {
    let response = match request.send().await {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let _ = updates.send(Err(StoreError::Backend { status, body }));
            return;
        }
        Err(error) => {
            let _ = updates.send(Err(StoreError::Transport(error.to_string())));
            return;
        }
    };

    let mut chunks = response.bytes_stream();
    let mut parser = EventStreamParser::default();
    let mut tree = RemoteTree::default();

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(error) => {
                let _ = updates.send(Err(StoreError::Transport(error.to_string())));
                return;
            }
        };
        for event in parser.feed(&chunk) {
            let update = match tree.apply(&event) {
                Ok(Some(snapshot)) => Ok(snapshot),
                Ok(None) => continue,
                Err(error) => Err(error),
            };
            if updates.send(update).is_err() {
                tracing::debug!("subscriber gone, closing event stream");
                return;
            }
        }
    }

    let _ = updates.send(Err(StoreError::Transport("event stream closed".to_string())));
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ServerEvent {
    name: String,
    data: String,
}

impl ServerEvent {
    fn parse(block: &str) -> Option<Self> {
        let mut name = None;
        let mut data: Vec<&str> = Vec::new();
        for line in block.lines() {
            if let Some(value) = line.strip_prefix("event:") {
                name = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("data:") {
                data.push(value.strip_prefix(' ').unwrap_or(value));
            }
        }
        if name.is_none() && data.is_empty() {
            return None;
        }
        Some(Self {
            name: name.unwrap_or_else(|| "message".to_string()),
            data: data.join("\n"),
        })
    }
}

/// Splits a byte stream into server sent events. Events may straddle chunks.
#[derive(Default)]
struct EventStreamParser {
    buffer: Vec<u8>,
}

impl EventStreamParser {
    fn feed(&mut self, chunk: &[u8]) -> Vec<ServerEvent> {
        self.buffer
            .extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));
        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|pair| pair == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(event) = ServerEvent::parse(&String::from_utf8_lossy(&block)) {
                events.push(event);
            }
        }
        events
    }
}

#[derive(Deserialize)]
struct DataChange {
    path: String,
    #[serde(default)]
    data: Json,
}

/// Local copy of the subscribed path.
#[derive(Default)]
struct RemoteTree {
    root: Json,
}

impl RemoteTree {
    fn apply(&mut self, event: &ServerEvent) -> Result<Option<Snapshot>, StoreError> {
        match event.name.as_str() {
            "keep-alive" => Ok(None),
            "put" | "patch" => {
                let change: DataChange = serde_json::from_str(&event.data)
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                let segments: Vec<&str> = change
                    .path
                    .split('/')
                    .filter(|segment| !segment.is_empty())
                    .collect();
                if event.name == "put" {
                    put(&mut self.root, &segments, change.data);
                } else if let Json::Object(children) = change.data {
                    for (key, value) in children {
                        let mut child_path = segments.clone();
                        child_path.push(&key);
                        put(&mut self.root, &child_path, value);
                    }
                }
                Ok(Some(Snapshot::from_json(&self.root)))
            }
            "cancel" | "auth_revoked" => Err(StoreError::Cancelled(
                event.data.trim().trim_matches('"').to_string(),
            )),
            other => {
                tracing::warn!(event = other, "ignoring unknown event from record store");
                Ok(None)
            }
        }
    }
}

/// Set `data` at `segments` below `node`. Like the server, `null` removes the value and
/// objects left empty are pruned.
fn put(node: &mut Json, segments: &[&str], data: Json) {
    let Some((head, rest)) = segments.split_first() else {
        *node = if is_vacant(&data) { Json::Null } else { data };
        return;
    };
    if data.is_null() && node.get(*head).is_none() {
        return;
    }
    if !node.is_object() {
        *node = Json::Object(Map::new());
    }
    if let Json::Object(children) = node {
        let child = children.entry(head.to_string()).or_insert(Json::Null);
        put(child, rest, data);
        if is_vacant(child) {
            children.remove(*head);
        }
    }
    if is_vacant(node) {
        *node = Json::Null;
    }
}

fn is_vacant(value: &Json) -> bool {
    value.is_null() || value.as_object().is_some_and(Map::is_empty)
}
