// Shared test fixtures for records as they come back from the store.

use crate::modules::rsvps::core::record::StoredRsvp;
use crate::modules::rsvps::core::snapshot::Snapshot;
use serde_json::json;

/// 2023-11-14 22:13:20 UTC
pub const FIXED_TIMESTAMP_MS: i64 = 1_700_000_000_000;

pub fn stored_rsvp(email: &str, attendance: &str, message: &str) -> StoredRsvp {
    StoredRsvp {
        email: Some(email.to_string()),
        attendance: Some(attendance.to_string()),
        message: Some(message.to_string()),
        timestamp: Some(json!(FIXED_TIMESTAMP_MS)),
    }
}

pub fn snapshot_of(records: Vec<(&str, StoredRsvp)>) -> Snapshot {
    records
        .into_iter()
        .map(|(key, record)| (key.to_string(), record))
        .collect()
}
