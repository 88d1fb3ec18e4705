// RSVP record shapes.
//
// Purpose
// - RsvpRecord is what the form writes: validated, normalized, timestamp left to the server.
// - StoredRsvp is what comes back in a snapshot. Every field is optional because other
//   clients write to the same path.
//
// Timestamps
// - Resolved timestamps are epoch milliseconds.

use crate::modules::rsvps::core::attendance::Attendance;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;

pub type RecordKey = String;

/// Placeholder the store replaces with its own clock at write time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerTimestamp;

impl Serialize for ServerTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(".sv", "timestamp")?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpRecord {
    pub email: String,
    pub attendance: Attendance,
    pub message: String,
    pub timestamp: ServerTimestamp,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StoredRsvp {
    #[serde(default, deserialize_with = "loose_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub attendance: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Json>,
}

/// Text fields written by other clients may hold any JSON value; non-strings are
/// shown in their JSON form and `null` counts as absent.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Json>::deserialize(deserializer)?.and_then(|value| match value {
        Json::Null => None,
        Json::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

impl StoredRsvp {
    /// The stored form of `record` once the store has stamped it.
    pub fn resolved(record: RsvpRecord, timestamp_ms: i64) -> Self {
        Self {
            email: Some(record.email),
            attendance: Some(record.attendance.to_string()),
            message: Some(record.message),
            timestamp: Some(Json::from(timestamp_ms)),
        }
    }

    pub fn is_attending(&self) -> bool {
        self.attendance.as_deref() == Some(Attendance::Yes.as_str())
    }

    /// Attending and left a message that is not just whitespace.
    pub fn has_attendee_message(&self) -> bool {
        self.is_attending()
            && self
                .message
                .as_deref()
                .is_some_and(|message| !message.trim().is_empty())
    }
}
