// Rendering of the attendee message feed from a snapshot.
//
// Purpose
// - Turn the full record set into the list the page shows: placeholders or one entry
//   per attendee message.
//
// Responsibilities
// - Keep only records that are attending with a non-blank message, in snapshot order.
// - Escape email and message text so stored markup is shown, not interpreted.
// - Render timestamps in a fixed human-readable form, with a fallback label.
//
// Boundaries
// - Pure. Rendering the same snapshot twice yields the same list.

use crate::modules::rsvps::core::record::StoredRsvp;
use crate::modules::rsvps::core::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde_json::Value as Json;

pub const LOADING_TEXT: &str = "Loading messages...";
pub const NO_SUBMISSIONS_TEXT: &str = "No RSVPs submitted yet!";
pub const NO_MESSAGES_TEXT: &str = "No messages left by attendees yet!";
pub const LOAD_FAILED_TEXT: &str = "Error loading messages. Please try again later.";
pub const UNKNOWN_EMAIL: &str = "Unknown Email";
pub const TIMESTAMP_UNAVAILABLE: &str = "Timestamp unavailable";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FeedEntry {
    /// "From: " followed by the escaped email.
    pub sender: String,
    /// Escaped message text.
    pub message: String,
    pub timestamp: String,
}

impl FeedEntry {
    pub fn from_record(record: &StoredRsvp) -> Self {
        let email = record
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .unwrap_or(UNKNOWN_EMAIL);
        Self {
            sender: format!("From: {}", html_escape::encode_text(email)),
            message: html_escape::encode_text(record.message.as_deref().unwrap_or_default())
                .into_owned(),
            timestamp: format_timestamp(record.timestamp.as_ref()),
        }
    }
}

/// What the message list currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedList {
    /// Nothing rendered yet; the viewer was never opened.
    Blank,
    Loading,
    NoSubmissions,
    NoMessages,
    Entries(Vec<FeedEntry>),
    Failed,
}

impl FeedList {
    pub fn state(&self) -> &'static str {
        match self {
            FeedList::Blank => "blank",
            FeedList::Loading => "loading",
            FeedList::NoSubmissions => "no_submissions",
            FeedList::NoMessages => "no_messages",
            FeedList::Entries(_) => "entries",
            FeedList::Failed => "failed",
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FeedList::Loading => Some(LOADING_TEXT),
            FeedList::NoSubmissions => Some(NO_SUBMISSIONS_TEXT),
            FeedList::NoMessages => Some(NO_MESSAGES_TEXT),
            FeedList::Failed => Some(LOAD_FAILED_TEXT),
            FeedList::Blank | FeedList::Entries(_) => None,
        }
    }

    pub fn entries(&self) -> &[FeedEntry] {
        match self {
            FeedList::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// The list items as an HTML fragment. Entry text is already escaped.
    pub fn to_html(&self) -> String {
        if let Some(placeholder) = self.placeholder() {
            return format!("<li>{placeholder}</li>");
        }
        self.entries()
            .iter()
            .map(|entry| {
                format!(
                    "<li><span class=\"attendee-info\">{}</span><span class=\"message-text\">: {}</span><span class=\"timestamp\">{}</span></li>",
                    entry.sender, entry.message, entry.timestamp
                )
            })
            .collect()
    }
}

impl serde::Serialize for FeedList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut list = serializer.serialize_struct("FeedList", 3)?;
        list.serialize_field("state", self.state())?;
        list.serialize_field("placeholder", &self.placeholder())?;
        list.serialize_field("entries", self.entries())?;
        list.end()
    }
}

pub fn render_feed(snapshot: &Snapshot) -> FeedList {
    if snapshot.is_empty() {
        return FeedList::NoSubmissions;
    }
    let entries: Vec<FeedEntry> = snapshot
        .iter()
        .filter(|(_, record)| record.has_attendee_message())
        .map(|(_, record)| FeedEntry::from_record(record))
        .collect();
    if entries.is_empty() {
        FeedList::NoMessages
    } else {
        FeedList::Entries(entries)
    }
}

/// Epoch milliseconds (number or numeric string) or an RFC 3339 string.
pub fn format_timestamp(value: Option<&Json>) -> String {
    value
        .and_then(parse_timestamp)
        .map(|instant| instant.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| TIMESTAMP_UNAVAILABLE.to_string())
}

fn parse_timestamp(value: &Json) -> Option<DateTime<Utc>> {
    match value {
        Json::Number(number) => {
            let millis = number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|millis| millis.is_finite())
                    .map(|millis| millis as i64)
            })?;
            DateTime::from_timestamp_millis(millis)
        }
        Json::String(raw) => {
            let raw = raw.trim();
            match raw.parse::<i64>() {
                Ok(millis) => DateTime::from_timestamp_millis(millis),
                Err(_) => DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|instant| instant.with_timezone(&Utc)),
            }
        }
        _ => None,
    }
}
