use crate::modules::rsvps::core::record::{RecordKey, StoredRsvp};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// The full record set under one path, iterated in key order.
///
/// Store keys are time ordered, so key order is also insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: BTreeMap<RecordKey, StoredRsvp>,
    /// Children present in the store that could not be read as records.
    unreadable: usize,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the raw JSON value held at a path. `null` is an empty set; children that
    /// are not RSVP objects are skipped.
    pub fn from_json(value: &Json) -> Self {
        match value {
            Json::Null => Self::new(),
            Json::Object(children) => {
                let mut snapshot = Self::new();
                for (key, child) in children {
                    match serde_json::from_value::<StoredRsvp>(child.clone()) {
                        Ok(record) => snapshot.insert(key.clone(), record),
                        Err(error) => {
                            tracing::warn!(%key, %error, "skipping unreadable rsvp record");
                            snapshot.unreadable += 1;
                        }
                    }
                }
                snapshot
            }
            other => {
                tracing::warn!(value = %other, "record path does not hold an object");
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<RecordKey>, record: StoredRsvp) {
        self.records.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&StoredRsvp> {
        self.records.get(key)
    }

    /// True only when the store holds nothing at the path, readable or not.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.unreadable == 0
    }

    /// Readable records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredRsvp)> {
        self.records.iter().map(|(key, record)| (key.as_str(), record))
    }
}

impl FromIterator<(RecordKey, StoredRsvp)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (RecordKey, StoredRsvp)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
            unreadable: 0,
        }
    }
}
