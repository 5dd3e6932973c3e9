//! Records and snapshots.
//!
//! Records stay as raw JSON objects: the producer decides which metadata keys
//! an entry carries, and the diff engine only relies on `uid` and `fields`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{SnapshotError, SnapshotResult};

/// A single entry: `uid`, top-level metadata, and a `fields` mapping.
pub type Record = Map<String, Value>;

/// Key of the remote envelope that wraps a snapshot.
pub(crate) const ENVELOPE_KEY: &str = "entriesBySection";

/// Keys an envelope may carry next to [`ENVELOPE_KEY`].
const ENVELOPE_METADATA_KEYS: [&str; 2] = ["siteUrl", "environment"];

/// Whether a top-level object is an envelope rather than a bare snapshot.
///
/// A bare snapshot may have a section named `entriesBySection`, so the key
/// alone is not enough: it must hold a section map (or the empty list some
/// producers write for one) and sit next to envelope metadata only.
pub(crate) fn is_envelope(map: &Map<String, Value>) -> bool {
    let wraps_sections = match map.get(ENVELOPE_KEY) {
        Some(Value::Object(_)) => true,
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    };
    wraps_sections
        && map
            .keys()
            .all(|k| k == ENVELOPE_KEY || ENVELOPE_METADATA_KEYS.contains(&k.as_str()))
}

/// Returns the record's `uid` if it is a string.
pub fn record_uid(record: &Record) -> Option<&str> {
    record.get("uid").and_then(Value::as_str)
}

/// Entries grouped by section handle, in producer order.
///
/// Entries are kept as [`Value`]s so a malformed entry (not an object, or
/// without a string `uid`) can be carried through and skipped at indexing
/// time instead of failing the whole load.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    sections: IndexMap<String, Vec<Value>>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a section's entries.
    pub fn insert_section(&mut self, handle: impl Into<String>, entries: Vec<Value>) {
        self.sections.insert(handle.into(), entries);
    }

    /// Builder-style [`insert_section`](Self::insert_section).
    pub fn with_section(mut self, handle: impl Into<String>, entries: Vec<Value>) -> Self {
        self.insert_section(handle, entries);
        self
    }

    /// Entries of a section; an absent section has no entries.
    pub fn section(&self, handle: &str) -> &[Value] {
        self.sections.get(handle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_section(&self, handle: &str) -> bool {
        self.sections.contains_key(handle)
    }

    /// Section handles in insertion order.
    pub fn section_handles(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if there are no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Parse a snapshot from JSON text.
    ///
    /// Accepts a bare `{ section: [entries] }` object or a remote envelope
    /// carrying it under `entriesBySection`.
    pub fn from_json_str(text: &str) -> SnapshotResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let value = match value {
            Value::Object(mut map) if is_envelope(&map) => {
                map.remove(ENVELOPE_KEY).unwrap_or(Value::Null)
            }
            other => other,
        };
        Self::from_value(value)
    }

    /// Build a snapshot from an already-parsed JSON value.
    ///
    /// A section may be a list of entries or an object whose values are the
    /// entries (keys are ignored). An empty list stands for an empty snapshot,
    /// since some producers encode empty maps that way.
    pub fn from_value(value: Value) -> SnapshotResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Array(items) if items.is_empty() => return Ok(Self::new()),
            _ => return Err(SnapshotError::NotAnObject),
        };

        let mut snapshot = Self::new();
        for (handle, entries) in map {
            let entries = match entries {
                Value::Array(items) => items,
                Value::Object(items) => items.into_iter().map(|(_, v)| v).collect(),
                _ => return Err(SnapshotError::InvalidSection(handle)),
            };
            snapshot.insert_section(handle, entries);
        }
        Ok(snapshot)
    }
}

/// Deserializes with the same rules as [`Snapshot::from_value`].
impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Snapshot::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl FromIterator<(String, Vec<Value>)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Value>)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}
