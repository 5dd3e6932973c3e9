//! Diff report types.
//!
//! Field names on the wire follow the dashboard contract
//! (`added`/`removed`/`changed`, `fieldDiffs`, `currentDisplay`).

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::record::Record;

/// Current and remote values of one differing field.
///
/// Display labels go on the wire as a pair: once either side has one, both
/// `currentDisplay` and `remoteDisplay` are written, the missing one as `null`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiff {
    pub current: Value,
    pub remote: Value,
    /// Display label for `current`, filled in by enrichment.
    #[serde(default)]
    pub current_display: Option<String>,
    /// Display label for `remote`, filled in by enrichment.
    #[serde(default)]
    pub remote_display: Option<String>,
}

impl FieldDiff {
    pub fn new(current: Value, remote: Value) -> Self {
        Self {
            current,
            remote,
            current_display: None,
            remote_display: None,
        }
    }
}

impl Serialize for FieldDiff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let labelled = self.current_display.is_some() || self.remote_display.is_some();
        let mut state = serializer.serialize_struct("FieldDiff", if labelled { 4 } else { 2 })?;
        state.serialize_field("current", &self.current)?;
        state.serialize_field("remote", &self.remote)?;
        if labelled {
            state.serialize_field("currentDisplay", &self.current_display)?;
            state.serialize_field("remoteDisplay", &self.remote_display)?;
        }
        state.end()
    }
}

/// A record present on both sides whose content differs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDiff {
    pub current: Record,
    pub remote: Record,
    /// Differences keyed by display label, in discovery order. Never empty.
    pub field_diffs: IndexMap<String, FieldDiff>,
}

impl EntryDiff {
    /// Look up a field difference by its display label.
    pub fn field(&self, label: &str) -> Option<&FieldDiff> {
        self.field_diffs.get(label)
    }
}

/// Differences within one section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionDiff {
    /// Full records present only on the remote side.
    pub added: Vec<Record>,
    /// Full records present only on the current side.
    pub removed: Vec<Record>,
    /// Records on both sides that differ, keyed by uid.
    pub changed: IndexMap<String, EntryDiff>,
}

impl SectionDiff {
    /// Returns `true` if nothing was added, removed, or changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Result of comparing two snapshots, keyed by section handle.
///
/// Every section present in either snapshot has an entry, even when it holds
/// no differences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffReport {
    pub sections: IndexMap<String, SectionDiff>,
}

/// Counts across a whole report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub sections: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, handle: &str) -> Option<&SectionDiff> {
        self.sections.get(handle)
    }

    /// Returns `true` if no section holds any difference.
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(SectionDiff::is_empty)
    }

    pub fn summary(&self) -> ReportSummary {
        self.sections
            .values()
            .fold(
                ReportSummary {
                    sections: self.sections.len(),
                    ..ReportSummary::default()
                },
                |mut acc, section| {
                    acc.added += section.added.len();
                    acc.removed += section.removed.len();
                    acc.changed += section.changed.len();
                    acc
                },
            )
    }

    /// Iterate every field difference as `(section, uid, label, diff)`.
    pub fn field_diffs(&self) -> impl Iterator<Item = (&str, &str, &str, &FieldDiff)> {
        self.sections.iter().flat_map(|(section, diff)| {
            diff.changed.iter().flat_map(move |(uid, entry)| {
                entry
                    .field_diffs
                    .iter()
                    .map(move |(label, field)| (section.as_str(), uid.as_str(), label.as_str(), field))
            })
        })
    }
}
