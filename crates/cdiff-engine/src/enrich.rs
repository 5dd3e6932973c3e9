//! Display enrichment: annotate ID-like diff values with human labels.
//!
//! Relation and asset fields serialize as element IDs, which read poorly in a
//! report. Enrichment adds `current_display`/`remote_display` strings such as
//! `hero.jpg (ID: 12)` without touching the report's structure or values.

use std::collections::HashMap;

use serde_json::Value;

use cdiff_types::{DiffReport, FieldDiff};

use crate::equality::Container;

/// Resolves element IDs to display names.
pub trait IdLabelResolver {
    /// Names for the given IDs; IDs without a name are simply left out.
    fn resolve(&self, ids: &[i64]) -> HashMap<i64, String>;
}

/// In-memory resolver backed by an ID to name map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapResolver {
    names: HashMap<i64, String>,
}

impl MapResolver {
    pub fn new(names: HashMap<i64, String>) -> Self {
        Self { names }
    }

    pub fn insert(&mut self, id: i64, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IdLabelResolver for MapResolver {
    fn resolve(&self, ids: &[i64]) -> HashMap<i64, String> {
        ids.iter()
            .filter_map(|id| self.names.get(id).map(|name| (*id, name.clone())))
            .collect()
    }
}

/// Parse a single ID: an integer, or a string of ASCII digits.
fn id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        _ => None,
    }
}

/// The IDs a value stands for, or `None` if it is not ID-like.
fn ids_of(value: &Value) -> Option<Vec<i64>> {
    match Container::of(value) {
        Some(container) => container.values().map(id_of).collect(),
        None => id_of(value).map(|id| vec![id]),
    }
}

/// Format a value's IDs as `name (ID: n)` / `ID: n`, joined by `", "`.
///
/// Returns `None` when the value is not ID-like; an empty container formats
/// as an empty string.
pub fn format_id_labels(value: &Value, resolver: &dyn IdLabelResolver) -> Option<String> {
    let ids = ids_of(value)?;
    if ids.is_empty() {
        return Some(String::new());
    }
    let names = resolver.resolve(&ids);
    let parts: Vec<String> = ids
        .iter()
        .map(|id| match names.get(id) {
            Some(name) => format!("{name} (ID: {id})"),
            None => format!("ID: {id}"),
        })
        .collect();
    Some(parts.join(", "))
}

fn enrich_field(diff: &mut FieldDiff, resolver: &dyn IdLabelResolver) {
    let current = format_id_labels(&diff.current, resolver);
    let remote = format_id_labels(&diff.remote, resolver);
    if current.is_some() || remote.is_some() {
        diff.current_display = current;
        diff.remote_display = remote;
    }
}

/// Add display labels to every ID-like field difference in `report`.
pub fn enrich_with_id_labels(report: &mut DiffReport, resolver: &dyn IdLabelResolver) {
    for section in report.sections.values_mut() {
        for entry in section.changed.values_mut() {
            for diff in entry.field_diffs.values_mut() {
                enrich_field(diff, resolver);
            }
        }
    }
}
