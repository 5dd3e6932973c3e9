//! Section comparison: classify every record of two snapshots as added,
//! removed, or changed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cdiff_types::{DiffReport, SectionDiff, Snapshot};

use crate::blocks::DEFAULT_BLOCK_DEPTH;
use crate::entry::entry_diff_with_depth;
use crate::index::index_by_uid;

/// Tunables for a comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// How many levels of nested block collections are expanded below a
    /// top-level block field.
    pub max_block_depth: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            max_block_depth: DEFAULT_BLOCK_DEPTH,
        }
    }
}

/// Stateless snapshot comparator.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare `current` against `remote`.
    ///
    /// Sections appear in current-snapshot order followed by remote-only
    /// sections; a section missing on one side is treated as empty there.
    /// `added` and `removed` hold full records in their side's index order.
    pub fn compare(&self, current: &Snapshot, remote: &Snapshot) -> DiffReport {
        let mut handles: Vec<&str> = current.section_handles().collect();
        handles.extend(remote.section_handles().filter(|h| !current.contains_section(h)));

        let sections: IndexMap<String, SectionDiff> = handles
            .into_iter()
            .map(|handle| {
                let section = self.compare_section(current.section(handle), remote.section(handle));
                debug!(
                    section = handle,
                    added = section.added.len(),
                    removed = section.removed.len(),
                    changed = section.changed.len(),
                    "section compared"
                );
                (handle.to_owned(), section)
            })
            .collect();

        DiffReport { sections }
    }

    fn compare_section(
        &self,
        current: &[serde_json::Value],
        remote: &[serde_json::Value],
    ) -> SectionDiff {
        let current_by_uid = index_by_uid(current);
        let remote_by_uid = index_by_uid(remote);

        let added = remote_by_uid
            .iter()
            .filter(|(uid, _)| !current_by_uid.contains_key(*uid))
            .map(|(_, record)| (*record).clone())
            .collect();
        let removed = current_by_uid
            .iter()
            .filter(|(uid, _)| !remote_by_uid.contains_key(*uid))
            .map(|(_, record)| (*record).clone())
            .collect();

        let changed = current_by_uid
            .iter()
            .filter_map(|(uid, current_record)| {
                let remote_record = remote_by_uid.get(uid)?;
                entry_diff_with_depth(current_record, remote_record, self.options.max_block_depth)
                    .map(|diff| ((*uid).to_owned(), diff))
            })
            .collect();

        SectionDiff {
            added,
            removed,
            changed,
        }
    }
}

/// Compare two snapshots with default options.
pub fn compare(current: &Snapshot, remote: &Snapshot) -> DiffReport {
    Comparator::default().compare(current, remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdiff_types::{FieldDiff, Record};
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn snapshot(value: Value) -> Snapshot {
        Snapshot::from_value(value).unwrap()
    }

    fn uids(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(cdiff_types::record_uid).collect()
    }

    #[test]
    fn end_to_end_scenario() {
        let current = snapshot(json!({"news": [{"uid": "u1", "title": "A", "fields": {"body": "x"}}]}));
        let remote = snapshot(json!({"news": [
            {"uid": "u1", "title": "A", "fields": {"body": "y"}},
            {"uid": "u2", "title": "B", "fields": {"body": "z"}}
        ]}));

        let report = compare(&current, &remote);
        let news = report.section("news").unwrap();
        assert_eq!(news.added, vec![remote.section("news")[1].as_object().cloned().unwrap()]);
        assert!(news.removed.is_empty());
        assert_eq!(news.changed.len(), 1);
        let u1 = &news.changed["u1"];
        assert_eq!(u1.field_diffs.len(), 1);
        assert_eq!(u1.field_diffs["body"], FieldDiff::new(json!("x"), json!("y")));
    }

    #[test]
    fn section_missing_remotely_is_all_removed() {
        let current = snapshot(json!({"blog": [{"uid": "b1"}, {"uid": "b2"}]}));
        let report = compare(&current, &Snapshot::new());
        let blog = report.section("blog").unwrap();
        assert_eq!(uids(&blog.removed), vec!["b1", "b2"]);
        assert!(blog.added.is_empty());
        assert!(blog.changed.is_empty());
    }

    #[test]
    fn section_union_order() {
        let current = snapshot(json!({"b": [], "a": []}));
        let remote = snapshot(json!({"c": [], "a": [], "b": []}));
        let report = compare(&current, &remote);
        let handles: Vec<_> = report.sections.keys().map(String::as_str).collect();
        assert_eq!(handles, vec!["b", "a", "c"]);
        assert!(report.is_empty());
    }

    #[test]
    fn identical_records_not_changed() {
        let both = snapshot(json!({"news": [{"uid": "u1", "fields": {"n": 1}}]}));
        let remote = snapshot(json!({"news": [{"uid": "u1", "fields": {"n": "1"}}]}));
        let report = compare(&both, &remote);
        assert!(report.section("news").unwrap().changed.is_empty());
    }

    #[test]
    fn records_without_uid_ignored() {
        let current = snapshot(json!({"news": [{"title": "orphan"}, {"uid": 3}]}));
        let remote = snapshot(json!({"news": [{"title": "other orphan"}]}));
        let report = compare(&current, &remote);
        assert!(report.section("news").unwrap().is_empty());
    }

    #[test]
    fn empty_snapshots() {
        let report = compare(&Snapshot::new(), &Snapshot::new());
        assert!(report.sections.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn depth_option_applied() {
        let entry = |leaf: &str| {
            json!({"uid": "u1", "fields": {"body": [{"type": "a", "fields": {"inner": [{"type": "b", "fields": {"v": leaf}}]}}]}})
        };
        let current = snapshot(json!({"news": [entry("x")]}));
        let remote = snapshot(json!({"news": [entry("y")]}));

        let shallow = Comparator::new(CompareOptions { max_block_depth: 0 }).compare(&current, &remote);
        let labels: Vec<_> = shallow.section("news").unwrap().changed["u1"].field_diffs.keys().cloned().collect();
        assert_eq!(labels, vec!["body — Block 1 (a): inner"]);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CompareOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompareOptions::default());
        assert_eq!(options.max_block_depth, 10);
    }

    fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        let entry = ("[a-e]", "[xy]").prop_map(|(uid, body)| json!({"uid": uid, "fields": {"body": body}}));
        prop::collection::btree_map("[pq]", prop::collection::vec(entry, 0..5), 0..3)
            .prop_map(|sections| sections.into_iter().collect())
    }

    proptest! {
        #[test]
        fn added_and_removed_are_symmetric(a in arb_snapshot(), b in arb_snapshot()) {
            let forward = compare(&a, &b);
            let backward = compare(&b, &a);
            for (handle, section) in &forward.sections {
                let reverse = backward.section(handle).unwrap();
                prop_assert_eq!(uids(&section.added), uids(&reverse.removed));
                prop_assert_eq!(uids(&section.removed), uids(&reverse.added));
                let mut changed: Vec<_> = section.changed.keys().collect();
                let mut reverse_changed: Vec<_> = reverse.changed.keys().collect();
                changed.sort();
                reverse_changed.sort();
                prop_assert_eq!(changed, reverse_changed);
            }
        }

        #[test]
        fn self_comparison_is_empty(a in arb_snapshot()) {
            prop_assert!(compare(&a, &a).is_empty());
        }
    }
}
