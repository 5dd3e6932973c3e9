//! Entry diff: field-level comparison of one record on both sides.

use indexmap::IndexMap;
use serde_json::Value;

use cdiff_types::{EntryDiff, FieldDiff, FieldPath, Record};

use crate::blocks::{expand_block_field_diffs, DEFAULT_BLOCK_DEPTH};
use crate::equality::{union_keys, value_changed, Container};
use crate::shape::either_is_blocks;

/// Key holding a record's custom field values.
pub const FIELDS_KEY: &str = "fields";

static NULL: Value = Value::Null;

/// Compare two versions of a record; `None` means they are identical.
pub fn entry_diff(current: &Record, remote: &Record) -> Option<EntryDiff> {
    entry_diff_with_depth(current, remote, DEFAULT_BLOCK_DEPTH)
}

/// [`entry_diff`] with an explicit block recursion budget.
///
/// Top-level keys other than `fields` are compared as whole values, even
/// when they hold containers. Within `fields`, block collections are
/// expanded; everything else is reported under its field handle.
pub fn entry_diff_with_depth(current: &Record, remote: &Record, depth: usize) -> Option<EntryDiff> {
    let mut field_diffs: IndexMap<String, FieldDiff> = IndexMap::new();

    let mut keys: Vec<&String> = current.keys().collect();
    keys.extend(remote.keys().filter(|k| !current.contains_key(k.as_str())));

    for key in keys {
        let c = current.get(key).unwrap_or(&NULL);
        let r = remote.get(key).unwrap_or(&NULL);

        if key == FIELDS_KEY {
            if let (Some(c_fields), Some(r_fields)) = (Container::of(c), Container::of(r)) {
                diff_fields(c_fields, r_fields, depth, &mut field_diffs);
                continue;
            }
        }

        if value_changed(c, r) {
            field_diffs.insert(key.clone(), FieldDiff::new(c.clone(), r.clone()));
        }
    }

    if field_diffs.is_empty() {
        return None;
    }

    Some(EntryDiff {
        current: current.clone(),
        remote: remote.clone(),
        field_diffs,
    })
}

fn diff_fields(
    current: Container<'_>,
    remote: Container<'_>,
    depth: usize,
    out: &mut IndexMap<String, FieldDiff>,
) {
    for handle in union_keys(Some(current), Some(remote)) {
        let c = current.get(&handle).unwrap_or(&NULL);
        let r = remote.get(&handle).unwrap_or(&NULL);
        if !value_changed(c, r) {
            continue;
        }

        if either_is_blocks(c, r) {
            let expanded = expand_block_field_diffs(&FieldPath::field(&*handle), c, r, depth);
            if expanded.is_empty() {
                out.insert(handle.into_owned(), FieldDiff::new(c.clone(), r.clone()));
            } else {
                for (path, diff) in expanded {
                    out.insert(path.to_string(), diff);
                }
            }
        } else {
            out.insert(handle.into_owned(), FieldDiff::new(c.clone(), r.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn labels(diff: &EntryDiff) -> Vec<&str> {
        diff.field_diffs.keys().map(String::as_str).collect()
    }

    #[test]
    fn identical_records() {
        let a = record(json!({"uid": "u1", "title": "A", "fields": {"body": "x", "n": 5}}));
        let b = record(json!({"fields": {"n": "5", "body": "x"}, "title": "A", "uid": "u1"}));
        assert!(entry_diff(&a, &b).is_none());
    }

    #[test]
    fn scalar_field_change() {
        let a = record(json!({"uid": "u1", "title": "A", "fields": {"body": "x"}}));
        let b = record(json!({"uid": "u1", "title": "A", "fields": {"body": "y"}}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["body"]);
        assert_eq!(diff.field("body"), Some(&FieldDiff::new(json!("x"), json!("y"))));
        assert_eq!(diff.current, a);
        assert_eq!(diff.remote, b);
    }

    #[test]
    fn metadata_and_fields_in_key_order() {
        let a = record(json!({"uid": "u1", "title": "A", "fields": {"body": "x"}, "slug": "a"}));
        let b = record(json!({"uid": "u1", "title": "B", "fields": {"body": "y"}, "slug": "b"}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["title", "body", "slug"]);
    }

    #[test]
    fn field_only_on_one_side() {
        let a = record(json!({"fields": {"body": "x"}}));
        let b = record(json!({"fields": {"body": "x", "summary": "new"}}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(diff.field("summary"), Some(&FieldDiff::new(json!(null), json!("new"))));
    }

    #[test]
    fn absent_field_and_empty_string_are_equal() {
        let a = record(json!({"fields": {"body": "x"}}));
        let b = record(json!({"fields": {"body": "x", "summary": ""}}));
        assert!(entry_diff(&a, &b).is_none());
    }

    #[test]
    fn metadata_containers_not_expanded() {
        let a = record(json!({"meta": [{"type": "x", "title": "a"}]}));
        let b = record(json!({"meta": [{"type": "x", "title": "b"}]}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["meta"]);
    }

    #[test]
    fn fields_not_containers_compared_whole() {
        let a = record(json!({"fields": null}));
        let b = record(json!({"fields": {"body": "x"}}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["fields"]);
    }

    #[test]
    fn block_field_expanded() {
        let a = record(json!({"fields": {"body": [{"type": "image", "fields": {"caption": "a"}}]}}));
        let b = record(json!({"fields": {"body": [{"type": "image", "fields": {"caption": "b"}}]}}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["body — Block 1 (image): caption"]);
    }

    #[test]
    fn block_field_replacing_scalar() {
        let a = record(json!({"fields": {"body": "plain"}}));
        let b = record(json!({"fields": {"body": [{"type": "text"}]}}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["body — Block 1 (type)"]);
    }

    #[test]
    fn degenerate_block_change_reported_whole() {
        let a = record(json!({"fields": {"body": {"new1": {"type": "text"}}}}));
        let b = record(json!({"fields": {"body": {"42": {"type": "text"}}}}));
        let diff = entry_diff(&a, &b).unwrap();
        assert_eq!(labels(&diff), vec!["body"]);
        assert_eq!(diff.field_diffs["body"].remote, json!({"42": {"type": "text"}}));
    }

    #[test]
    fn depth_budget_passed_through() {
        let nested = |leaf: &str| {
            json!({"fields": {"body": [{"type": "a", "fields": {"inner": [{"type": "b", "fields": {"v": leaf}}]}}]}})
        };
        let (a, b) = (record(nested("x")), record(nested("y")));
        let deep = entry_diff_with_depth(&a, &b, 1).unwrap();
        assert_eq!(labels(&deep), vec!["body — Block 1 (a): inner — Block 1 (b): v"]);
        let shallow = entry_diff_with_depth(&a, &b, 0).unwrap();
        assert_eq!(labels(&shallow), vec!["body — Block 1 (a): inner"]);
    }
}
