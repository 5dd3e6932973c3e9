//! A fixed snapshot pair covering every kind of difference, for exercising
//! report consumers without a second environment.

use serde_json::{json, Value};

use cdiff_types::{DiffReport, Snapshot};

use crate::compare::compare;

/// Section handle used when the caller has none to offer.
pub const DEFAULT_SAMPLE_SECTION: &str = "content";

fn block(block_type: &str, fields: Value) -> Value {
    json!({
        "type": block_type,
        "title": null,
        "slug": null,
        "enabled": true,
        "collapsed": false,
        "fields": fields,
    })
}

fn body(side: &str, other_side: &str) -> Value {
    json!({
        "new1": block("paragraph", json!({
            "heading": format!("Intro paragraph ({side})"),
            "text": format!("Body copy on {other_side}."),
        })),
        "new2": block("image", json!({
            "caption": format!("Caption on {other_side} side."),
            "items": {
                "new1": block("item", json!({"heading": format!("Nested item ({side})")})),
            },
        })),
    })
}

/// The current and remote snapshots of the sample, both holding one section.
///
/// One entry exists only on the current side, one only on the remote side,
/// and one differs in metadata, plain fields, and a nested block field.
pub fn sample_snapshots(section: &str) -> (Snapshot, Snapshot) {
    let deleted = json!({
        "id": 90001,
        "uid": "sample-deleted-001",
        "title": "Sample entry (deleted on other env)",
        "slug": "sample-deleted",
        "typeHandle": "sample",
        "sectionHandle": section,
        "fields": {"text": "This entry exists here but was removed on the other environment."},
    });
    let created = json!({
        "id": 90002,
        "uid": "sample-created-001",
        "title": "Sample entry (created on other env)",
        "slug": "sample-created",
        "typeHandle": "sample",
        "sectionHandle": section,
        "fields": {"text": "This entry only exists on the other environment."},
    });
    let updated_current = json!({
        "id": 90003,
        "uid": "sample-updated-001",
        "title": "Sample entry (updated)",
        "slug": "sample-updated",
        "typeHandle": "sample",
        "sectionHandle": section,
        "fields": {
            "text": "Content on this environment (here).",
            "summary": "Short summary on this side.",
            "body": body("current", "this environment"),
        },
    });
    let updated_remote = json!({
        "id": 90003,
        "uid": "sample-updated-001",
        "title": "Sample entry (updated on other env)",
        "slug": "sample-updated-remote",
        "typeHandle": "sample",
        "sectionHandle": section,
        "fields": {
            "text": "Content on the other environment (there).",
            "summary": "Short summary on the other side.",
            "body": body("remote", "the other environment"),
        },
    });

    (
        Snapshot::new().with_section(section, vec![deleted, updated_current]),
        Snapshot::new().with_section(section, vec![updated_remote, created]),
    )
}

/// Compare the sample snapshots.
pub fn sample_report(section: &str) -> DiffReport {
    let (current, remote) = sample_snapshots(section);
    compare(&current, &remote)
}
