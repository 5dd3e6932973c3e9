//! Record indexing by uid.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use cdiff_types::{record_uid, Record};

/// Index a section's records by their string `uid`.
///
/// Entries that are not objects or lack a string `uid` are skipped. A repeated
/// uid keeps its first position but takes the later record.
pub fn index_by_uid(entries: &[Value]) -> IndexMap<&str, &Record> {
    let mut by_uid = IndexMap::with_capacity(entries.len());
    let mut skipped = 0usize;
    for entry in entries {
        match entry.as_object().and_then(|r| record_uid(r).map(|uid| (uid, r))) {
            Some((uid, record)) => {
                by_uid.insert(uid, record);
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "skipped entries without a string uid");
    }
    by_uid
}
