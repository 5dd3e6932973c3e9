//! Comparison engine for content snapshots.
//!
//! Compares two snapshots section by section, matching entries by `uid`, and
//! expands differing block fields down to individual block attributes and
//! sub-fields. Comparison never fails: malformed shapes degrade to whole-value
//! differences or are skipped.
//!
//! # Key Items
//!
//! - [`compare`] / [`Comparator`] -- Snapshot comparison producing a [`DiffReport`](cdiff_types::DiffReport)
//! - [`entry_diff`] -- Field-level diff of one entry
//! - [`expand_block_field_diffs`] -- Positional, recursive block field diff
//! - [`value_changed`] -- The equality rule every decision goes through
//! - [`enrich_with_id_labels`] -- Display labels for ID-valued differences

pub mod blocks;
pub mod compare;
pub mod enrich;
pub mod entry;
pub mod equality;
pub mod index;
pub mod sample;
pub mod shape;

pub use blocks::{expand_block_field_diffs, BLOCK_ATTRIBUTES, DEFAULT_BLOCK_DEPTH};
pub use compare::{compare, CompareOptions, Comparator};
pub use enrich::{enrich_with_id_labels, format_id_labels, IdLabelResolver, MapResolver};
pub use entry::{entry_diff, entry_diff_with_depth, FIELDS_KEY};
pub use equality::{scalar_string, value_changed};
pub use index::index_by_uid;
pub use sample::{sample_report, sample_snapshots, DEFAULT_SAMPLE_SECTION};
pub use shape::FieldShape;
