//! Data model for content snapshot diffs.
//!
//! A snapshot is a set of CMS entries grouped by section; a diff report is
//! what comparing two of them produces. Every other `cdiff` crate depends on
//! `cdiff-types`.
//!
//! # Key Types
//!
//! - [`Snapshot`] — Section handle to ordered list of records
//! - [`Record`] — A single entry as a JSON object (`uid`, metadata, `fields`)
//! - [`DiffReport`] / [`SectionDiff`] / [`EntryDiff`] / [`FieldDiff`] — Comparison output
//! - [`FieldPath`] — Structured, displayable label of a single field difference
//! - [`RemotePayload`] — Envelope returned by a remote install's diff endpoint

pub mod error;
pub mod path;
pub mod record;
pub mod remote;
pub mod report;

pub use error::{RemoteError, RemoteResult, SnapshotError, SnapshotResult};
pub use path::{FieldPath, PathSegment};
pub use record::{record_uid, Record, Snapshot};
pub use remote::{
    decode_remote_payload, decode_remote_value, is_remote_response, Environment, RemotePayload,
};
pub use report::{DiffReport, EntryDiff, FieldDiff, ReportSummary, SectionDiff};
