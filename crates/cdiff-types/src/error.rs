use thiserror::Error;

/// Errors produced while loading a snapshot from JSON.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot must be a JSON object keyed by section handle")]
    NotAnObject,

    #[error("section {0:?} must be a list of entries")]
    InvalidSection(String),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors produced while decoding a remote diff endpoint response.
///
/// These are kept apart from an empty [`Snapshot`](crate::Snapshot): a remote
/// with zero sections decodes successfully.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote answered with its own error message.
    #[error("{label} returned: {message}")]
    Remote { label: String, message: String },

    /// The body was not JSON or did not carry `entriesBySection`.
    #[error("remote returned invalid response (not JSON or missing data)")]
    InvalidResponse,

    #[error("remote snapshot is malformed: {0}")]
    Snapshot(#[from] SnapshotError),
}

pub type RemoteResult<T> = Result<T, RemoteError>;
