//! Snapshot error handling.
//!
//! Every failure a snapshot assertion can produce is a [`SnapshotError`].
//! Errors are raised synchronously at the point of the snapshot call and are
//! meant to fail exactly the enclosing test. Nothing here is retried: a
//! mismatch is a correctness signal, not a transient fault.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Fixed message for the CI creation guard.
pub const CI_WRITE_FORBIDDEN: &str = "Snapshots can't be created on CI environment";

/// Unified error type for snapshot recording, comparison, and persistence.
#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    /// A snapshot (or its directory) would have to be created while running
    /// in a continuous-integration context.
    #[error("Snapshots can't be created on CI environment")]
    #[diagnostic(
        code(snapkeep::ci_write_forbidden),
        help("record `{key}` locally and commit the snapshot file")
    )]
    CiWriteForbidden { key: String, path: PathBuf },

    /// The stored and fresh canonical values diverge and update mode is off.
    #[error("Snapshot didn't match{report}")]
    #[diagnostic(
        code(snapkeep::mismatch),
        help("rerun with UPDATE=1 to accept the new value for `{key}`")
    )]
    Mismatch { key: String, report: String },

    /// Filesystem failure while reading or writing a store.
    #[error("I/O error on {path:?}: {source}")]
    #[diagnostic(code(snapkeep::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A store file exists but is not a valid snapshot listing.
    #[error("Malformed snapshot store {path:?} at line {line}: {message}")]
    #[diagnostic(
        code(snapkeep::parse),
        help("delete the store file to re-record its snapshots")
    )]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to serialize snapshot: {source}")]
    #[diagnostic(code(snapkeep::serialize))]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// Lookup of a key the store does not contain.
    #[error("No snapshot named `{key}` in {path:?}")]
    #[diagnostic(code(snapkeep::unknown_key), help("run `snapkeep list` to see stored keys"))]
    UnknownKey { key: String, path: PathBuf },
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable short name of the error kind, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SnapshotError::CiWriteForbidden { .. } => "ci_write_forbidden",
            SnapshotError::Mismatch { .. } => "mismatch",
            SnapshotError::Io { .. } => "io",
            SnapshotError::Parse { .. } => "parse",
            SnapshotError::Serialize { .. } => "serialize",
            SnapshotError::UnknownKey { .. } => "unknown_key",
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(source: serde_json::Error) -> Self {
        SnapshotError::Serialize { source }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
