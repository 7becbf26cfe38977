//! Fatal error conditions.
//!
//! None of these are recovered from: each one aborts the whole invocation
//! and names the package (or file) that caused it.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PoetError {
    /// The package is not installed in any of the scanned site directories.
    #[error("{0} is not installed locally; install it first or use --single")]
    NotFoundLocally(String),

    /// The package index has no project under this name.
    #[error("{0} was not found on the package index")]
    NotFoundRemotely(String),

    /// The project exists but has no usable artifact for this version.
    #[error("no source distribution of {name} {version} is published on the package index")]
    NoMatchingRelease { name: String, version: String },

    /// Network error or unexpected HTTP status.
    #[error("request to {url} failed: {reason}")]
    TransportFailure { url: String, reason: String },

    /// Installed metadata could not be read or lacks required fields.
    #[error("malformed package metadata in {}: {reason}", .path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    /// The downloaded bytes do not hash to what the index advertises.
    #[error("checksum mismatch for {name}: index says {expected}, downloaded {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}
