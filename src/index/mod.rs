//! Remote package index abstraction.
//!
//! The resolver only needs two questions answered by an index: what is the
//! latest published version of a project, and which files were uploaded for a
//! given version.

mod pypi;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub use pypi::{DEFAULT_INDEX_URL, PyPi};

/// Project-level metadata for one version of a project.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectInfo {
    /// Display name as registered on the index
    pub name: String,
    pub version: String,
    pub summary: Option<String>,
    pub homepage: Option<String>,
}

/// Kind of an uploaded distribution file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Sdist,
    BdistWheel,
    #[serde(other)]
    Other,
}

/// One downloadable file of a release.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseFile {
    pub filename: String,
    pub url: String,
    pub kind: FileKind,
    /// Digest advertised by the index, if any
    pub sha256: Option<String>,
}

impl ReleaseFile {
    /// True for wheels that install on any platform and interpreter.
    pub fn is_pure_wheel(&self) -> bool {
        self.kind == FileKind::BdistWheel && self.filename.ends_with("-none-any.whl")
    }
}

/// Trait for remote package indexes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Latest published version of a project.
    ///
    /// Fails with `PoetError::NotFoundRemotely` if the index has no such project.
    async fn latest(&self, name: &str) -> Result<ProjectInfo>;

    /// Files uploaded for one version of a project.
    ///
    /// Fails with `PoetError::NoMatchingRelease` if the version is unknown.
    async fn release_files(&self, name: &str, version: &str) -> Result<Vec<ReleaseFile>>;
}
