//! Installed package metadata.
//!
//! Reads the `*.dist-info` and `*.egg-info` records that installers leave in
//! site directories and answers "is this package installed, at which version,
//! and what does it declare as dependencies".

mod index;
mod parse;
mod site;

use anyhow::Result;

pub use index::LocalIndex;
pub use parse::{parse_metadata, parse_requirement, parse_requires_txt};
pub use site::discover_site_dirs;

/// One installed distribution as recorded by its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstalledDistribution {
    /// Display name from the `Name` field
    pub name: String,
    pub version: String,
    pub summary: Option<String>,
    pub homepage: Option<String>,
    /// Names of unconditional (non-extra) requirements, in declaration order
    pub requires: Vec<String>,
}

/// Local package-metadata index.
#[cfg_attr(test, mockall::automock)]
pub trait LocalMetadata: Send + Sync {
    /// Look up an installed distribution by name (any case/separator variant).
    ///
    /// Returns `Ok(None)` if nothing by that name is installed, and an error
    /// if the package is installed but its metadata cannot be read.
    fn lookup(&self, name: &str) -> Result<Option<InstalledDistribution>>;
}
