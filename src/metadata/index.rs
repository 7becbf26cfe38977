//! Index of distributions installed in a set of site directories.

use anyhow::Result;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::PoetError;
use crate::name::normalize;
use crate::runtime::Runtime;

use super::parse::{parse_metadata, parse_requires_txt};
use super::{InstalledDistribution, LocalMetadata};

/// Where an installed distribution keeps its metadata.
#[derive(Debug, Clone, PartialEq)]
enum Record {
    DistInfo(PathBuf),
    /// `*.egg-info` directory holding `PKG-INFO` and maybe `requires.txt`
    EggInfoDir(PathBuf),
    /// Legacy distutils install: the `*.egg-info` file is the PKG-INFO itself
    EggInfoFile(PathBuf),
}

/// Installed distributions found by scanning site directories.
///
/// Scanning only records where each distribution's metadata lives; the
/// metadata itself is parsed on lookup, so a broken record only matters if
/// something actually asks for that package.
pub struct LocalIndex<R: Runtime> {
    runtime: R,
    records: HashMap<String, Record>,
}

impl<R: Runtime> LocalIndex<R> {
    /// Scan the given site directories. Earlier directories win when a
    /// distribution is installed in more than one.
    #[tracing::instrument(skip(runtime))]
    pub fn scan(runtime: R, site_dirs: &[PathBuf]) -> Result<Self> {
        let mut records = HashMap::new();

        for dir in site_dirs {
            if !runtime.is_dir(dir) {
                warn!("Site directory {:?} does not exist, skipping", dir);
                continue;
            }
            for entry in runtime.read_dir(dir)? {
                let Some((name, record)) = classify(&runtime, &entry) else {
                    continue;
                };
                records.entry(normalize(&name)).or_insert(record);
            }
        }

        debug!("Found {} installed distributions", records.len());
        Ok(Self { runtime, records })
    }

    /// Number of installed distributions found.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn load(&self, record: &Record) -> Result<InstalledDistribution> {
        let (metadata_path, requires_path) = match record {
            Record::DistInfo(dir) => (dir.join("METADATA"), None),
            Record::EggInfoDir(dir) => (dir.join("PKG-INFO"), Some(dir.join("requires.txt"))),
            Record::EggInfoFile(file) => (file.clone(), None),
        };

        let malformed = |reason: String| PoetError::MalformedMetadata {
            path: metadata_path.clone(),
            reason,
        };

        let content = self
            .runtime
            .read_to_string(&metadata_path)
            .map_err(|e| malformed(format!("{:#}", e)))?;
        let mut dist = parse_metadata(&content).map_err(|e| malformed(e.to_string()))?;

        // Old setuptools writes requirements only to requires.txt
        if let Some(requires_path) = requires_path {
            if dist.requires.is_empty() && self.runtime.exists(&requires_path) {
                let requires = self.runtime.read_to_string(&requires_path)?;
                dist.requires = parse_requires_txt(&requires);
            }
        }

        Ok(dist)
    }
}

/// Recognize a metadata record and the distribution name it is for.
fn classify<R: Runtime>(runtime: &R, path: &Path) -> Option<(String, Record)> {
    let file_name = path.file_name()?.to_str()?;

    let record = if let Some(stem) = file_name.strip_suffix(".dist-info") {
        (stem, Record::DistInfo(path.to_path_buf()))
    } else if let Some(stem) = file_name.strip_suffix(".egg-info") {
        if runtime.is_dir(path) {
            (stem, Record::EggInfoDir(path.to_path_buf()))
        } else {
            (stem, Record::EggInfoFile(path.to_path_buf()))
        }
    } else {
        return None;
    };

    // "{name}-{version}[-pyX.Y]"; installers escape '-' in the name to '_'
    let (stem, record) = record;
    let name = stem.split('-').next().filter(|n| !n.is_empty())?;
    Some((name.to_string(), record))
}

impl<R: Runtime> LocalMetadata for LocalIndex<R> {
    #[tracing::instrument(skip(self))]
    fn lookup(&self, name: &str) -> Result<Option<InstalledDistribution>> {
        match self.records.get(&normalize(name)) {
            Some(record) => self.load(record).map(Some),
            None => Ok(None),
        }
    }
}
