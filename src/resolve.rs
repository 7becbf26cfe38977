//! Dependency closure resolution.
//!
//! Starting from one or more root names, walks the dependencies declared in
//! installed metadata. Packages that are not installed are looked up on the
//! remote index and become leaves: their own dependencies are unknown.

use anyhow::Result;
use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};

use crate::error::PoetError;
use crate::index::PackageIndex;
use crate::metadata::{InstalledDistribution, LocalMetadata};
use crate::name::normalize;

/// Names never traversed as dependencies: they ship with the interpreter or
/// the installer toolchain.
pub const IGNORED_DEPENDENCIES: &[&str] = &["argparse", "pip", "setuptools", "wsgiref"];

/// Where a package's version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Installed locally; dependencies come from its metadata
    Local,
    /// Not installed; latest version from the index, dependencies unknown
    Remote,
}

/// A package discovered during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Normalized name, the key in the resolved set
    pub key: String,
    /// Display name
    pub name: String,
    pub version: String,
    /// Declared dependency names; always empty for remote packages
    pub requires: Vec<String>,
    pub origin: Origin,
    pub summary: Option<String>,
    pub homepage: Option<String>,
}

impl Package {
    pub fn from_installed(dist: InstalledDistribution) -> Self {
        Package {
            key: normalize(&dist.name),
            name: dist.name,
            version: dist.version,
            requires: dist.requires,
            origin: Origin::Local,
            summary: dist.summary,
            homepage: dist.homepage,
        }
    }
}

/// Outcome of looking up a single name.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Local(InstalledDistribution),
    Remote { name: String, version: String },
    NotFound,
}

/// Packages keyed by normalized name, in the order they were resolved.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet {
    packages: Vec<Package>,
    positions: HashMap<String, usize>,
}

impl ResolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package unless one with the same key is present.
    /// Returns false if it was already there.
    pub fn insert(&mut self, package: Package) -> bool {
        if self.positions.contains_key(&package.key) {
            return false;
        }
        self.positions.insert(package.key.clone(), self.packages.len());
        self.packages.push(package);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(&normalize(name))
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.positions
            .get(&normalize(name))
            .map(|&i| &self.packages[i])
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Packages in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }
}

/// Resolves names against local metadata first and the remote index second.
pub struct Resolver<'a> {
    local: &'a dyn LocalMetadata,
    index: &'a dyn PackageIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(local: &'a dyn LocalMetadata, index: &'a dyn PackageIndex) -> Self {
        Self { local, index }
    }

    /// Look up one name: installed metadata, else the index's latest version.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, name: &str) -> Result<Lookup> {
        if let Some(dist) = self.local.lookup(name)? {
            return Ok(Lookup::Local(dist));
        }

        match self.index.latest(name).await {
            Ok(info) => Ok(Lookup::Remote {
                name: info.name,
                version: info.version,
            }),
            Err(e) => match e.downcast_ref::<PoetError>() {
                Some(PoetError::NotFoundRemotely(_)) => Ok(Lookup::NotFound),
                _ => Err(e),
            },
        }
    }

    /// Resolve the dependency closure of `roots`.
    ///
    /// Each package is resolved once no matter how many paths reach it.
    /// Fails on the first name that is neither installed nor on the index.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, roots: &[String]) -> Result<ResolvedSet> {
        let mut resolved = ResolvedSet::new();
        let mut queue: VecDeque<String> = roots.iter().map(|r| normalize(r)).collect();

        while let Some(key) = queue.pop_front() {
            if resolved.contains(&key) {
                continue;
            }

            let package = match self.lookup(&key).await? {
                Lookup::Local(dist) => {
                    let package = Package::from_installed(dist);
                    debug!(
                        "{} {} is installed, requires {:?}",
                        package.name, package.version, package.requires
                    );
                    for dep in &package.requires {
                        let dep_key = normalize(dep);
                        if IGNORED_DEPENDENCIES.contains(&dep_key.as_str()) {
                            continue;
                        }
                        if !resolved.contains(&dep_key) {
                            queue.push_back(dep_key);
                        }
                    }
                    Package { key: key.clone(), ..package }
                }
                Lookup::Remote { name, version } => {
                    warn!(
                        "{} is not installed so we cannot compute resources for its dependencies",
                        name
                    );
                    Package {
                        key: key.clone(),
                        name,
                        version,
                        requires: Vec::new(),
                        origin: Origin::Remote,
                        summary: None,
                        homepage: None,
                    }
                }
                Lookup::NotFound => return Err(PoetError::NotFoundRemotely(key).into()),
            };

            resolved.insert(package);
        }

        info!("Resolved {} packages", resolved.len());
        Ok(resolved)
    }
}
