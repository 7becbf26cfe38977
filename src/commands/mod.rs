//! The three output modes: single stanzas, resource lists and full formulas.
//!
//! Every mode builds its complete output in memory and only returns it once
//! all packages were resolved and hashed, so a failure never leaves partial
//! output behind.

use anyhow::Result;
use log::info;

use crate::{
    download::Downloader,
    error::PoetError,
    hasher::ArtifactHasher,
    index::PackageIndex,
    metadata::{LocalIndex, LocalMetadata, discover_site_dirs},
    name::normalize,
    render::{Formula, Resource, render_formula, render_resources},
    resolve::{ResolvedSet, Resolver},
    runtime::Runtime,
};

pub mod config;

use config::Config;

/// What to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// One stanza per name, latest versions, no traversal
    Single(Vec<String>),
    /// A complete formula for an installed package
    Formula(String),
    /// Stanzas for an installed package and its dependency closure
    Resources(String),
}

/// Run `mode` against the real index and, if needed, the local site directories.
#[tracing::instrument(skip(config))]
pub async fn run<R: Runtime>(mode: &Mode, config: Config<R>) -> Result<String> {
    info!("Using package index {}", config.index.index_url());

    let root = match mode {
        Mode::Single(names) => return single(&config.index, &config.downloader, names).await,
        Mode::Formula(root) | Mode::Resources(root) => root,
    };

    let site_dirs = discover_site_dirs(&config.runtime, &config.site_packages)?;
    let local = LocalIndex::scan(config.runtime, &site_dirs)?;

    if matches!(mode, Mode::Formula(_)) {
        formula(&local, &config.index, &config.downloader, root, &config.python).await
    } else {
        resources(&local, &config.index, &config.downloader, root).await
    }
}

/// Stanzas for the latest release of each named package.
#[tracing::instrument(skip(index, downloader))]
pub async fn single(
    index: &dyn PackageIndex,
    downloader: &dyn Downloader,
    names: &[String],
) -> Result<String> {
    let hasher = ArtifactHasher::new(index, downloader);
    let mut stanzas = Vec::with_capacity(names.len());

    for name in names {
        let info = index.latest(name).await?;
        let checksum = hasher.fetch_and_hash(&info.name, &info.version).await?;
        stanzas.push(Resource {
            name: info.name,
            url: checksum.url,
            sha256: checksum.sha256,
        });
    }

    Ok(render_resources(&stanzas))
}

/// Stanzas for `root` and everything it depends on, in traversal order.
#[tracing::instrument(skip(local, index, downloader))]
pub async fn resources(
    local: &dyn LocalMetadata,
    index: &dyn PackageIndex,
    downloader: &dyn Downloader,
    root: &str,
) -> Result<String> {
    let resolved = resolve_installed(local, index, root).await?;
    let stanzas = hash_all(index, downloader, &resolved).await?;
    Ok(render_resources(&stanzas))
}

/// A virtualenv formula for `root` with its dependencies as resources.
#[tracing::instrument(skip(local, index, downloader))]
pub async fn formula(
    local: &dyn LocalMetadata,
    index: &dyn PackageIndex,
    downloader: &dyn Downloader,
    root: &str,
    python: &str,
) -> Result<String> {
    let resolved = resolve_installed(local, index, root).await?;
    let root_key = normalize(root);
    let package = resolved
        .get(&root_key)
        .cloned()
        .ok_or_else(|| PoetError::NotFoundLocally(root.to_string()))?;

    let mut stanzas = hash_all(index, downloader, &resolved).await?;
    let root_at = resolved
        .iter()
        .position(|p| p.key == root_key)
        .unwrap_or_default();
    let root_stanza = stanzas.remove(root_at);

    // Installed metadata often omits these; fall back to what the index lists
    let (mut summary, mut homepage) = (package.summary, package.homepage);
    if summary.is_none() || homepage.is_none() {
        let info = index.latest(&package.name).await?;
        summary = summary.or(info.summary);
        homepage = homepage.or(info.homepage);
    }

    let header = Formula {
        name: package.name,
        version: package.version,
        summary,
        homepage,
        url: root_stanza.url,
        sha256: root_stanza.sha256,
        python: python.to_string(),
    };

    Ok(render_formula(&header, &stanzas))
}

/// Resolve the closure of a root that must be installed locally.
async fn resolve_installed(
    local: &dyn LocalMetadata,
    index: &dyn PackageIndex,
    root: &str,
) -> Result<ResolvedSet> {
    if local.lookup(root)?.is_none() {
        return Err(PoetError::NotFoundLocally(root.to_string()).into());
    }
    Resolver::new(local, index)
        .resolve(&[root.to_string()])
        .await
}

/// Download and hash every resolved package, in resolution order.
async fn hash_all(
    index: &dyn PackageIndex,
    downloader: &dyn Downloader,
    resolved: &ResolvedSet,
) -> Result<Vec<Resource>> {
    let hasher = ArtifactHasher::new(index, downloader);
    let mut stanzas = Vec::with_capacity(resolved.len());

    for (i, package) in resolved.iter().enumerate() {
        info!(
            "[{}/{}] {} {}",
            i + 1,
            resolved.len(),
            package.name,
            package.version
        );
        let checksum = hasher.fetch_and_hash(&package.name, &package.version).await?;
        stanzas.push(Resource {
            name: package.name.clone(),
            url: checksum.url,
            sha256: checksum.sha256,
        });
    }

    Ok(stanzas)
}
