//! PyPI JSON API implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use reqwest::Client;

use crate::error::PoetError;
use crate::http::{HttpClient, HttpError};
use crate::name::normalize;

use super::{FileKind, PackageIndex, ProjectInfo, ReleaseFile};

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org";

/// PyPI JSON response types (internal).
mod api {
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug)]
    pub struct Project {
        pub info: Info,
        #[serde(default)]
        pub urls: Vec<File>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Info {
        pub name: String,
        pub version: String,
        pub summary: Option<String>,
        pub home_page: Option<String>,
        pub project_urls: Option<HashMap<String, String>>,
    }

    #[derive(Deserialize, Debug)]
    pub struct File {
        pub filename: String,
        pub url: String,
        pub packagetype: super::FileKind,
        #[serde(default)]
        pub digests: HashMap<String, String>,
    }
}

/// Client for a PyPI-compatible JSON API (`/pypi/<name>/json`).
pub struct PyPi {
    http_client: HttpClient,
    index_url: String,
}

impl PyPi {
    /// Create a client for pypi.org.
    #[cfg(test)]
    pub fn new(client: Client) -> Self {
        Self::with_index_url(client, DEFAULT_INDEX_URL)
    }

    /// Create a client for a custom index.
    #[cfg(test)]
    pub fn with_index_url(client: Client, index_url: &str) -> Self {
        Self::from_http_client(HttpClient::new(client), index_url)
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, index_url: &str) -> Self {
        Self {
            http_client,
            index_url: index_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the index.
    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    fn project_url(&self, name: &str, version: Option<&str>) -> String {
        match version {
            Some(v) => format!("{}/pypi/{}/{}/json", self.index_url, normalize(name), v),
            None => format!("{}/pypi/{}/json", self.index_url, normalize(name)),
        }
    }

    async fn fetch_project(&self, url: &str) -> Result<api::Project, HttpError> {
        debug!("Fetching project data from {}...", url);
        self.http_client.get_json(url).await
    }
}

fn transport_failure(err: HttpError) -> anyhow::Error {
    PoetError::TransportFailure {
        url: err.url().to_string(),
        reason: err.to_string(),
    }
    .into()
}

#[async_trait]
impl PackageIndex for PyPi {
    #[tracing::instrument(skip(self))]
    async fn latest(&self, name: &str) -> Result<ProjectInfo> {
        let url = self.project_url(name, None);
        match self.fetch_project(&url).await {
            Ok(project) => Ok(project.info.into()),
            Err(e) if e.is_not_found() => Err(PoetError::NotFoundRemotely(name.to_string()).into()),
            Err(e) => Err(transport_failure(e)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn release_files(&self, name: &str, version: &str) -> Result<Vec<ReleaseFile>> {
        let url = self.project_url(name, Some(version));
        match self.fetch_project(&url).await {
            Ok(project) => Ok(project.urls.into_iter().map(ReleaseFile::from).collect()),
            Err(e) if e.is_not_found() => Err(PoetError::NoMatchingRelease {
                name: name.to_string(),
                version: version.to_string(),
            }
            .into()),
            Err(e) => Err(transport_failure(e)),
        }
    }
}

impl From<api::Info> for ProjectInfo {
    fn from(info: api::Info) -> Self {
        // Newer uploads leave home_page empty and list it under project_urls
        let homepage = info.home_page.filter(|h| !h.is_empty()).or_else(|| {
            info.project_urls.and_then(|urls| {
                urls.into_iter()
                    .find(|(label, _)| label.eq_ignore_ascii_case("homepage"))
                    .map(|(_, url)| url)
            })
        });

        ProjectInfo {
            name: info.name,
            version: info.version,
            summary: info.summary.filter(|s| !s.is_empty()),
            homepage,
        }
    }
}

impl From<api::File> for ReleaseFile {
    fn from(mut f: api::File) -> Self {
        ReleaseFile {
            filename: f.filename,
            url: f.url,
            kind: f.packagetype,
            sha256: f.digests.remove("sha256"),
        }
    }
}
