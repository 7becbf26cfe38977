use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::error::PoetError;
use crate::http::HttpClient;

/// Artifact transport: fetches the raw bytes behind a URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Downloads artifacts over HTTP(S) into memory.
pub struct HttpDownloader {
    http_client: HttpClient,
}

impl HttpDownloader {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Fetching {}...", url);

        let bytes = self
            .http_client
            .get_bytes(url)
            .await
            .map_err(|e| PoetError::TransportFailure {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        info!("Download complete ({} bytes).", bytes.len());
        Ok(bytes)
    }
}
