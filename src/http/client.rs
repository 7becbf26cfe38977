//! HTTP client with error classification.
//!
//! Every request is made exactly once: a failure is reported to the caller
//! immediately and never retried.

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::status::{HttpError, classify_error};

/// Upper bound on buffer space reserved from an advertised `Content-Length`.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Thin wrapper around a reqwest Client that classifies failures.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let response = response
            .error_for_status()
            .map_err(|e| classify_error(url, &e))?;

        response.json::<T>().await.map_err(|e| HttpError::Transport {
            url: url.to_string(),
            reason: format!("Failed to parse JSON response: {}", e),
        })
    }

    /// Downloads the whole response body into memory.
    ///
    /// A body that ends before its `Content-Length` fails as a transport error.
    #[tracing::instrument(skip(self))]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        debug!("Downloading {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let mut response = response
            .error_for_status()
            .map_err(|e| classify_error(url, &e))?;

        let reserve = response.content_length().map_or(0, |n| n.min(MAX_PREALLOCATION));
        let mut body = Vec::with_capacity(reserve as usize);

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_error(url, &e))?
        {
            body.extend_from_slice(&chunk);
        }

        debug!("Downloaded {:.2} MB", body.len() as f64 / (1024.0 * 1024.0));

        Ok(body)
    }
}
