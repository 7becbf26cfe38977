use anyhow::Result;
use log::debug;
use reqwest::Client;

use std::path::PathBuf;

use crate::{
    download::HttpDownloader,
    http::HttpClient,
    index::{DEFAULT_INDEX_URL, PyPi},
    runtime::Runtime,
};

/// Formula that generated formulas depend on unless told otherwise.
pub const DEFAULT_PYTHON_FORMULA: &str = "python3";

pub fn user_agent() -> String {
    format!("poet/{}", env!("POET_VERSION"))
}

/// Everything a command needs, assembled once from flags and environment.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub index: PyPi,
    pub downloader: HttpDownloader,
    /// Site directories given explicitly; empty means discover them
    pub site_packages: Vec<PathBuf>,
    pub python: String,
}

impl<R: Runtime> Config<R> {
    pub fn new(
        runtime: R,
        index_url: Option<String>,
        site_packages: Vec<PathBuf>,
        python: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent()).build()?;

        let index_url = index_url.unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());
        debug!("Using package index {}", index_url);

        let http_client = HttpClient::new(client);
        let index = PyPi::from_http_client(http_client.clone(), &index_url);
        let downloader = HttpDownloader::new(http_client);

        Ok(Self {
            runtime,
            index,
            downloader,
            site_packages,
            python: python.unwrap_or_else(|| DEFAULT_PYTHON_FORMULA.to_string()),
        })
    }
}
