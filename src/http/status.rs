//! Classification of failed HTTP requests.

use reqwest::StatusCode;

/// A failed request, split by whether the resource is simply missing.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// HTTP 404 (or 410): the index has nothing at this URL.
    #[error("Not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, body or decoding failure.
    #[error("{reason}")]
    Transport { url: String, reason: String },
}

impl HttpError {
    pub fn url(&self) -> &str {
        match self {
            HttpError::NotFound { url }
            | HttpError::Status { url, .. }
            | HttpError::Transport { url, .. } => url,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::NotFound { .. })
    }
}

/// Classifies a reqwest error raised while talking to `url`.
pub fn classify_error(url: &str, error: &reqwest::Error) -> HttpError {
    match error.status() {
        Some(StatusCode::NOT_FOUND) | Some(StatusCode::GONE) => HttpError::NotFound {
            url: url.to_string(),
        },
        Some(status) => HttpError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        },
        None => HttpError::Transport {
            url: url.to_string(),
            reason: error.to_string(),
        },
    }
}
