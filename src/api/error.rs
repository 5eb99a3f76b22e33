use thiserror::Error;

/// Everything that can go wrong while talking to the backend.
///
/// Messages are flattened to strings so the error can be cloned into UI
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("invalid backend URL {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid image reference {reference:?}: {message}")]
    InvalidReference { reference: String, message: String },
}

impl NetworkError {
    /// Classify a reqwest failure for `url`
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            NetworkError::Timeout { url }
        } else if let Some(status) = err.status() {
            NetworkError::Status { url, code: status.as_u16() }
        } else if err.is_decode() {
            NetworkError::Decode { url, message: err.to_string() }
        } else {
            NetworkError::Transport { url, message: err.to_string() }
        }
    }
}
