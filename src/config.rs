/// Startup configuration
///
/// The backend base URL is the only value that can be overridden (through the
/// `RCB_API_URL` environment variable). Everything else is fixed.
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the backend base URL
pub const API_URL_VAR: &str = "RCB_API_URL";

/// Backend used when no override is set (local development server)
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Upper bound for every request to the backend
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved configuration, built once in `main`
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL without a trailing slash
    pub api_url: String,
    pub request_timeout: Duration,
    /// Where downloaded results are written
    pub download_dir: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Self::with_api_url_override(std::env::var(API_URL_VAR).ok())
    }

    /// Build the configuration from an optional base URL override.
    /// A missing or blank override falls back to [`DEFAULT_API_URL`].
    pub fn with_api_url_override(api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout: REQUEST_TIMEOUT,
            download_dir: default_download_dir(),
        }
    }
}

/// The user's download folder, falling back to home, then the working directory
fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_without_override() {
        let config = Config::with_api_url_override(None);
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, REQUEST_TIMEOUT);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = Config::with_api_url_override(Some("   ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_override_trims_trailing_slash() {
        let config = Config::with_api_url_override(Some("https://pfp.example.com/".to_string()));
        assert_eq!(config.api_url, "https://pfp.example.com");
    }
}
