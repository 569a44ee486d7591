//! Client configuration.

use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "MOODNOTE_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("moodnote-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Builds a config for `base_url`, keeping default timeout and user agent.
    ///
    /// Blank input falls back to [`DEFAULT_API_URL`].
    pub fn with_base_url(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Reads [`API_URL_ENV`], defaulting to [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) => Self::with_base_url(&url),
            Err(_) => Self::default(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT};

    #[test]
    fn base_url_is_trimmed_and_defaults_when_blank() {
        assert_eq!(
            ClientConfig::with_base_url(" https://notes.example.com/ ").base_url,
            "https://notes.example.com"
        );
        assert_eq!(ClientConfig::with_base_url("  ").base_url, DEFAULT_API_URL);
    }

    #[test]
    fn endpoint_joins_path() {
        let config = ClientConfig::with_base_url("http://host:9000");
        assert_eq!(config.endpoint("/notes"), "http://host:9000/notes");
    }

    /// Env vars are process-global; keep every env assertion in one test.
    #[test]
    fn from_env_lifecycle() {
        std::env::remove_var(API_URL_ENV);
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("moodnote-client/"));

        std::env::set_var(API_URL_ENV, "https://api.example.com/");
        assert_eq!(ClientConfig::from_env().base_url, "https://api.example.com");

        std::env::remove_var(API_URL_ENV);
    }
}
