//! Client configuration.
//!
//! A [`ClientConfig`] can be built in code, loaded from a TOML or JSON file
//! and overridden from the environment:
//!
//! ```toml
//! base_url = "http://localhost:8080"
//! timeout_ms = 2500
//! user_agent = "billing-worker/1.2"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "SWITCHBOARD_CLIENT_BASE_URL";

/// Environment variable overriding [`ClientConfig::timeout_ms`], in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SWITCHBOARD_CLIENT_TIMEOUT_SECS";

/// Environment variable overriding [`ClientConfig::timeout_ms`], in
/// milliseconds. Takes precedence over [`ENV_TIMEOUT_SECS`].
pub const ENV_TIMEOUT_MS: &str = "SWITCHBOARD_CLIENT_TIMEOUT_MS";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for a [`ServiceClient`](crate::ServiceClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every call path is appended to.
    pub base_url: String,
    /// Whole-request timeout in milliseconds. `0` disables the timeout.
    pub timeout_ms: u64,
    /// `User-Agent` header sent with every call.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: concat!("switchboard-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout, rounded up to whole milliseconds.
    ///
    /// [`Duration::ZERO`] disables the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_millis() + u128::from(timeout.subsec_nanos() % 1_000_000 != 0);
        self.timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Load configuration from a `.toml` or `.json` file.
    pub fn from_file(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ClientError::config(format!("failed to read config file: {e}")))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match extension {
            "toml" => toml::from_str(&content)
                .map_err(|e| ClientError::config(format!("invalid TOML: {e}"))),
            "json" => serde_json::from_str(&content)
                .map_err(|e| ClientError::config(format!("invalid JSON: {e}"))),
            _ => Err(ClientError::config(format!(
                "unsupported config format: {extension}"
            ))),
        }
    }

    /// Apply `SWITCHBOARD_CLIENT_*` environment variable overrides.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            if let Ok(secs) = timeout.trim().parse::<u64>() {
                self.timeout_ms = secs.saturating_mul(1000);
            }
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            if let Ok(millis) = timeout.trim().parse() {
                self.timeout_ms = millis;
            }
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config("base_url is required"));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::config(
                "base_url must start with http:// or https://",
            ));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ClientError::config("base_url must name a host"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.user_agent.starts_with("switchboard-client/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));

        let config = ClientConfig::default().with_timeout(Duration::from_micros(1));
        assert_eq!(config.timeout(), Some(Duration::from_millis(1)));

        let config = ClientConfig::default().with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout_ms, 2000);
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("ftp://example.com").validate().is_err());
        assert!(ClientConfig::new("http://").validate().is_err());
        assert!(ClientConfig::new("not a url").validate().is_err());
        assert!(ClientConfig::new("https://example.com").validate().is_ok());
        assert!(ClientConfig::new("http://127.0.0.1:8080/api").validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://10.0.0.1:9000\"\ntimeout_ms = 250").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.1:9000");
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.user_agent, ClientConfig::default().user_agent);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"base_url": "https://api.internal", "user_agent": "t"}}"#).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://api.internal");
        assert_eq!(config.user_agent, "t");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_from_file_errors() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = ").unwrap();
        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));

        assert!(ClientConfig::from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default().with_overrides_from(|key| match key {
            ENV_BASE_URL => Some("http://override:1".to_string()),
            ENV_TIMEOUT_SECS => Some("7".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://override:1");
        assert_eq!(config.timeout_ms, 7000);
    }

    #[test]
    fn test_millisecond_override_wins() {
        let config = ClientConfig::default().with_overrides_from(|key| match key {
            ENV_TIMEOUT_SECS => Some("7".to_string()),
            ENV_TIMEOUT_MS => Some("750".to_string()),
            _ => None,
        });
        assert_eq!(config.timeout(), Some(Duration::from_millis(750)));
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let config = ClientConfig::default()
            .with_overrides_from(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.base_url, ClientConfig::default().base_url);
    }
}
