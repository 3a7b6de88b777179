//! Client configuration.
//!
//! Everything needed to build a [`crate::Client`] lives in [`ClientConfig`],
//! built via its [`ClientConfigBuilder`] or overlaid from the environment
//! with [`ClientConfig::from_env`]. The struct is `serde`-friendly so it can
//! be embedded in an application's own config file.
//!
//! # Environment variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `GOTENBERG_URL` | `base_url` | `http://localhost:3000` |
//! | `GOTENBERG_TIMEOUT_SECS` | `timeout_secs` | `0` (no limit) |
//! | `GOTENBERG_CONNECT_TIMEOUT_SECS` | `connect_timeout_secs` | `10` |

use crate::error::GotenbergError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_URL: &str = "GOTENBERG_URL";
pub const ENV_TIMEOUT_SECS: &str = "GOTENBERG_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "GOTENBERG_CONNECT_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for a [`crate::Client`].
///
/// # Example
/// ```rust
/// use gotenberg_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://gotenberg:3000")
///     .timeout_secs(120)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://gotenberg:3000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the Gotenberg service, without a trailing route.
    pub base_url: String,

    /// Whole-request timeout enforced by the HTTP client, in seconds.
    /// `0` disables it; a per-call [`crate::Context`] deadline still applies.
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds. Default: 10.
    pub connect_timeout_secs: u64,

    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 0,
            connect_timeout_secs: 10,
            user_agent: concat!("gotenberg-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overlaid with the `GOTENBERG_*` environment variables.
    pub fn from_env() -> Result<Self, GotenbergError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GotenbergError> {
        let mut builder = Self::builder();
        if let Some(url) = lookup(ENV_URL) {
            builder = builder.base_url(url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            builder = builder.timeout_secs(parse_secs(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT_SECS) {
            builder = builder.connect_timeout_secs(parse_secs(ENV_CONNECT_TIMEOUT_SECS, &secs)?);
        }
        builder.build()
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

fn parse_secs(var: &str, raw: &str) -> Result<u64, GotenbergError> {
    raw.trim().parse().map_err(|_| {
        GotenbergError::InvalidConfig(format!("{var} must be a whole number of seconds, got '{raw}'"))
    })
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, GotenbergError> {
        let mut config = self.config;
        config.base_url = normalize_base_url(&config.base_url)?;
        if config.user_agent.trim().is_empty() {
            return Err(GotenbergError::InvalidConfig(
                "User agent must not be empty".into(),
            ));
        }
        Ok(config)
    }
}

/// Check that `url` is an absolute HTTP(S) URL and strip trailing slashes.
pub(crate) fn normalize_base_url(url: &str) -> Result<String, GotenbergError> {
    let invalid = |reason: String| GotenbergError::InvalidBaseUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".into()));
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(10)));
        assert!(config.user_agent.starts_with("gotenberg-client/"));
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let config = ClientConfig::builder()
            .base_url("https://convert.example.com/gotenberg/")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "https://convert.example.com/gotenberg");
    }

    #[test]
    fn builder_rejects_bad_urls() {
        for url in ["localhost:3000", "ftp://host", "not a url", "http://h/?q=1"] {
            let err = ClientConfig::builder().base_url(url).build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Construction, "url {url}");
        }
    }

    #[test]
    fn env_overlay() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "http://gotenberg:3000"),
            (ENV_TIMEOUT_SECS, "90"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://gotenberg:3000");
        assert_eq!(config.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn env_rejects_non_numeric_timeout() {
        let err =
            ClientConfig::from_lookup(lookup(&[(ENV_CONNECT_TIMEOUT_SECS, "ten")])).unwrap_err();
        assert!(err.to_string().contains(ENV_CONNECT_TIMEOUT_SECS), "got: {err}");
    }

    #[test]
    fn serde_fills_missing_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://10.0.0.5:3000"}"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:3000");
        assert_eq!(config.connect_timeout_secs, 10);
    }
}
