//! Client configuration.
//!
//! `ClientConfig` and its builder configure the shared HTTP client: base URL,
//! default headers, timeouts, proxy, user agent and the redirect limit.

use crate::error::ApiError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default values.
pub mod defaults {
    use std::time::Duration;

    pub const USER_AGENT: &str = concat!("api-utils/", env!("CARGO_PKG_VERSION"));
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const MAX_REDIRECTS: usize = 10;
}

/// Environment variables read by [`ClientConfig::from_env`].
pub mod env_vars {
    pub const BASE_URL: &str = "API_UTILS_BASE_URL";
    pub const TIMEOUT_MS: &str = "API_UTILS_TIMEOUT_MS";
    pub const USER_AGENT: &str = "API_UTILS_USER_AGENT";
    pub const PROXY: &str = "API_UTILS_PROXY";
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL relative endpoints are joined onto. Also the "own" origin for
    /// same-origin checks.
    pub base_url: Option<String>,
    /// Default request timeout, used when a request does not set its own.
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Headers sent with every request; per-request headers override them.
    pub headers: HashMap<String, String>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
    /// Redirect limit when redirects are followed.
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: None,
            connect_timeout: Some(defaults::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::USER_AGENT.to_string()),
            max_redirects: defaults::MAX_REDIRECTS,
        }
    }
}

impl ClientConfig {
    /// Returns a builder for constructing `ClientConfig`
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Defaults overlaid with `API_UTILS_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ApiError> {
        if let Some(base) = lookup(env_vars::BASE_URL) {
            self.base_url = Some(base);
        }
        if let Some(ms) = lookup(env_vars::TIMEOUT_MS) {
            let ms: u64 = ms.trim().parse().map_err(|e| {
                ApiError::Configuration(format!(
                    "{} must be milliseconds: {e}",
                    env_vars::TIMEOUT_MS
                ))
            })?;
            self.timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(ua) = lookup(env_vars::USER_AGENT) {
            self.user_agent = Some(ua);
        }
        if let Some(proxy) = lookup(env_vars::PROXY) {
            self.proxy = Some(proxy);
        }
        self.validate()?;
        Ok(self)
    }

    /// Parsed base URL, if configured.
    pub fn base(&self) -> Result<Option<Url>, ApiError> {
        self.base_url
            .as_deref()
            .map(|base| {
                Url::parse(base).map_err(|e| ApiError::InvalidUrl {
                    url: base.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        self.base()?;
        if let Some(proxy) = &self.proxy {
            Url::parse(proxy).map_err(|e| ApiError::InvalidUrl {
                url: proxy.clone(),
                reason: e.to_string(),
            })?;
        }
        crate::headers::to_header_map(&self.headers)?;
        Ok(())
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    user_agent: Option<String>,
    max_redirects: Option<usize>,
}

impl ClientConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
    /// Shorthand for an `Authorization: Bearer <token>` default header.
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig, ApiError> {
        let defaults = ClientConfig::default();
        let config = ClientConfig {
            base_url: self.base_url,
            timeout: self.timeout.filter(|t| !t.is_zero()),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            headers: self.headers,
            proxy: self.proxy,
            user_agent: self.user_agent.or(defaults.user_agent),
            max_redirects: self.max_redirects.unwrap_or(defaults.max_redirects),
        };
        config.validate()?;
        Ok(config)
    }
}

// Durations are serialized as whole milliseconds; `0` reads back as unset.
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => (d.as_millis() as u64).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: Option<u64> = Option::deserialize(deserializer)?;
        Ok(millis.filter(|ms| *ms > 0).map(Duration::from_millis))
    }
}
