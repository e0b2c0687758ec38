//! Client configuration via environment variables or a `quiver.toml` file.
//!
//! Only [`IndexConfig::from_env`] touches the process environment; everything
//! else takes explicit values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use quiver_core::{Error, Result};
use quiver_transport::telemetry::{self, telemetry_headers};
use quiver_transport::{HttpClientConfig, RetryConfig, SignalSource};

/// Environment variable holding the index REST URL.
pub const URL_ENV: &str = "UPSTASH_VECTOR_REST_URL";
/// Environment variable holding the index REST token.
pub const TOKEN_ENV: &str = "UPSTASH_VECTOR_REST_TOKEN";
/// Environment variable that, when set, disables telemetry headers.
pub const DISABLE_TELEMETRY_ENV: &str = "UPSTASH_DISABLE_TELEMETRY";

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "quiver.toml";

fn default_true() -> bool {
    true
}

/// Connection settings for an [`Index`](crate::Index).
///
/// # Example
///
/// ```toml
/// url = "https://my-index.example.com"
/// token = "secret"
///
/// # Retries transport failures 5 times by default. `retry = false` disables.
/// [retry]
/// retries = 3
///
/// # enable_telemetry = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index REST URL
    pub url: String,
    /// Bearer token
    pub token: String,
    /// Retry policy for transport failures
    #[serde(default)]
    pub retry: RetryConfig,
    /// Send SDK/platform/runtime telemetry headers
    #[serde(default = "default_true")]
    pub enable_telemetry: bool,
    /// Cancellation for every request made through this config
    #[serde(skip)]
    pub signal: Option<SignalSource>,
}

impl IndexConfig {
    /// Config with default retry and telemetry.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            retry: RetryConfig::default(),
            enable_telemetry: true,
            signal: None,
        }
    }

    /// Read `UPSTASH_VECTOR_REST_URL`, `UPSTASH_VECTOR_REST_TOKEN` and
    /// `UPSTASH_DISABLE_TELEMETRY` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| Error::Config {
                reason: format!("Unable to find environment variable: `{}`", key),
            })
        };
        let mut config = Self::new(require(URL_ENV)?, require(TOKEN_ENV)?);
        config.enable_telemetry = lookup(DISABLE_TELEMETRY_ENV)
            .filter(|v| !v.is_empty())
            .is_none();
        Ok(config)
    }

    /// Load config from a TOML file. `url` and `token` are required.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        toml::from_str(&content).map_err(|e| Error::Config {
            reason: format!("Failed to parse config file '{}': {}", path.display(), e),
        })
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the cancellation source.
    pub fn with_signal(mut self, signal: impl Into<SignalSource>) -> Self {
        self.signal = Some(signal.into());
        self
    }

    /// Enable or disable telemetry headers.
    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.enable_telemetry = enabled;
        self
    }

    /// Transport settings for this config.
    ///
    /// Credentials with stray whitespace are logged, not rejected.
    pub fn http_config(&self) -> HttpClientConfig {
        telemetry::warn_if_malformed("url", &self.url);
        telemetry::warn_if_malformed("token", &self.token);

        let mut http = HttpClientConfig::new(self.url.clone())
            .bearer(&self.token)
            .retry(self.retry.clone());
        if self.enable_telemetry {
            for (name, value) in telemetry_headers() {
                http = http.header(name, value);
            }
        }
        if let Some(signal) = &self.signal {
            http = http.signal(signal.clone());
        }
        http
    }
}
