//! Provider configuration structures.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding [`ProviderConfig::host`].
pub const HOST_ENV: &str = "DEPENDENCYTRACK_HOST";

/// Environment variable overriding [`ProviderConfig::api_key`].
pub const API_KEY_ENV: &str = "DEPENDENCYTRACK_API_KEY";

/// Connection settings for one Dependency-Track instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the instance, e.g. `https://dtrack.example.com`
    #[serde(default)]
    pub host: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl ProviderConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `DEPENDENCYTRACK_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(HOST_ENV).filter(|v| !v.trim().is_empty()) {
            self.host = host;
        }
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = api_key;
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::attribute(
                "host",
                "Missing Dependency-Track API host: the provider cannot create the API client without it",
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(AppError::attribute(
                "api_key",
                "Missing Dependency-Track API key: the provider cannot create the API client without it",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

mod defaults {
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        format!("dtrack-provider/{}", env!("CARGO_PKG_VERSION"))
    }
}
