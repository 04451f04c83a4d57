//! Client configuration: defaults, builder setters and an env overlay.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::log::DEFAULT_LOG_PATH;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "POKEAPI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "POKEAPI_TIMEOUT_SECS";
pub const ENV_LOG_PATH: &str = "POKEAPI_LOG_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied to every request end to end.
    pub timeout: Duration,
    pub log_path: PathBuf,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            user_agent: concat!("pokeapi-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Explicit values (e.g. command-line flags) that win over the environment.
/// An overridden field's variable is never read, so a malformed value there
/// cannot fail the resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub log_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Defaults overlaid with the `POKEAPI_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(&ConfigOverrides::default())
    }

    /// `overrides`, then the `POKEAPI_*` environment variables, then defaults.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |var| std::env::var(var).ok())
    }

    fn resolve_with(
        overrides: &ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = overrides.base_url.clone().or_else(|| lookup(ENV_BASE_URL)) {
            config.base_url = url;
        }
        if let Some(timeout) = overrides.timeout {
            config.timeout = timeout;
        } else if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = overrides
            .log_path
            .clone()
            .or_else(|| lookup(ENV_LOG_PATH).map(PathBuf::from))
        {
            config.log_path = path;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = log_path.into();
        self
    }
}
