//! Application configuration.
//!
//! Configuration is layered: serde defaults, then a YAML file, then
//! `DRUI_*` environment variables (see [`Config::apply_overrides`]).
//! Command-line flags are applied last by the binary.

use crate::client::ClientConfig;
use crate::error::{DruiError, Result};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "DRUI";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub network: Network,
    /// Refuse tag deletion in the UI
    #[serde(default)]
    pub disable_delete: bool,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// A missing file is not an error; the defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(false));
        }

        Self::from_builder(builder, path)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            DruiError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                DruiError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })
    }

    /// Applies `DRUI_<SECTION>_<OPTION>` overrides looked up through `lookup`.
    ///
    /// Values that do not parse for their option are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_overrides(|key| match key {
    ///     "DRUI_REGISTRY_ENDPOINT" => Some("localhost:5000".to_string()),
    ///     "DRUI_DISABLE_DELETE" => Some("yes".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.registry.endpoint.as_deref(), Some("localhost:5000"));
    /// assert!(config.disable_delete);
    /// ```
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |option: &str| {
            let key = format!("{}_{}", ENV_PREFIX, option);
            lookup(&key)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (key, value))
        };

        if let Some((_, value)) = get("REGISTRY_ENDPOINT") {
            self.registry.endpoint = Some(value);
        }
        if let Some((_, value)) = get("REGISTRY_PULL_ENDPOINT") {
            self.registry.pull_endpoint = Some(value);
        }
        if let Some((key, value)) = get("DISABLE_DELETE") {
            match parse_bool(&value) {
                Some(flag) => self.disable_delete = flag,
                None => tracing::warn!(%key, %value, "ignoring non-boolean override"),
            }
        }
        if let Some((key, value)) = get("NETWORK_TIMEOUT") {
            match value.trim().parse() {
                Ok(seconds) => self.network.timeout = seconds,
                Err(_) => tracing::warn!(%key, %value, "ignoring non-integer override"),
            }
        }
        if let Some((_, value)) = get("LOGGING_LEVEL") {
            self.logging.level = value;
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// The registry endpoint, or a configuration error when unset.
    pub fn registry_endpoint(&self) -> Result<&str> {
        self.registry
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| DruiError::config("Registry endpoint not set", None))
    }

    /// Host shown in `docker pull` hints: the pull endpoint if set, else the
    /// registry endpoint, without scheme.
    pub fn pull_host(&self) -> Option<String> {
        let endpoint = self
            .registry
            .pull_endpoint
            .as_deref()
            .or(self.registry.endpoint.as_deref())?;
        let host = endpoint
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        (!host.is_empty()).then(|| host.to_string())
    }

    /// HTTP client settings derived from the network section.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.network.timeout)
            .with_max_idle_per_host(self.network.max_idle_per_host)
    }
}

/// Accepts the spellings an INI-style boolean takes.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Registry connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Registry {
    /// Base URL of the registry API, e.g. `https://registry.example.com`
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Public host for pull commands, when it differs from `endpoint`
    #[serde(default)]
    pub pull_endpoint: Option<String>,
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            max_idle_per_host: default_max_idle_per_host(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

fn default_max_idle_per_host() -> usize {
    10
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Logging {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_logging_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
        }
    }
}

fn default_logging_level() -> String {
    "warn".to_string()
}
