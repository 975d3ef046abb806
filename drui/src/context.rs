//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables (`DRUI_*`)
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::{ColorChoice, OutputFormat};
use libdrui::{Config, Credentials, DruiError, Registry, RequestContext};
use std::path::{Path, PathBuf};

/// How much diagnostic output to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    /// Maps the number of `-v` flags to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::VeryVerbose,
            _ => Self::Trace,
        }
    }

    /// Log filter directive for this level, if it raises the configured one
    pub fn log_filter(&self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Verbose => Some("info"),
            Self::VeryVerbose => Some("debug"),
            Self::Trace => Some("trace"),
        }
    }
}

/// Values given on the command line that take precedence over configuration
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    pub color: ColorChoice,
    pub verbosity: VerbosityLevel,
    pub format: OutputFormat,
    credentials: Option<Credentials>,
}

/// Default configuration file: `<config dir>/drui/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("drui").join("config.yaml"))
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(
        config_path: Option<&Path>,
        overrides: CliOverrides,
        color: ColorChoice,
        verbosity: VerbosityLevel,
        format: OutputFormat,
    ) -> Result<Self, DruiError> {
        let default_path = default_config_path();
        let path = config_path.or(default_path.as_deref());

        let mut config = Config::load(path)?;
        config.apply_env();

        Ok(Self::from_config(config, overrides, color, verbosity, format))
    }

    /// Build context from an already loaded configuration
    pub fn from_config(
        mut config: Config,
        overrides: CliOverrides,
        color: ColorChoice,
        verbosity: VerbosityLevel,
        format: OutputFormat,
    ) -> Self {
        if let Some(endpoint) = overrides.endpoint {
            config.registry.endpoint = Some(endpoint);
        }
        if let Some(timeout) = overrides.timeout {
            config.network.timeout = timeout;
        }

        let credentials = overrides
            .username
            .map(|username| Credentials::basic(username, overrides.password.unwrap_or_default()));

        Self {
            config,
            color,
            verbosity,
            format,
            credentials,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Registry client for the configured endpoint
    pub fn registry(&self) -> Result<Registry, DruiError> {
        Registry::from_config(&self.config)
    }

    /// Request context for one command, logged in when credentials were given
    pub async fn request_context(&self, registry: &Registry) -> Result<RequestContext, DruiError> {
        let mut ctx = RequestContext::default();
        if let Some(credentials) = &self.credentials {
            registry
                .login(&mut ctx, credentials.username(), credentials.password())
                .await?;
        }
        Ok(ctx)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
