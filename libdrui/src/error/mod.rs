//! Error types for drui
//!
//! Every registry-client operation returns [`Result`]. Outcomes the web layer
//! renders as an "empty" page (a missing repository, a missing tag) are not
//! errors: they come back as [`Lookup::NotFound`].

use thiserror::Error;


/// Main error type for drui operations
#[derive(Error, Debug)]
pub enum DruiError {
    /// The registry challenged with an authentication scheme drui cannot speak
    #[error("Auth provider \"{}\" not supported", .provider.as_deref().unwrap_or("none"))]
    UnsupportedAuthProvider { provider: Option<String> },

    /// The registry answered 401; the caller should drop the session and re-prompt
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other non-successful registry response
    #[error("HTTP {status} {reason} from {url}")]
    Http {
        status: u16,
        reason: String,
        url: String,
    },

    /// The registry could not be reached (connection refused, timeout, DNS)
    #[error("Registry unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed registry payloads, invalid digests, bad input
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for drui operations
pub type Result<T> = std::result::Result<T, DruiError>;

impl DruiError {
    /// Creates a new unsupported-auth-provider error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::error::DruiError;
    ///
    /// let err = DruiError::unsupported_auth_provider(Some("bearer"));
    /// assert_eq!(err.to_string(), "Auth provider \"bearer\" not supported");
    /// ```
    pub fn unsupported_auth_provider<S: Into<String>>(provider: Option<S>) -> Self {
        Self::UnsupportedAuthProvider {
            provider: provider.map(Into::into),
        }
    }

    /// Creates a new unauthorized error.
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new HTTP error from a status code, its reason phrase and the request URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::error::DruiError;
    ///
    /// let err = DruiError::http(500, "Internal Server Error", "http://localhost:5000/v2/");
    /// assert_eq!(err.status_code(), Some(500));
    /// ```
    pub fn http<R: Into<String>, U: Into<String>>(status: u16, reason: R, url: U) -> Self {
        Self::Http {
            status,
            reason: reason.into(),
            url: url.into(),
        }
    }

    /// Creates a new unavailable error.
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new unavailable error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::error::DruiError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    /// let err = DruiError::unavailable_with_source("failed to connect", io_err);
    /// assert!(matches!(err, DruiError::Unavailable { .. }));
    /// ```
    pub fn unavailable_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::error::DruiError;
    ///
    /// let err = DruiError::config("invalid config file", Some("/etc/drui/config.yaml"));
    /// assert!(matches!(err, DruiError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true when the registry rejected the session's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            Self::Unavailable { .. } => Some(503),
            _ => None,
        }
    }
}

/// Outcome of a lookup that may legitimately find nothing.
///
/// Registry 404s for tags and manifests are part of normal browsing (an
/// empty repository, a deleted tag) and are reported as `NotFound` instead
/// of an error. Failures stay in the surrounding [`Result`].
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Converts into an `Option`, discarding the distinction.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Self::Found(value) => Lookup::Found(value),
            Self::NotFound => Lookup::NotFound,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}
