//! Authentication handling for the registry.
//!
//! drui forwards a single scheme, HTTP Basic, on every request. The scheme
//! is discovered from the registry's `Www-Authenticate` challenge at login
//! and kept, together with the credentials, in a [`Session`] owned by the
//! caller. Nothing here is persisted.

use crate::error::{DruiError, Result};
use std::fmt;
use std::str::FromStr;


/// Username and password supplied at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// assert_eq!(creds.username(), "username");
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the Authorization header value for these credentials under `provider`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::auth::{AuthProvider, Credentials};
    ///
    /// let creds = Credentials::basic("user", "pass");
    /// assert_eq!(creds.to_header_value(AuthProvider::Basic), "Basic dXNlcjpwYXNz");
    /// ```
    pub fn to_header_value(&self, provider: AuthProvider) -> String {
        match provider {
            AuthProvider::Basic => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", self.username, self.password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                format!("Basic {}", encoded)
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication schemes drui can forward to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    /// HTTP Basic, e.g. a registry backed by an htpasswd file
    Basic,
}

impl AuthProvider {
    /// Every supported provider.
    pub const SUPPORTED: &'static [AuthProvider] = &[AuthProvider::Basic];

    /// Lower-case scheme name as it appears in a challenge.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
        }
    }

    /// Extracts the scheme name from a `Www-Authenticate` header value.
    ///
    /// The scheme is the first whitespace-delimited token, lower-cased.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::auth::AuthProvider;
    ///
    /// let scheme = AuthProvider::challenge_scheme(Some(r#"Basic realm="registry""#));
    /// assert_eq!(scheme.as_deref(), Some("basic"));
    /// assert_eq!(AuthProvider::challenge_scheme(None), None);
    /// ```
    pub fn challenge_scheme(header: Option<&str>) -> Option<String> {
        header?
            .split_whitespace()
            .next()
            .map(|scheme| scheme.to_lowercase())
    }

    /// Resolves the provider a registry challenges with.
    ///
    /// A missing header or a scheme outside [`AuthProvider::SUPPORTED`]
    /// fails with [`DruiError::UnsupportedAuthProvider`].
    pub fn from_challenge(header: Option<&str>) -> Result<Self> {
        match Self::challenge_scheme(header) {
            Some(scheme) => scheme.parse(),
            None => Err(DruiError::unsupported_auth_provider(None::<String>)),
        }
    }
}

impl FromStr for AuthProvider {
    type Err = DruiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DruiError::unsupported_auth_provider(Some(s)))
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user session state.
///
/// Holds the credentials and provider recorded at login. An empty session
/// sends unauthenticated requests. The session is owned by the caller (the
/// web layer keeps one per browser session) and handed to the registry
/// client on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<(Credentials, AuthProvider)>,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that already carries credentials.
    pub fn authenticated(credentials: Credentials, provider: AuthProvider) -> Self {
        Self {
            auth: Some((credentials, provider)),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.auth.as_ref().map(|(credentials, _)| credentials)
    }

    pub fn provider(&self) -> Option<AuthProvider> {
        self.auth.as_ref().map(|(_, provider)| *provider)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Value for the `Authorization` header, if the session is authenticated.
    pub fn authorization(&self) -> Option<String> {
        self.auth
            .as_ref()
            .map(|(credentials, provider)| credentials.to_header_value(*provider))
    }

    pub(crate) fn store(&mut self, credentials: Credentials, provider: AuthProvider) {
        self.auth = Some((credentials, provider));
    }

    /// Forgets the stored credentials (logout).
    pub fn clear(&mut self) {
        self.auth = None;
    }
}
