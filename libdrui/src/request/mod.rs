//! Outbound request construction.
//!
//! Every call to the registry is built from the inbound (browser) request's
//! headers, minus the per-hop ones, overlaid with the headers the operation
//! needs, plus the session's credentials.

use crate::auth::Session;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_LENGTH, COOKIE, HOST, HeaderMap, HeaderName, HeaderValue,
    USER_AGENT,
};

pub use reqwest::Method;
pub use reqwest::header;


/// Media types accepted on manifest, blob and tag requests, most specific first.
pub const MANIFEST_MEDIA_TYPES: [&str; 4] = [
    "application/vnd.oci.image.index.v1+json",
    "application/vnd.docker.distribution.manifest.list.v2+json",
    "application/vnd.docker.distribution.manifest.v2+json",
    "application/vnd.oci.image.manifest.v1+json",
];

/// Headers never forwarded from the inbound request.
pub static FORBIDDEN_HEADERS: [HeaderName; 4] = [CONTENT_LENGTH, COOKIE, USER_AGENT, HOST];

/// The `Accept` header sent on every manifest-related request.
///
/// # Examples
///
/// ```
/// use libdrui::request::accept_headers;
///
/// let headers = accept_headers();
/// assert!(headers["accept"].to_str().unwrap().starts_with("application/vnd.oci.image.index.v1+json,"));
/// ```
pub fn accept_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(concat!(
            "application/vnd.oci.image.index.v1+json,",
            "application/vnd.docker.distribution.manifest.list.v2+json,",
            "application/vnd.docker.distribution.manifest.v2+json,",
            "application/vnd.oci.image.manifest.v1+json"
        )),
    );
    headers
}

/// Merges inbound and explicit headers for forwarding.
///
/// Explicit headers replace inbound ones of the same name (all values).
/// [`FORBIDDEN_HEADERS`] are dropped from both sides.
pub fn forwarded_headers(inbound: &HeaderMap, explicit: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len() + explicit.len());

    for (name, value) in inbound {
        if !FORBIDDEN_HEADERS.contains(name) && !explicit.contains_key(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    for (name, value) in explicit {
        if !FORBIDDEN_HEADERS.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    headers
}

/// Everything a registry call needs to know about the inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    session: Session,
    inbound_headers: HeaderMap,
}

impl RequestContext {
    /// Creates a context for `session` with no inbound headers.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            inbound_headers: HeaderMap::new(),
        }
    }

    /// Attaches the headers of the browser request being served.
    pub fn with_inbound_headers(mut self, headers: HeaderMap) -> Self {
        self.inbound_headers = headers;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn inbound_headers(&self) -> &HeaderMap {
        &self.inbound_headers
    }

    /// Hands the (possibly updated) session back to the caller.
    pub fn into_session(self) -> Session {
        self.session
    }
}

/// A fully formed request to the registry.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
}

impl OutboundRequest {
    /// Builds the request for `endpoint + uri`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::auth::{AuthProvider, Credentials, Session};
    /// use libdrui::request::{Method, OutboundRequest, RequestContext, accept_headers};
    ///
    /// let session = Session::authenticated(Credentials::basic("user", "pass"), AuthProvider::Basic);
    /// let ctx = RequestContext::new(session);
    /// let request = OutboundRequest::build(
    ///     "http://localhost:5000",
    ///     Method::GET,
    ///     "/v2/alpine/manifests/latest",
    ///     &ctx,
    ///     &accept_headers(),
    /// );
    /// assert_eq!(request.url(), "http://localhost:5000/v2/alpine/manifests/latest");
    /// assert!(request.headers().contains_key("authorization"));
    /// ```
    pub fn build(
        endpoint: &str,
        method: Method,
        uri: &str,
        ctx: &RequestContext,
        explicit: &HeaderMap,
    ) -> Self {
        let mut headers = forwarded_headers(ctx.inbound_headers(), explicit);

        if let Some(value) = ctx.session().authorization()
            && let Ok(value) = HeaderValue::from_str(&value)
        {
            headers.insert(AUTHORIZATION, value);
        }

        Self {
            method,
            url: format!("{}{}", endpoint, uri),
            headers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn into_parts(self) -> (Method, String, HeaderMap) {
        (self.method, self.url, self.headers)
    }
}
