//! HTTP client for registry communication.
//!
//! A thin transport built on reqwest: it sends [`OutboundRequest`]s to one
//! registry endpoint and translates transport failures and error statuses
//! into [`DruiError`]s. It never retries.

use crate::error::{DruiError, Result};
use crate::request::{OutboundRequest, RequestContext};
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;


/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libdrui::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// HTTP client bound to a single registry endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://registry.example.com")
    registry_url: String,
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client for the specified registry URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::client::Client;
    ///
    /// let client = Client::new("localhost:5000/").unwrap();
    /// assert_eq!(client.registry_url(), "http://localhost:5000");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default())
    }

    /// Creates a new client for the specified registry URL with custom configuration.
    pub fn with_config(registry_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| DruiError::validation_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(DruiError::config("Registry endpoint not set", None));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Builds a request for `uri` (relative to the registry URL).
    pub fn prepare(
        &self,
        method: Method,
        uri: &str,
        ctx: &RequestContext,
        headers: &HeaderMap,
    ) -> OutboundRequest {
        OutboundRequest::build(&self.registry_url, method, uri, ctx, headers)
    }

    /// Sends a prepared request.
    ///
    /// Any response, including error statuses, is returned as is; only
    /// transport failures become errors ([`DruiError::Unavailable`]).
    pub async fn send(&self, request: OutboundRequest) -> Result<Response> {
        let (method, url, headers) = request.into_parts();
        tracing::debug!(%method, %url, "registry request");

        let response = self
            .http_client
            .request(method, &url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;

        tracing::debug!(status = response.status().as_u16(), %url, "registry response");
        Ok(response)
    }

    /// Builds and sends a request in one step.
    pub async fn execute(
        &self,
        method: Method,
        uri: &str,
        ctx: &RequestContext,
        headers: &HeaderMap,
    ) -> Result<Response> {
        self.send(self.prepare(method, uri, ctx, headers)).await
    }

    /// Translates a reqwest error into a DruiError.
    fn translate_reqwest_error(&self, error: reqwest::Error) -> DruiError {
        if error.is_timeout() {
            DruiError::unavailable_with_source(
                format!(
                    "Request to {} timed out after {} seconds",
                    self.registry_url, self.timeout_seconds
                ),
                error,
            )
        } else if error.is_connect() {
            DruiError::unavailable_with_source(
                format!("Failed to connect to registry at {}", self.registry_url),
                error,
            )
        } else {
            DruiError::unavailable_with_source(
                format!("Network error communicating with {}", self.registry_url),
                error,
            )
        }
    }

    /// Checks the HTTP response status and translates errors to DruiError.
    ///
    /// 2xx and 3xx pass; 401 becomes [`DruiError::Unauthorized`], anything
    /// else [`DruiError::Http`] with the status and its reason phrase.
    pub async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let reason = status.canonical_reason().unwrap_or("Unknown Status");

        if status == StatusCode::UNAUTHORIZED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("(unable to read response body)"));
            return Err(DruiError::unauthorized(format!(
                "Authentication required for {}: {}",
                url,
                body.trim()
            )));
        }

        Err(DruiError::http(status.as_u16(), reason, url))
    }

    /// Reads a JSON response body.
    pub async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        response.json().await.map_err(|e| {
            DruiError::validation_with_source(format!("Failed to parse {} response", what), e)
        })
    }

    /// Extracts the next page path from a `Link` header.
    ///
    /// Format: `</v2/_catalog?n=100&last=repo99>; rel="next"`
    pub fn extract_next_link(headers: &HeaderMap) -> Option<String> {
        let link_header = headers.get(reqwest::header::LINK)?;
        let link_str = link_header.to_str().ok()?;

        for link_part in link_str.split(',') {
            let link_part = link_part.trim();

            if (link_part.contains("rel=\"next\"") || link_part.contains("rel='next'"))
                && let Some(start) = link_part.find('<')
                && let Some(end) = link_part.find('>')
            {
                return Some(link_part[start + 1..end].to_string());
            }
        }

        None
    }
}
