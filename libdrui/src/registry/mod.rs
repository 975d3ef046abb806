//! Registry operations.
//!
//! [`Registry`] is what the web layer talks to. It owns the HTTP
//! [`Client`] for one registry and exposes the page-level operations:
//! login, repository and tag listing, manifest resolution and delete.
//! Callers pass a [`RequestContext`] on every call; the registry itself
//! keeps no per-user state.

use crate::auth::{AuthProvider, Credentials};
use crate::client::Client;
use crate::config::Config;
use crate::error::{DruiError, Lookup, Result};
use crate::manifest::{ManifestResolver, ResolvedManifest};
use crate::request::{RequestContext, accept_headers};
use crate::version::sort_tags;
use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;


/// Response from the catalog endpoint listing repositories.
#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    repositories: Vec<String>,
}

/// Registry client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct Registry {
    client: Client,
}

impl Registry {
    /// Creates a new `Registry` from a configured HTTP client.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::client::Client;
    /// use libdrui::registry::Registry;
    ///
    /// let client = Client::new("http://localhost:5000").unwrap();
    /// let registry = Registry::new(client);
    /// assert_eq!(registry.registry_url(), "http://localhost:5000");
    /// ```
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a `Registry` for the endpoint and network settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::with_config(config.registry_endpoint()?, config.client_config())?;
        Ok(Self::new(client))
    }

    pub fn registry_url(&self) -> &str {
        self.client.registry_url()
    }

    /// Validates `username`/`password` against the registry and stores them
    /// in the context's session.
    ///
    /// The registry is first probed without credentials to learn its
    /// authentication scheme. An unsupported (or missing) scheme fails with
    /// [`crate::DruiError::UnsupportedAuthProvider`] and leaves the session as it
    /// was. If the registry then rejects the credentials, the session is
    /// cleared and the error returned.
    pub async fn login(
        &self,
        ctx: &mut RequestContext,
        username: &str,
        password: &str,
    ) -> Result<bool> {
        let probe_ctx =
            RequestContext::default().with_inbound_headers(ctx.inbound_headers().clone());
        let probe = self
            .client
            .execute(Method::GET, "/v2/", &probe_ctx, &HeaderMap::new())
            .await?;

        let challenge = probe
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok());
        let provider = AuthProvider::from_challenge(challenge)?;

        ctx.session_mut()
            .store(Credentials::basic(username, password), provider);

        let verified = async {
            let response = self
                .client
                .execute(Method::GET, "/v2/", &*ctx, &HeaderMap::new())
                .await?;
            Client::check_response_status(response).await.map(|_| true)
        }
        .await;

        if verified.is_err() {
            tracing::debug!(%username, %provider, "login rejected");
            ctx.session_mut().clear();
        } else {
            tracing::info!(%username, %provider, "logged in");
        }
        verified
    }

    /// Forgets the session's credentials.
    pub fn logout(&self, ctx: &mut RequestContext) {
        ctx.session_mut().clear();
    }

    /// Lists all repositories in the registry (catalog operation).
    ///
    /// Follows `Link: <...>; rel="next"` pagination until the registry
    /// stops sending one or repeats the page just fetched. A link to
    /// another host is a validation error.
    pub async fn repositories(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        let mut repositories = Vec::new();
        let mut next = Some("/v2/_catalog".to_string());

        while let Some(uri) = next.take() {
            let response = self
                .client
                .execute(Method::GET, &uri, ctx, &HeaderMap::new())
                .await?;
            let response = Client::check_response_status(response).await?;

            next = match Client::extract_next_link(response.headers()) {
                Some(link) => {
                    let link = self.catalog_page(link)?;
                    if link == uri {
                        tracing::warn!(%link, "Registry repeated catalog page, stopping");
                        None
                    } else {
                        Some(link)
                    }
                }
                None => None,
            };

            let page: CatalogResponse = Client::read_json(response, "catalog").await?;
            repositories.extend(page.repositories);
        }

        Ok(repositories)
    }

    /// Reduces a catalog `Link` target to a path on this registry.
    fn catalog_page(&self, link: String) -> Result<String> {
        if let Some(path) = link.strip_prefix(self.client.registry_url()) {
            return Ok(path.to_string());
        }
        if link.starts_with("http://") || link.starts_with("https://") {
            return Err(DruiError::validation(format!(
                "Catalog link points outside the registry: {}",
                link
            )));
        }
        Ok(link)
    }

    /// Lists the tags of `image`, sorted by version order.
    ///
    /// Returns [`Lookup::NotFound`] when the repository does not exist or
    /// the registry reports its tags as `null` (a repository whose tags were
    /// all deleted).
    pub async fn tags(&self, ctx: &RequestContext, image: &str) -> Result<Lookup<Vec<String>>> {
        let response = self
            .client
            .execute(
                Method::GET,
                &format!("/v2/{}/tags/list", image),
                ctx,
                &accept_headers(),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }
        let response = Client::check_response_status(response).await?;

        let body: Value = Client::read_json(response, "tags").await?;
        let tags = match body.get("tags") {
            None => Some(Vec::new()),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|tag| tag.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>(),
            Some(_) => None,
        };

        Ok(match tags {
            Some(mut tags) => {
                sort_tags(&mut tags);
                Lookup::Found(tags)
            }
            None => Lookup::NotFound,
        })
    }

    /// Resolves `image:tag` (or `image@digest`) to a single manifest.
    ///
    /// See [`ManifestResolver::resolve`].
    pub async fn manifest(
        &self,
        ctx: &RequestContext,
        image: &str,
        tag: &str,
        digest: Option<&str>,
    ) -> Result<Lookup<ResolvedManifest>> {
        ManifestResolver::new(&self.client)
            .resolve(ctx, image, tag, digest)
            .await
    }

    /// Deletes the manifest `image:tag` currently points at.
    ///
    /// Returns `false` without issuing a DELETE when the tag does not
    /// resolve. Deleting removes the manifest by digest, so every other tag
    /// pointing at the same manifest goes with it.
    pub async fn delete(&self, ctx: &RequestContext, image: &str, tag: &str) -> Result<bool> {
        let manifest = match self.manifest(ctx, image, tag, None).await? {
            Lookup::Found(manifest) => manifest,
            Lookup::NotFound => return Ok(false),
        };

        let response = self
            .client
            .execute(
                Method::DELETE,
                &format!("/v2/{}/manifests/{}", image, manifest.digest),
                ctx,
                &accept_headers(),
            )
            .await?;
        Client::check_response_status(response).await?;

        tracing::info!(%image, %tag, digest = %manifest.digest, "deleted manifest");
        Ok(true)
    }
}

impl From<Client> for Registry {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}
