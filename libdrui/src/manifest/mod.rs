//! Manifest resolution.
//!
//! A tag may point at a single-platform manifest or at a multi-arch index
//! (OCI image index / Docker manifest list). The resolver always ends on a
//! single manifest: it follows an index to its first platform entry, then
//! fetches that manifest's configuration blob.

use crate::client::Client;
use crate::digest::Digest;
use crate::error::{DruiError, Lookup, Result};
use crate::request::{RequestContext, accept_headers};
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

#[cfg(test)]
mod tests;

const CONTENT_DIGEST_HEADER: &str = "Docker-Content-Digest";

/// Platform of an index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub architecture: String,
    pub os: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// One per-platform manifest listed by an image index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

/// Reference to a blob (the image configuration, a layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A tag resolved down to a single manifest and its configuration.
///
/// The manifest body and the configuration blob are kept as separate open
/// maps so that neither can shadow the other or the computed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedManifest {
    /// Content digest of the manifest, used for deletion.
    ///
    /// Taken from `Docker-Content-Digest`. Registries that omit the header
    /// get `sha256:<hex>` of the raw body, algorithm prefix included, so
    /// the value is always a valid manifest reference.
    pub digest: String,
    /// Digest of the configuration blob (the image ID)
    pub id: Option<String>,
    /// Entries of the multi-arch index the tag points at, if any
    pub manifests: Option<Vec<IndexEntry>>,
    /// The manifest's configuration reference
    pub config: Descriptor,
    /// Full manifest body
    pub manifest: Map<String, Value>,
    /// Full configuration blob (architecture, os, created, config.Labels, ...)
    pub image_config: Map<String, Value>,
}

impl ResolvedManifest {
    pub fn media_type(&self) -> Option<&str> {
        self.manifest.get("mediaType").and_then(Value::as_str)
    }

    pub fn architecture(&self) -> Option<&str> {
        self.image_config.get("architecture").and_then(Value::as_str)
    }

    pub fn os(&self) -> Option<&str> {
        self.image_config.get("os").and_then(Value::as_str)
    }

    /// Image creation time from the configuration blob.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        let created = self.image_config.get("created")?.as_str()?;
        DateTime::parse_from_rfc3339(created)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Image labels (`config.Labels`).
    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.image_config
            .get("config")?
            .get("Labels")?
            .as_object()
    }

    /// Layer descriptors; malformed entries are skipped.
    pub fn layers(&self) -> Vec<Descriptor> {
        self.manifest
            .get("layers")
            .and_then(Value::as_array)
            .map(|layers| {
                layers
                    .iter()
                    .filter_map(|layer| serde_json::from_value(layer.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compressed image size: configuration plus all layers.
    pub fn total_size(&self) -> u64 {
        self.config.size.unwrap_or(0)
            + self
                .layers()
                .iter()
                .filter_map(|layer| layer.size)
                .sum::<u64>()
    }
}

/// Resolves tags to [`ResolvedManifest`]s.
#[derive(Debug, Clone, Copy)]
pub struct ManifestResolver<'a> {
    client: &'a Client,
}

impl<'a> ManifestResolver<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Resolves `image:tag`, or `image@digest` when `digest` is given.
    ///
    /// The tag is always fetched first so a multi-arch index is reported in
    /// [`ResolvedManifest::manifests`]. The manifest actually resolved is
    /// the index's first entry if the tag is an index, else `digest` if
    /// given, else the tag itself.
    ///
    /// Returns [`Lookup::NotFound`] when the manifest does not exist or has
    /// no configuration reference.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        image: &str,
        tag: &str,
        digest: Option<&str>,
    ) -> Result<Lookup<ResolvedManifest>> {
        let manifests = self.fetch_index(ctx, image, tag).await?;

        let reference = match manifests.as_deref() {
            Some([first, ..]) => first.digest.as_str(),
            _ => digest.unwrap_or(tag),
        };

        let response = self
            .client
            .execute(
                Method::GET,
                &format!("/v2/{}/manifests/{}", image, reference),
                ctx,
                &accept_headers(),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }
        let response = Client::check_response_status(response).await?;

        let header_digest = content_digest(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| DruiError::unavailable_with_source("Failed to read manifest response", e))?;
        let digest = match header_digest {
            Some(digest) => digest,
            None => Digest::sha256(&body)?.to_string(),
        };

        let manifest: Map<String, Value> = serde_json::from_slice(&body)
            .map_err(|e| DruiError::validation_with_source("Failed to parse manifest", e))?;

        let Some(config) = manifest
            .get("config")
            .and_then(|config| serde_json::from_value::<Descriptor>(config.clone()).ok())
        else {
            tracing::warn!(%image, %reference, ?manifest, "Unknown manifest");
            return Ok(Lookup::NotFound);
        };

        let (image_config, id) = self.fetch_config(ctx, image, &config).await?;

        Ok(Lookup::Found(ResolvedManifest {
            digest,
            id,
            manifests,
            config,
            manifest,
            image_config,
        }))
    }

    /// Fetches `tag` and returns its index entries if it is a multi-arch index.
    ///
    /// A missing tag is not an error here; the follow-up fetch decides.
    async fn fetch_index(
        &self,
        ctx: &RequestContext,
        image: &str,
        tag: &str,
    ) -> Result<Option<Vec<IndexEntry>>> {
        let response = self
            .client
            .execute(
                Method::GET,
                &format!("/v2/{}/manifests/{}", image, tag),
                ctx,
                &accept_headers(),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Client::check_response_status(response).await?;

        let body: Value = Client::read_json(response, "manifest").await?;
        match body.get("manifests") {
            Some(entries @ Value::Array(_)) => serde_json::from_value(entries.clone())
                .map(Some)
                .map_err(|e| DruiError::validation_with_source("Invalid manifest list", e)),
            _ => Ok(None),
        }
    }

    /// Fetches the configuration blob and its digest header.
    async fn fetch_config(
        &self,
        ctx: &RequestContext,
        image: &str,
        config: &Descriptor,
    ) -> Result<(Map<String, Value>, Option<String>)> {
        let digest = Digest::from_str(&config.digest)?;

        let response = self
            .client
            .execute(
                Method::GET,
                &format!("/v2/{}/blobs/{}", image, digest),
                ctx,
                &accept_headers(),
            )
            .await?;
        let response = Client::check_response_status(response).await?;

        let id = content_digest(&response);
        let image_config = Client::read_json(response, "image configuration").await?;

        Ok((image_config, id))
    }
}

fn content_digest(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_DIGEST_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
