//! drui - Docker Registry UI core library
//!
//! libdrui is the registry-client core behind the drui web front-end. It
//! talks to a container registry's Distribution API v2 to list
//! repositories and tags, resolve manifests (following multi-arch indexes)
//! and delete tags.
//!
//! # Quick Start
//!
//! ```no_run
//! use libdrui::{Config, Lookup, Registry, RequestContext};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.registry.endpoint = Some("http://localhost:5000".to_string());
//! let registry = Registry::from_config(&config)?;
//!
//! let mut ctx = RequestContext::default();
//! registry.login(&mut ctx, "user", "pass").await?;
//!
//! for repo in registry.repositories(&ctx).await? {
//!     if let Lookup::Found(tags) = registry.tags(&ctx, &repo).await? {
//!         println!("{}: {}", repo, tags.join(", "));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Main Types
//!
//! - [`Registry`] - Registry operations (login, repositories, tags, manifest, delete)
//! - [`RequestContext`] - Per-request session and inbound headers
//! - [`Session`] - Credentials stored by login
//! - [`ResolvedManifest`] - A tag resolved to a single manifest and its configuration
//! - [`Lookup`] - Found / not-found outcome of tag and manifest lookups
//! - [`Config`] - Layered configuration

#![warn(clippy::all)]

/// Returns the libdrui crate version.
///
/// # Examples
///
/// ```
/// let version = libdrui::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use auth::{AuthProvider, Credentials, Session};
pub use config::Config;
pub use digest::Digest;
pub use error::{DruiError, Lookup, Result};
pub use manifest::ResolvedManifest;
pub use registry::Registry;
pub use request::RequestContext;
pub use version::{VersionKey, default_tag, sort_tags};

pub mod auth;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod request;
pub mod version;
