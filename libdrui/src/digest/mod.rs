//! OCI content digests.
//!
//! Wraps `oci_spec::image::Digest` for validation and adds SHA-256
//! computation for registries that omit `Docker-Content-Digest`.

use crate::error::{DruiError, Result};
use oci_spec::image::Digest as OciDigest;
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;


/// Represents a content digest, wrapping the `oci_spec::image::Digest` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(OciDigest);

impl Digest {
    /// Computes the `sha256:` digest of `content`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdrui::Digest;
    ///
    /// let digest = Digest::sha256(b"").unwrap();
    /// assert_eq!(
    ///     digest.to_string(),
    ///     "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    /// );
    /// ```
    pub fn sha256(content: &[u8]) -> Result<Self> {
        let hex = format!("{:x}", Sha256::digest(content));
        Self::from_str(&format!("sha256:{}", hex))
    }

    /// The algorithm part, e.g. `sha256`.
    pub fn algorithm(&self) -> String {
        self.0.algorithm().to_string()
    }

    /// The hex-encoded hash part.
    pub fn hex(&self) -> &str {
        self.0.digest()
    }
}

impl FromStr for Digest {
    type Err = DruiError;

    fn from_str(s: &str) -> Result<Self> {
        let oci_digest = OciDigest::from_str(s).map_err(|e| {
            DruiError::validation_with_source(format!("Invalid digest format: {}", s), e)
        })?;
        Ok(Digest(oci_digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
