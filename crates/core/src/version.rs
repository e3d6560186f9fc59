//! Version alias resolution and normalization.
//!
//! Users may ask for `latest` or for a concrete release such as `2.0.0` or
//! `v2.0.0`. Release tags always carry a `v` prefix, so concrete versions
//! are normalized to that form. `latest` is looked up from the release
//! metadata endpoint before normalization.

use serde::Deserialize;

use crate::error::ResultExt;
use crate::host::Host;
use crate::release::ReleaseSource;
use crate::{Error, Result};

/// Alias for the most recent published release.
pub const LATEST: &str = "latest";

/// Whether the token is the `latest` alias.
#[must_use]
pub fn is_latest(version: &str) -> bool {
    version == LATEST
}

/// Ensure a release tag carries its `v` prefix.
///
/// The `latest` alias is returned unchanged; callers resolve it first.
#[must_use]
pub fn normalize_version(version: &str) -> String {
    if is_latest(version) || version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{version}")
    }
}

#[derive(Debug, Deserialize)]
struct ReleaseMetadata {
    tag_name: Option<String>,
}

/// Extract the tag from GitHub latest-release JSON.
pub fn tag_from_release_metadata(metadata: &str) -> Result<String> {
    let metadata = metadata.trim();
    let release: ReleaseMetadata = serde_json::from_str(metadata).map_err(|e| {
        Error::resolution(format!(
            "Failed to determine latest version: invalid release metadata ({e}): {metadata}"
        ))
    })?;

    match release.tag_name {
        Some(tag) if !tag.is_empty() => Ok(tag),
        _ => Err(Error::resolution(format!(
            "Failed to determine latest version: {metadata}"
        ))),
    }
}

/// Turns user-supplied version tokens into normalized release tags.
pub struct VersionResolver<'a> {
    host: &'a dyn Host,
    source: &'a ReleaseSource,
}

impl<'a> VersionResolver<'a> {
    /// Create a resolver that looks up `latest` on the given release source.
    #[must_use]
    pub fn new(host: &'a dyn Host, source: &'a ReleaseSource) -> Self {
        Self { host, source }
    }

    /// Resolve a version token to a normalized tag.
    pub async fn resolve(&self, version: &str) -> Result<String> {
        if version.is_empty() {
            return Err(Error::input_required("version"));
        }

        let resolved = if is_latest(version) {
            self.host.debug("latest version requested");
            self.latest_tag().await?
        } else {
            version.to_string()
        };

        let normalized = normalize_version(&resolved);
        self.host.debug(&format!("Sanitized version: {normalized}"));
        Ok(normalized)
    }

    async fn latest_tag(&self) -> Result<String> {
        let lookup = async {
            let metadata_path = self.host.download(&self.source.latest_release_url()).await?;
            let metadata = self.host.read_to_string(&metadata_path).await?;
            tag_from_release_metadata(&metadata)
        };
        lookup.await.context("Failed to get latest version")
    }
}
