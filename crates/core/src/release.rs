//! Release asset naming and archive handling.
//!
//! Spin publishes one archive per platform on GitHub Releases, named
//! `spin-{version}-{os}-{arch}.{ext}`. Windows builds ship as zip files,
//! everything else as gzip-compressed tarballs.

use std::path::{Path, PathBuf};

use crate::error::ResultExt;
use crate::host::Host;
use crate::platform::{Os, Platform};
use crate::Result;

/// Repository Spin releases are published from.
pub const DEFAULT_REPOSITORY: &str = "fermyon/spin";

/// Where release archives and metadata are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    /// GitHub `owner/name` of the release repository.
    pub repository: String,
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self::new(DEFAULT_REPOSITORY)
    }
}

impl ReleaseSource {
    /// Create a source for the given `owner/name` repository.
    #[must_use]
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
        }
    }

    /// URL of the latest-release metadata endpoint.
    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/releases/latest",
            self.repository
        )
    }

    /// URL of the release archive for a normalized version and platform.
    #[must_use]
    pub fn download_url(&self, version: &str, platform: &Platform) -> String {
        let (os, ext) = os_label(platform.os);
        let arch = if platform.arch.is_arm() { "arm64" } else { "amd64" };
        format!(
            "https://github.com/{}/releases/download/{version}/spin-{version}-{os}-{arch}.{ext}",
            self.repository
        )
    }
}

/// URL of the release archive on the default repository.
#[must_use]
pub fn download_url(version: &str, platform: &Platform) -> String {
    ReleaseSource::default().download_url(version, platform)
}

/// OS label and archive extension used in asset names.
fn os_label(os: Os) -> (&'static str, &'static str) {
    match os {
        Os::Windows => ("windows", "zip"),
        Os::Darwin => ("macos", "tar.gz"),
        Os::Linux | Os::Other => ("linux", "tar.gz"),
    }
}

/// File name of the Spin executable inside an extracted archive.
#[must_use]
pub fn binary_file_name(os: Os) -> &'static str {
    match os {
        Os::Windows => "spin.exe",
        _ => crate::BINARY_NAME,
    }
}

/// Archive format, chosen purely by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.zip`
    Zip,
    /// gzip-compressed tar
    TarGz,
}

impl ArchiveKind {
    /// `.zip` files are zip archives; anything else is treated as tar.gz.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("zip") => Self::Zip,
            _ => Self::TarGz,
        }
    }
}

/// Extract a downloaded archive through the host, returning the install folder.
pub async fn extract_archive(host: &dyn Host, archive: &Path) -> Result<PathBuf> {
    let extracted = match ArchiveKind::from_path(archive) {
        ArchiveKind::Zip => host.extract_zip(archive).await,
        ArchiveKind::TarGz => host.extract_tar_gz(archive).await,
    };
    extracted.with_context(|| {
        format!(
            "Failed to extract downloaded archive {}",
            archive.display()
        )
    })
}
