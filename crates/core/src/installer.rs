//! Download and install a Spin release.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ResultExt;
use crate::host::Host;
use crate::platform::Platform;
use crate::release::{ReleaseSource, binary_file_name, extract_archive};
use crate::version::VersionResolver;
use crate::{BINARY_NAME, Error, Result};

/// Permission bits for the installed binary: rwxr-xr-x.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// An installed binary and the folder it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Logical tool name.
    pub name: String,
    /// Folder the release archive was extracted into.
    pub path: PathBuf,
}

/// Installs Spin releases through a [`Host`].
pub struct Installer {
    host: Arc<dyn Host>,
    source: ReleaseSource,
    platform: Platform,
}

impl Installer {
    /// Create an installer for the current platform and the default release source.
    #[must_use]
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            source: ReleaseSource::default(),
            platform: Platform::current(),
        }
    }

    /// Fetch releases from a different repository.
    #[must_use]
    pub fn with_source(mut self, source: ReleaseSource) -> Self {
        self.source = source;
        self
    }

    /// Install the build for a specific platform instead of the running one.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolve, download, extract and register the requested version.
    ///
    /// `version` is either `latest` or a release tag with or without its
    /// `v` prefix. On success the install folder has been added to the
    /// host's search path.
    pub async fn download(&self, version: &str) -> Result<Tool> {
        if version.is_empty() {
            return Err(Error::input_required("version").context("Failed to download Fermyon Spin"));
        }
        self.install(version)
            .await
            .context("Failed to download release from GitHub")
    }

    async fn install(&self, version: &str) -> Result<Tool> {
        let host = self.host.as_ref();

        let tag = VersionResolver::new(host, &self.source)
            .resolve(version)
            .await?;

        let url = self.source.download_url(&tag, &self.platform);
        host.debug(&format!("Downloading version {version} from: {url}"));
        let archive = host.download(&url).await?;
        host.debug(&format!("Downloaded to: {}", archive.display()));

        let folder = extract_archive(host, &archive).await?;
        host.debug(&format!("Extracted to: {}", folder.display()));

        let binary = folder.join(binary_file_name(self.platform.os));
        host.chmod(&binary, EXECUTABLE_MODE).await?;
        host.debug(&format!("Set permissions on {}", binary.display()));

        host.add_folder_to_path(&folder);
        host.debug(&format!("Added {} to PATH", folder.display()));

        Ok(Tool {
            name: BINARY_NAME.to_string(),
            path: folder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Os};
    use crate::testing::FakeHost;

    fn linux_installer(host: &Arc<FakeHost>) -> Installer {
        Installer::new(host.clone()).with_platform(Platform::new(Os::Linux, Arch::X86_64))
    }

    #[tokio::test]
    async fn test_download_runs_every_stage() {
        let host = Arc::new(FakeHost::new());

        let tool = linux_installer(&host).download("2.0.0").await.unwrap();

        let url = "https://github.com/fermyon/spin/releases/download/v2.0.0/spin-v2.0.0-linux-amd64.tar.gz";
        assert_eq!(host.downloads(), vec![url.to_string()]);
        assert_eq!(host.tar_gz_extractions(), vec![host.local_path_for(url)]);
        assert_eq!(
            host.chmods(),
            vec![(host.extract_dir().join("spin"), EXECUTABLE_MODE)]
        );
        assert_eq!(host.path_folders(), vec![host.extract_dir()]);
        assert_eq!(
            tool,
            Tool {
                name: "spin".to_string(),
                path: host.extract_dir()
            }
        );
    }

    #[tokio::test]
    async fn test_download_on_windows_uses_zip_and_exe() {
        let host = Arc::new(FakeHost::new());
        let installer = Installer::new(host.clone())
            .with_platform(Platform::new(Os::Windows, Arch::X86_64));

        installer.download("v2.0.0").await.unwrap();

        assert!(host.downloads()[0].ends_with("spin-v2.0.0-windows-amd64.zip"));
        assert_eq!(host.zip_extractions().len(), 1);
        assert!(host.tar_gz_extractions().is_empty());
        assert_eq!(host.chmods()[0].0, host.extract_dir().join("spin.exe"));
    }

    #[tokio::test]
    async fn test_download_latest() {
        let latest = "https://api.github.com/repos/fermyon/spin/releases/latest";
        let host = Arc::new(FakeHost::new().with_download_body(latest, r#"{"tag_name":"v2.4.0"}"#));

        linux_installer(&host).download("latest").await.unwrap();

        let downloads = host.downloads();
        assert_eq!(downloads.len(), 2);
        assert_eq!(downloads[0], latest);
        assert!(downloads[1].contains("/v2.4.0/spin-v2.4.0-linux-amd64.tar.gz"));
    }

    #[tokio::test]
    async fn test_download_empty_version_does_no_io() {
        let host = Arc::new(FakeHost::new());

        let err = linux_installer(&host).download("").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to download Fermyon Spin: version is required"
        );
        assert!(host.downloads().is_empty());
        assert!(host.debug_lines().is_empty());
    }

    #[tokio::test]
    async fn test_download_failure_stops_pipeline() {
        let host = Arc::new(FakeHost::new().failing("download"));

        let err = linux_installer(&host).download("2.0.0").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to download release from GitHub: download failed: injected failure"
        );
        assert!(host.tar_gz_extractions().is_empty());
        assert!(host.chmods().is_empty());
        assert!(host.path_folders().is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_is_wrapped_twice() {
        let host = Arc::new(FakeHost::new().failing("extract_tar_gz"));

        let err = linux_installer(&host).download("2.0.0").await.unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with(
            "Failed to download release from GitHub: Failed to extract downloaded archive "
        ));
        assert!(host.chmods().is_empty());
    }

    #[tokio::test]
    async fn test_chmod_failure_skips_path_registration() {
        let host = Arc::new(FakeHost::new().failing("chmod"));

        let err = linux_installer(&host).download("2.0.0").await.unwrap_err();

        assert!(matches!(err.root(), Error::Host { operation, .. } if operation == "chmod"));
        assert!(host.path_folders().is_empty());
    }

    #[tokio::test]
    async fn test_download_traces_each_stage() {
        let host = Arc::new(FakeHost::new());

        linux_installer(&host).download("2.0.0").await.unwrap();

        let lines = host.debug_lines();
        assert_eq!(lines[0], "Sanitized version: v2.0.0");
        assert!(lines[1].starts_with("Downloading version 2.0.0 from: https://"));
        assert!(lines[2].starts_with("Downloaded to: "));
        assert!(lines[3].starts_with("Extracted to: "));
        assert!(lines[4].starts_with("Set permissions on "));
        assert!(lines[5].starts_with("Added "));
        assert_eq!(lines.len(), 6);
    }
}
