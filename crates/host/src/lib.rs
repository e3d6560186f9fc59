//! Production [`Host`] adapter for spin-setup.
//!
//! [`SystemHost`] performs the real work behind the core's host boundary:
//! - HTTP downloads with reqwest, optionally authenticated with a GitHub token
//! - zip and tar.gz extraction into a per-run work directory
//! - process execution with tokio, with installed folders on the child `PATH`
//! - search-path registration, including the CI `GITHUB_PATH` file
//! - log and debug sinks backed by `tracing`

mod archive;
mod process;

pub use archive::{extract_tar_gz, extract_zip};

use async_trait::async_trait;
use reqwest::Client;
use spin_setup_core::{Command, CommandResult, Error, Host, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Environment variable naming the CI file that extends `PATH` for later steps.
pub const GITHUB_PATH_ENV: &str = "GITHUB_PATH";

/// Host backed by the real network, filesystem and process table.
pub struct SystemHost {
    client: Client,
    work_dir: PathBuf,
    github_path: Option<PathBuf>,
    token: Option<String>,
    path_folders: Mutex<Vec<PathBuf>>,
}

impl std::fmt::Debug for SystemHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemHost")
            .field("work_dir", &self.work_dir)
            .field("github_path", &self.github_path)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl SystemHost {
    /// Create a host that stores downloads and extractions under `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("spin-setup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::host("download", format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            work_dir: work_dir.into(),
            github_path: None,
            token: None,
            path_folders: Mutex::default(),
        })
    }

    /// Create a host configured from the environment.
    ///
    /// Uses `RUNNER_TEMP` (or the system temp dir) for the work directory,
    /// `GITHUB_TOKEN`/`GH_TOKEN` for authenticated downloads, and
    /// `GITHUB_PATH` for search-path registration.
    pub fn from_env() -> Result<Self> {
        let base = std::env::var_os("RUNNER_TEMP")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let mut host = Self::new(base.join("spin-setup"))?;
        host.github_path = std::env::var_os(GITHUB_PATH_ENV).map(PathBuf::from);
        host.token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|t| !t.is_empty());
        Ok(host)
    }

    /// Also append registered folders to this file.
    #[must_use]
    pub fn with_github_path(mut self, file: impl Into<PathBuf>) -> Self {
        self.github_path = Some(file.into());
        self
    }

    /// Send this bearer token with downloads.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Put an existing folder on the child `PATH` without registering it with CI.
    #[must_use]
    pub fn with_path_folder(self, folder: impl Into<PathBuf>) -> Self {
        self.path_folders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(folder.into());
        self
    }

    /// Folders registered so far, oldest first.
    pub fn path_folders(&self) -> Vec<PathBuf> {
        self.path_folders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Root directory for downloads and extractions.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// A fresh, unique directory under the work dir.
    fn scratch_dir(&self, kind: &str) -> PathBuf {
        self.work_dir.join(kind).join(Uuid::new_v4().to_string())
    }

    fn append_github_path(&self, folder: &Path) {
        let Some(file) = &self.github_path else {
            return;
        };
        let appended = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .and_then(|mut f| writeln!(f, "{}", folder.display()));
        if let Err(e) = appended {
            warn!(file = ?file, error = %e, "Failed to append to GITHUB_PATH");
        }
    }
}

/// Local file name for a downloaded URL: its last path segment, without query.
#[must_use]
pub fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => "download",
    }
}

#[async_trait]
impl Host for SystemHost {
    async fn execute(&self, command: &Command) -> Result<CommandResult> {
        let folders = self.path_folders();
        let path = if folders.is_empty() {
            None
        } else {
            Some(process::search_path(&folders, std::env::var_os("PATH"))?)
        };
        process::run(command, path).await
    }

    async fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .await
                .map_err(|e| Error::host("chmod", format!("{}: {e}", path.display())))?;
        }
        #[cfg(not(unix))]
        {
            let _ = mode;
            tokio::fs::metadata(path)
                .await
                .map_err(|e| Error::host("chmod", format!("{}: {e}", path.display())))?;
        }
        Ok(())
    }

    async fn extract_zip(&self, archive: &Path) -> Result<PathBuf> {
        let archive = archive.to_path_buf();
        let dest = self.scratch_dir("extracted");
        tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .map_err(|e| Error::host("extract_zip", e.to_string()))?
    }

    async fn extract_tar_gz(&self, archive: &Path) -> Result<PathBuf> {
        let archive = archive.to_path_buf();
        let dest = self.scratch_dir("extracted");
        tokio::task::spawn_blocking(move || extract_tar_gz(&archive, &dest))
            .await
            .map_err(|e| Error::host("extract_tar_gz", e.to_string()))?
    }

    async fn download(&self, url: &str) -> Result<PathBuf> {
        debug!(%url, "Downloading");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::host("download", format!("{url}: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::host(
                "download",
                format!("{url}: HTTP {}", response.status()),
            ));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::host("download", format!("{url}: {e}")))?;

        let dir = self.scratch_dir("downloads");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::host("download", format!("{}: {e}", dir.display())))?;
        let dest = dir.join(file_name_from_url(url));
        tokio::fs::write(&dest, &body)
            .await
            .map_err(|e| Error::host("download", format!("{}: {e}", dest.display())))?;

        debug!(?dest, bytes = body.len(), "Downloaded");
        Ok(dest)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::host("read", format!("{}: {e}", path.display())))
    }

    fn add_folder_to_path(&self, folder: &Path) {
        self.path_folders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(folder.to_path_buf());
        self.append_github_path(folder);
        info!(?folder, "Added folder to PATH");
    }

    fn log(&self, message: &str) {
        info!("{message}");
    }

    fn debug(&self, message: &str) {
        debug!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url(
                "https://github.com/fermyon/spin/releases/download/v2.0.0/spin-v2.0.0-linux-amd64.tar.gz"
            ),
            "spin-v2.0.0-linux-amd64.tar.gz"
        );
        assert_eq!(
            file_name_from_url("https://api.github.com/repos/fermyon/spin/releases/latest"),
            "latest"
        );
        assert_eq!(file_name_from_url("https://example.com/a.zip?sig=abc"), "a.zip");
        assert_eq!(file_name_from_url("https://example.com/"), "download");
    }

    #[test]
    fn test_debug_hides_token() {
        let host = SystemHost::new("/tmp/spin-setup-test")
            .unwrap()
            .with_token("ghp_secret");

        let shown = format!("{host:?}");
        assert!(!shown.contains("ghp_secret"));
        assert!(shown.contains("authenticated: true"));
    }

    #[test]
    fn test_with_path_folder_skips_github_path() {
        let temp = std::env::temp_dir().join(format!("spin-setup-{}", Uuid::new_v4()));
        let github_path = temp.join("github_path");
        let host = SystemHost::new(&temp)
            .unwrap()
            .with_github_path(&github_path)
            .with_path_folder("/opt/spin");

        assert_eq!(host.path_folders(), vec![PathBuf::from("/opt/spin")]);
        assert!(!github_path.exists());
    }
}
