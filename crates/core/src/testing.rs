//! In-memory [`Host`] for tests.
//!
//! `FakeHost` records every call it receives and answers with canned
//! results, so installer and command logic can be exercised without a
//! network, a filesystem or a real `spin` binary.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::host::{Command, CommandResult, Host};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct Recorded {
    commands: Vec<Command>,
    downloads: Vec<String>,
    chmods: Vec<(PathBuf, u32)>,
    zip_extractions: Vec<PathBuf>,
    tar_gz_extractions: Vec<PathBuf>,
    path_folders: Vec<PathBuf>,
    debug_lines: Vec<String>,
    log_lines: Vec<String>,
}

/// Recording test double for [`Host`].
#[derive(Debug)]
pub struct FakeHost {
    recorded: Mutex<Recorded>,
    exit_code: i32,
    stdout: Option<String>,
    download_dir: PathBuf,
    extract_dir: PathBuf,
    files: HashMap<PathBuf, String>,
    failing: HashSet<String>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// A host where every operation succeeds and processes exit with 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorded: Mutex::default(),
            exit_code: 0,
            stdout: None,
            download_dir: PathBuf::from("/fake/downloads"),
            extract_dir: PathBuf::from("/fake/extracted/spin"),
            files: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    /// Exit code reported for every executed command.
    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Stdout reported for commands that capture output.
    #[must_use]
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    /// Serve `body` as the content of whatever `download(url)` returns.
    #[must_use]
    pub fn with_download_body(mut self, url: &str, body: impl Into<String>) -> Self {
        let path = self.local_path_for(url);
        self.files.insert(path, body.into());
        self
    }

    /// Make the named operation fail, e.g. `"download"` or `"chmod"`.
    #[must_use]
    pub fn failing(mut self, operation: &str) -> Self {
        self.failing.insert(operation.to_string());
        self
    }

    /// Folder reported by extraction.
    #[must_use]
    pub fn extract_dir(&self) -> PathBuf {
        self.extract_dir.clone()
    }

    /// Local path `download(url)` returns.
    #[must_use]
    pub fn local_path_for(&self, url: &str) -> PathBuf {
        let name = url.rsplit('/').next().unwrap_or(url);
        self.download_dir.join(name)
    }

    /// Commands executed so far.
    pub fn commands(&self) -> Vec<Command> {
        self.recorded().commands.clone()
    }

    /// URLs downloaded so far.
    pub fn downloads(&self) -> Vec<String> {
        self.recorded().downloads.clone()
    }

    /// `(path, mode)` pairs passed to `chmod`.
    pub fn chmods(&self) -> Vec<(PathBuf, u32)> {
        self.recorded().chmods.clone()
    }

    /// Archives passed to `extract_zip`.
    pub fn zip_extractions(&self) -> Vec<PathBuf> {
        self.recorded().zip_extractions.clone()
    }

    /// Archives passed to `extract_tar_gz`.
    pub fn tar_gz_extractions(&self) -> Vec<PathBuf> {
        self.recorded().tar_gz_extractions.clone()
    }

    /// Folders registered with the search path.
    pub fn path_folders(&self) -> Vec<PathBuf> {
        self.recorded().path_folders.clone()
    }

    /// Debug messages emitted.
    pub fn debug_lines(&self) -> Vec<String> {
        self.recorded().debug_lines.clone()
    }

    /// Log messages emitted.
    pub fn log_lines(&self) -> Vec<String> {
        self.recorded().log_lines.clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.failing.contains(operation) {
            return Err(Error::host(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl Host for FakeHost {
    async fn execute(&self, command: &Command) -> Result<CommandResult> {
        self.recorded().commands.push(command.clone());
        self.check("execute")?;
        Ok(CommandResult {
            exit_code: self.exit_code,
            stdout: if command.capture_output {
                self.stdout.clone()
            } else {
                None
            },
        })
    }

    async fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        self.recorded().chmods.push((path.to_path_buf(), mode));
        self.check("chmod")
    }

    async fn extract_zip(&self, archive: &Path) -> Result<PathBuf> {
        self.recorded().zip_extractions.push(archive.to_path_buf());
        self.check("extract_zip")?;
        Ok(self.extract_dir.clone())
    }

    async fn extract_tar_gz(&self, archive: &Path) -> Result<PathBuf> {
        self.recorded().tar_gz_extractions.push(archive.to_path_buf());
        self.check("extract_tar_gz")?;
        Ok(self.extract_dir.clone())
    }

    async fn download(&self, url: &str) -> Result<PathBuf> {
        self.recorded().downloads.push(url.to_string());
        self.check("download")?;
        Ok(self.local_path_for(url))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        self.check("read_to_string")?;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::host("read", format!("{} does not exist", path.display())))
    }

    fn add_folder_to_path(&self, folder: &Path) {
        self.recorded().path_folders.push(folder.to_path_buf());
    }

    fn log(&self, message: &str) {
        self.recorded().log_lines.push(message.to_string());
    }

    fn debug(&self, message: &str) {
        self.recorded().debug_lines.push(message.to_string());
    }
}
