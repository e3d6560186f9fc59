//! The host capability boundary.
//!
//! Everything that touches the network, the filesystem or other processes
//! goes through [`Host`]. The core only decides *what* to do; a `Host`
//! implementation decides *how*.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Placeholder shown instead of secret argument values.
const REDACTED: &str = "***";

/// Flags whose following argument is a secret.
const SECRET_FLAGS: &[&str] = &["--token"];

/// A request to run an external process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Program to run.
    pub command: String,
    /// Arguments, in the exact order the program expects them.
    pub args: Vec<String>,
    /// Whether stdout should be captured and returned.
    pub capture_output: bool,
}

impl Command {
    /// Create a command with no arguments and uncaptured output.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            capture_output: false,
        }
    }

    /// Append arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set whether stdout is captured.
    #[must_use]
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// JSON rendering for traces and error messages, with secrets masked.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut shown = self.clone();
        let mut mask_next = false;
        for arg in &mut shown.args {
            if mask_next {
                REDACTED.clone_into(arg);
            }
            mask_next = SECRET_FLAGS.contains(&arg.as_str());
        }
        serde_json::to_string(&shown).unwrap_or_else(|_| format!("{shown:?}"))
    }
}

/// Outcome of a process execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Process exit code.
    pub exit_code: i32,
    /// Captured stdout, only meaningful when capture was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
}

impl CommandResult {
    /// Whether the process exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// I/O primitives the core depends on.
///
/// The core never calls these concurrently; implementations only need to be
/// safe to call repeatedly.
#[async_trait]
pub trait Host: Send + Sync {
    /// Run a process and report its exit code and optional stdout.
    async fn execute(&self, command: &Command) -> Result<CommandResult>;

    /// Set permission bits on a file.
    async fn chmod(&self, path: &Path, mode: u32) -> Result<()>;

    /// Extract a zip archive, returning the folder it was extracted into.
    async fn extract_zip(&self, archive: &Path) -> Result<PathBuf>;

    /// Extract a gzip-compressed tarball, returning the folder it was extracted into.
    async fn extract_tar_gz(&self, archive: &Path) -> Result<PathBuf>;

    /// Fetch a URL to local storage, returning the local path.
    async fn download(&self, url: &str) -> Result<PathBuf>;

    /// Read a local file as UTF-8 text.
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Register a folder with the search path used to find executables.
    fn add_folder_to_path(&self, folder: &Path);

    /// Emit an informational message. Must never fail.
    fn log(&self, message: &str);

    /// Emit a diagnostic message. Must never fail.
    fn debug(&self, message: &str);
}
