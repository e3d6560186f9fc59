//! Typed wrappers around the `spin` CLI.

use std::sync::Arc;

use crate::error::ResultExt;
use crate::host::{Command, CommandResult, Host};
use crate::invoker::CommandInvoker;
use crate::{BINARY_NAME, Error, Result};

/// Handle for running `spin` subcommands.
#[derive(Clone)]
pub struct Spin {
    invoker: CommandInvoker,
}

impl Spin {
    /// Create a handle that runs `spin` through the given host.
    #[must_use]
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            invoker: CommandInvoker::new(host),
        }
    }

    /// Run `spin build`.
    pub async fn build(&self) -> Result<CommandResult> {
        let cmd = Command::new(BINARY_NAME).args(["build"]);
        self.invoker.invoke(&cmd).await
    }

    /// Run `spin --version` and return its trimmed output.
    pub async fn version(&self) -> Result<String> {
        let cmd = Command::new(BINARY_NAME)
            .args(["--version"])
            .capture_output(true);

        let query = async {
            let result = self.invoker.invoke(&cmd).await?;
            if !result.success() {
                return Err(Error::execution(format!(
                    "Failed to get version: {}",
                    result.exit_code
                )));
            }
            Ok(result.stdout.as_deref().unwrap_or_default().trim().to_string())
        };
        query.await.context("Failed to get version of Fermyon Spin")
    }

    /// Run an arbitrary `spin` subcommand.
    pub async fn invoke_command<I, S>(&self, command: &str, args: I) -> Result<CommandResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cmd = Command::new(BINARY_NAME).args([command]).args(args);
        self.invoker.invoke(&cmd).await
    }
}
