//! Single-process execution with debug traces and uniform error wrapping.

use std::sync::Arc;

use crate::error::ResultExt;
use crate::host::{Command, CommandResult, Host};
use crate::Result;

/// Runs commands through a [`Host`], emitting a debug line before and after each one.
#[derive(Clone)]
pub struct CommandInvoker {
    host: Arc<dyn Host>,
}

impl CommandInvoker {
    /// Create an invoker backed by the given host.
    #[must_use]
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    /// Execute a command once.
    ///
    /// Host failures are wrapped with the rendered command. A non-zero exit
    /// code is returned to the caller, not treated as an error here.
    pub async fn invoke(&self, command: &Command) -> Result<CommandResult> {
        let described = command.describe();
        self.host
            .debug(&format!("Running {} {described}", command.command));

        let result = self
            .host
            .execute(command)
            .await
            .with_context(|| format!("Failed to invoke command {described}"))?;

        self.host.debug(&format!(
            "{} {described} result: {}",
            command.command, result.exit_code
        ));
        Ok(result)
    }
}
