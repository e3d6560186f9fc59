//! CLI error types rendered through miette.

use miette::{Diagnostic, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for any failure that has no more specific code.
pub const EXIT_FAILURE: i32 = 1;

/// CLI-specific error types with diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to read config file {}", path.display())]
    #[diagnostic(
        code(spin_setup::cli::config_read),
        help("Check the --config path, or remove it to run without a config file")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {message}", path.display())]
    #[diagnostic(code(spin_setup::cli::config_parse))]
    ConfigParse {
        path: PathBuf,
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("`{command}` did not succeed{}", exit_code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    #[diagnostic(code(spin_setup::cli::command_failed))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] spin_setup_core::Error),
}

impl CliError {
    pub fn command_failed(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
        }
    }

    /// Process exit code for this error.
    ///
    /// A failed passthrough command propagates its own non-zero exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                exit_code: Some(code),
                ..
            } if *code > 0 => *code,
            _ => EXIT_FAILURE,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = CliError::command_failed("spin build", Some(2));
        assert_eq!(err.to_string(), "`spin build` did not succeed (exit code 2)");

        let err = CliError::command_failed("spin cloud deploy", None);
        assert_eq!(err.to_string(), "`spin cloud deploy` did not succeed");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::command_failed("spin build", Some(2)).exit_code(), 2);
        assert_eq!(CliError::command_failed("spin build", Some(-1)).exit_code(), 1);
        assert_eq!(CliError::command_failed("spin cloud login", None).exit_code(), 1);

        let core = spin_setup_core::Error::input_required("version");
        assert_eq!(CliError::from(core).exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_core_error_is_transparent() {
        let core = spin_setup_core::Error::input_required("token").context("Failed to login");
        assert_eq!(CliError::from(core).to_string(), "Failed to login: token is required");
    }
}
