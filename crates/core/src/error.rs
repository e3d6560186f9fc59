//! Error types for spin-setup operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for spin-setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while installing or driving the Spin CLI.
///
/// Stage failures are layered with [`Error::Context`], so the rendered
/// message reads as a single chain from the outermost stage to the
/// collaborator that failed.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A required input was empty.
    #[error("{what} is required")]
    #[diagnostic(code(spin_setup::input_required))]
    InputRequired {
        /// Name of the missing input.
        what: String,
    },

    /// The requested version could not be resolved to a release tag.
    #[error("{message}")]
    #[diagnostic(
        code(spin_setup::resolution),
        help("Pass a concrete version such as 2.0.0 instead of 'latest'")
    )]
    Resolution {
        /// Description of the resolution failure.
        message: String,
    },

    /// A host capability (download, extraction, chmod, process spawn) failed.
    #[error("{operation} failed: {message}")]
    #[diagnostic(code(spin_setup::host))]
    Host {
        /// Host operation that failed.
        operation: String,
        /// Description of the failure.
        message: String,
    },

    /// A command ran but its outcome was treated as a failure.
    #[error("{message}")]
    #[diagnostic(code(spin_setup::execution))]
    Execution {
        /// Description of the failure.
        message: String,
    },

    /// A failure wrapped with the stage it happened in.
    #[error("{context}: {cause}")]
    #[diagnostic(code(spin_setup::stage))]
    Context {
        /// Stage-identifying prefix.
        context: String,
        /// The wrapped failure.
        cause: Box<Error>,
    },
}

impl Error {
    /// Create an input-required error.
    #[must_use]
    pub fn input_required(what: impl Into<String>) -> Self {
        Self::InputRequired { what: what.into() }
    }

    /// Create a resolution error.
    #[must_use]
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a host capability error.
    #[must_use]
    pub fn host(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Host {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an execution error.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Wrap this error with a stage-identifying prefix.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            cause: Box::new(self),
        }
    }

    /// The innermost error, with all stage prefixes peeled off.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { cause, .. } => cause.root(),
            other => other,
        }
    }
}

/// Adds stage context to fallible results.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a fixed prefix.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Wrap the error, if any, with a lazily built prefix.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}
