//! Install and drive the Fermyon Spin CLI from build pipelines.
//!
//! The crate resolves a requested Spin version (including the `latest`
//! alias), builds the platform-specific release URL, and installs the
//! release through a [`Host`]. It also wraps `spin` invocations: build,
//! version queries, arbitrary subcommands, and Fermyon Cloud login/deploy.
//!
//! All I/O is delegated to the [`Host`] trait. The production adapter lives
//! in `spin-setup-host`; [`testing::FakeHost`] records calls for tests.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use spin_setup_core::{Cloud, DeployOptions, Installer, Spin};
//!
//! let host = Arc::new(SystemHost::from_env()?);
//! let tool = Installer::new(host.clone()).download("latest").await?;
//! Spin::new(host.clone()).build().await?;
//! Cloud::new(host).deploy(Some(&DeployOptions::default())).await?;
//! ```

pub mod cloud;
mod error;
pub mod host;
pub mod installer;
pub mod invoker;
pub mod platform;
pub mod release;
pub mod spin;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use cloud::{Cloud, DeployOptions, KeyValue};
pub use error::{Error, Result, ResultExt};
pub use host::{Command, CommandResult, Host};
pub use installer::{Installer, Tool};
pub use invoker::CommandInvoker;
pub use platform::{Arch, Os, Platform};
pub use release::{ArchiveKind, ReleaseSource};
pub use spin::Spin;
pub use version::{VersionResolver, normalize_version};

/// Name of the tool this crate installs and runs.
pub const BINARY_NAME: &str = "spin";
