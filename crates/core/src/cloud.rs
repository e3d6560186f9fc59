//! Fermyon Cloud login and deploy.
//!
//! Argument lists are built by pure functions so the exact flag order can
//! be checked without running anything. Flags are always emitted in the
//! same order: environment name, no-buildinfo, readiness timeout,
//! variables, then key-values.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ResultExt;
use crate::host::{Command, Host};
use crate::invoker::CommandInvoker;
use crate::{BINARY_NAME, Error, Result};

/// Readiness timeout `spin cloud deploy` uses when the flag is omitted.
pub const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 60;

/// A `key=value` pair passed to deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Name, never empty when parsed.
    pub key: String,
    /// Value; may be empty.
    pub value: String,
}

impl KeyValue {
    /// Create a pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for KeyValue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self::new(key, value)),
            _ => Err(format!("expected KEY=VALUE, got '{s}'")),
        }
    }
}

/// Optional settings for `spin cloud deploy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployOptions {
    /// Deploy into a named environment.
    pub environment_name: Option<String>,
    /// Skip attaching build information.
    pub no_build_info: bool,
    /// Seconds to wait for the app to become ready.
    pub readiness_timeout: Option<u64>,
    /// Application variables, in order.
    pub variables: Vec<KeyValue>,
    /// Key-value store entries, in order.
    pub key_values: Vec<KeyValue>,
}

/// Arguments for `spin cloud login` with a token.
#[must_use]
pub fn login_args(token: &str) -> Vec<String> {
    ["cloud", "login", "--auth-method", "token", "--token", token]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Arguments for `spin cloud deploy`.
#[must_use]
pub fn deploy_args(options: Option<&DeployOptions>) -> Vec<String> {
    let mut args = vec!["cloud".to_string(), "deploy".to_string()];
    let Some(options) = options else {
        return args;
    };

    if let Some(name) = &options.environment_name {
        args.extend(["--environment-name".to_string(), name.clone()]);
    }
    if options.no_build_info {
        args.push("--no-buildinfo".to_string());
    }
    if let Some(timeout) = options
        .readiness_timeout
        .filter(|t| *t != DEFAULT_READINESS_TIMEOUT_SECS)
    {
        args.extend(["--readiness-timeout".to_string(), timeout.to_string()]);
    }
    for kv in &options.variables {
        args.extend(["--variable".to_string(), kv.to_string()]);
    }
    for kv in &options.key_values {
        args.extend(["--key-value".to_string(), kv.to_string()]);
    }
    args
}

/// Fermyon Cloud operations driven through the `spin` CLI.
#[derive(Clone)]
pub struct Cloud {
    invoker: CommandInvoker,
}

impl Cloud {
    /// Create a handle that runs `spin cloud` through the given host.
    #[must_use]
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            invoker: CommandInvoker::new(host),
        }
    }

    /// Log in with a personal access token. Returns whether login exited cleanly.
    pub async fn login(&self, token: &str) -> Result<bool> {
        if token.is_empty() {
            return Err(Error::input_required("token").context("Failed to login"));
        }
        let cmd = Command::new(BINARY_NAME).args(login_args(token));
        let result = self.invoker.invoke(&cmd).await.context("Failed to login")?;
        Ok(result.success())
    }

    /// Deploy the app in the working directory. Returns whether deploy exited cleanly.
    pub async fn deploy(&self, options: Option<&DeployOptions>) -> Result<bool> {
        let cmd = Command::new(BINARY_NAME).args(deploy_args(options));
        let result = self
            .invoker
            .invoke(&cmd)
            .await
            .context("Failed to deploy app to Fermyon Cloud")?;
        Ok(result.success())
    }
}
