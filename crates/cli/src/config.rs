//! Optional `spin-setup.toml` configuration.
//!
//! ```toml
//! version = "2.0.0"
//! repository = "fermyon/spin"
//!
//! [deploy]
//! environment_name = "staging"
//! readiness_timeout = 120
//! variables = [{ key = "greeting", value = "hello" }]
//! ```

use serde::Deserialize;
use spin_setup_core::DeployOptions;
use std::path::{Path, PathBuf};

use crate::errors::{CliError, CliResult};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "spin-setup.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Version installed when none is given on the command line.
    pub version: Option<String>,
    /// Release repository override.
    pub repository: Option<String>,
    /// Default deploy options.
    pub deploy: DeployOptions,
}

impl Config {
    /// Load from an explicit path, or from the default file if it exists.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let src = std::fs::read_to_string(&path).map_err(|source| CliError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(?path, "Loaded config file");
        Self::parse(&src, &path)
    }

    /// Parse config source, attributing errors to `path`.
    pub fn parse(src: &str, path: &Path) -> CliResult<Self> {
        toml::from_str(src).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
            src: src.to_string(),
            span: e.span().map(Into::into),
        })
    }
}
