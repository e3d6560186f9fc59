use spin_setup_core::{Cloud, DeployOptions, Host};
use std::sync::Arc;

use crate::errors::{CliError, CliResult};

pub async fn login(host: Arc<dyn Host>, token: &str) -> CliResult<()> {
    if Cloud::new(host).login(token).await? {
        Ok(())
    } else {
        Err(CliError::command_failed("spin cloud login", None))
    }
}

pub async fn deploy(host: Arc<dyn Host>, options: &DeployOptions) -> CliResult<()> {
    if Cloud::new(host).deploy(Some(options)).await? {
        Ok(())
    } else {
        Err(CliError::command_failed("spin cloud deploy", None))
    }
}
