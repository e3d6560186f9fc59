use spin_setup_core::{Host, Installer, ReleaseSource, Spin};
use std::sync::Arc;
use tracing::instrument;

use crate::errors::CliResult;

/// Install `version` and report the installed folder.
#[instrument(skip(host))]
pub async fn execute(
    host: Arc<dyn Host>,
    version: &str,
    repository: Option<&str>,
) -> CliResult<Option<String>> {
    let mut installer = Installer::new(host.clone());
    if let Some(repository) = repository {
        installer = installer.with_source(ReleaseSource::new(repository));
    }

    let tool = installer.download(version).await?;
    let installed = Spin::new(host.clone()).version().await?;
    host.log(&format!("Installed Fermyon Spin {installed}"));

    Ok(Some(tool.path.display().to_string()))
}
