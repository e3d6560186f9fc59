//! Subcommand implementations.
//!
//! Each command runs against an `Arc<dyn Host>` and returns the text it
//! wants printed on stdout, if any. `main` owns the real host and printing.

pub mod cloud;
pub mod install;
pub mod spin;

use spin_setup_core::Host;
use std::sync::Arc;
use tracing::instrument;

use crate::cli::Commands;
use crate::config::Config;
use crate::errors::CliResult;

/// Run one parsed subcommand.
#[instrument(skip_all)]
pub async fn execute(
    command: Commands,
    config: Config,
    host: Arc<dyn Host>,
) -> CliResult<Option<String>> {
    match command {
        Commands::Install {
            version,
            repository,
        } => {
            let version = version
                .or(config.version)
                .unwrap_or_else(|| spin_setup_core::version::LATEST.to_string());
            let repository = repository.or(config.repository);
            install::execute(host, &version, repository.as_deref()).await
        }
        Commands::Build => spin::build(host).await.map(|()| None),
        Commands::Version => spin::version(host).await.map(Some),
        Commands::Invoke { name, args } => spin::invoke(host, &name, args).await.map(|()| None),
        Commands::Login { token } => cloud::login(host, &token).await.map(|()| None),
        Commands::Deploy(args) => {
            let options = args.merge_into(config.deploy);
            cloud::deploy(host, &options).await.map(|()| None)
        }
    }
}
