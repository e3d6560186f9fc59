//! `spin-setup`: install the Fermyon Spin CLI and run it from CI pipelines.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod config;
mod errors;
mod tracing;

use spin_setup_host::SystemHost;
use std::sync::Arc;

use crate::cli::{Cli, parse};
use crate::config::Config;
use crate::errors::CliResult;
use crate::tracing::{TracingConfig, TracingFormat};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = parse();

    let tracing_config = TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            TracingFormat::Pretty
        },
        level: cli.level.into(),
        ..Default::default()
    };
    if let Err(e) = crate::tracing::init_tracing(tracing_config) {
        eprintln!("{e:?}");
    }

    if let Err(error) = run(cli).await {
        let code = error.exit_code();
        eprintln!("{:?}", miette::Report::new(error));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load(cli.config.as_deref())?;

    let mut host = SystemHost::from_env()?;
    if let Some(dir) = cli.spin_dir {
        host = host.with_path_folder(dir);
    }
    ::tracing::debug!(?host, "Host configured");

    let output = commands::execute(cli.command, config, Arc::new(host)).await?;
    if let Some(output) = output {
        println!("{output}");
    }
    Ok(())
}
