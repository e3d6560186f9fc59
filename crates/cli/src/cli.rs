use clap::{Args, Parser, Subcommand};
use spin_setup_core::{DeployOptions, KeyValue};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spin-setup")]
#[command(about = "Install the Fermyon Spin CLI and drive it from build pipelines")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,

    #[arg(
        short = 'c',
        long,
        global = true,
        env = "SPIN_SETUP_CONFIG",
        help = "Path to a spin-setup.toml configuration file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "SPIN_DIR",
        help = "Folder containing an already installed spin binary"
    )]
    pub spin_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Download and install a Spin release")]
    Install {
        #[arg(
            env = "SPIN_VERSION",
            help = "Version to install: 'latest', or a tag such as 2.0.0 or v2.0.0"
        )]
        version: Option<String>,
        #[arg(long, help = "GitHub repository releases are fetched from (owner/name)")]
        repository: Option<String>,
    },
    #[command(about = "Run `spin build`")]
    Build,
    #[command(about = "Print the installed Spin version")]
    Version,
    #[command(about = "Run an arbitrary spin subcommand")]
    Invoke {
        #[arg(help = "Subcommand to run")]
        name: String,
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            help = "Arguments passed through to the subcommand"
        )]
        args: Vec<String>,
    },
    #[command(about = "Log in to Fermyon Cloud with a personal access token")]
    Login {
        #[arg(long, env = "SPIN_AUTH_TOKEN", hide_env_values = true)]
        token: String,
    },
    #[command(about = "Deploy the app in the working directory to Fermyon Cloud")]
    Deploy(DeployArgs),
}

#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    #[arg(long, help = "Deploy into this environment")]
    pub environment_name: Option<String>,

    #[arg(long = "no-buildinfo", help = "Do not attach build information")]
    pub no_build_info: bool,

    #[arg(long, value_name = "SECONDS", help = "Seconds to wait for the app to become ready")]
    pub readiness_timeout: Option<u64>,

    #[arg(long = "variable", value_name = "KEY=VALUE", help = "Application variable (repeatable)")]
    pub variables: Vec<KeyValue>,

    #[arg(long = "key-value", value_name = "KEY=VALUE", help = "Key-value store entry (repeatable)")]
    pub key_values: Vec<KeyValue>,
}

impl DeployArgs {
    /// Layer command-line flags over options from the config file.
    ///
    /// Scalars given on the command line win; list entries are appended
    /// after the configured ones.
    pub fn merge_into(self, mut base: DeployOptions) -> DeployOptions {
        if self.environment_name.is_some() {
            base.environment_name = self.environment_name;
        }
        base.no_build_info |= self.no_build_info;
        if self.readiness_timeout.is_some() {
            base.readiness_timeout = self.readiness_timeout;
        }
        base.variables.extend(self.variables);
        base.key_values.extend(self.key_values);
        base
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
