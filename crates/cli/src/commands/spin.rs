use spin_setup_core::{BINARY_NAME, CommandResult, Host, Spin};
use std::sync::Arc;

use crate::errors::{CliError, CliResult};

fn check(command: String, result: &CommandResult) -> CliResult<()> {
    if result.success() {
        Ok(())
    } else {
        Err(CliError::command_failed(command, Some(result.exit_code)))
    }
}

pub async fn build(host: Arc<dyn Host>) -> CliResult<()> {
    let result = Spin::new(host).build().await?;
    check(format!("{BINARY_NAME} build"), &result)
}

pub async fn version(host: Arc<dyn Host>) -> CliResult<String> {
    Ok(Spin::new(host).version().await?)
}

pub async fn invoke(host: Arc<dyn Host>, name: &str, args: Vec<String>) -> CliResult<()> {
    let result = Spin::new(host).invoke_command(name, args).await?;
    check(format!("{BINARY_NAME} {name}"), &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin_setup_core::testing::FakeHost;

    #[tokio::test]
    async fn test_build_failure_carries_exit_code() {
        let host = Arc::new(FakeHost::new().with_exit_code(3));

        let err = build(host).await.unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "`spin build` did not succeed (exit code 3)");
    }

    #[tokio::test]
    async fn test_invoke_passes_args_through() {
        let host = Arc::new(FakeHost::new());

        invoke(host.clone(), "up", vec!["--listen".into(), "127.0.0.1:3000".into()])
            .await
            .unwrap();

        let commands = host.commands();
        assert_eq!(commands[0].args, vec!["up", "--listen", "127.0.0.1:3000"]);
    }

    #[tokio::test]
    async fn test_version_output() {
        let host = Arc::new(FakeHost::new().with_stdout("spin 2.1.0\n"));
        assert_eq!(version(host).await.unwrap(), "spin 2.1.0");
    }
}
