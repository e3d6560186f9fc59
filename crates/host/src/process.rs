//! Process execution with a search path extended by installed tools.

use spin_setup_core::{Command, CommandResult, Error, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tracing::debug;

/// Build the child `PATH`: registered folders first, most recent first,
/// followed by the inherited `PATH`.
pub fn search_path(folders: &[PathBuf], inherited: Option<OsString>) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = folders.iter().rev().cloned().collect();
    if let Some(inherited) = inherited {
        entries.extend(std::env::split_paths(&inherited));
    }
    std::env::join_paths(entries).map_err(|e| Error::host("execute", format!("invalid PATH: {e}")))
}

/// Run a command to completion.
///
/// Captured commands get a piped stdout; everything else inherits the
/// parent's stdio. A process killed by a signal reports exit code -1.
pub async fn run(command: &Command, path: Option<OsString>) -> Result<CommandResult> {
    debug!(command = %command.describe(), "Spawning process");

    let mut cmd = tokio::process::Command::new(&command.command);
    cmd.args(&command.args);
    if let Some(path) = path {
        cmd.env("PATH", path);
    }

    let spawn_error =
        |e: std::io::Error| Error::host("execute", format!("failed to run {}: {e}", command.command));

    if command.capture_output {
        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(spawn_error)?;
        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        })
    } else {
        let status = cmd.status().await.map_err(spawn_error)?;
        Ok(CommandResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_orders_newest_first() {
        let folders = vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")];
        let inherited = std::env::join_paths(["/usr/bin", "/bin"]).unwrap();

        let joined = search_path(&folders, Some(inherited)).unwrap();
        let entries: Vec<PathBuf> = std::env::split_paths(&joined).collect();

        assert_eq!(
            entries,
            vec![
                PathBuf::from("/opt/b"),
                PathBuf::from("/opt/a"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin"),
            ]
        );
    }

    #[test]
    fn test_search_path_without_inherited() {
        let joined = search_path(&[PathBuf::from("/opt/spin")], None).unwrap();
        assert_eq!(joined, OsString::from("/opt/spin"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout() {
        let cmd = Command::new("sh")
            .args(["-c", "echo spin 2.0.0"])
            .capture_output(true);

        let result = run(&cmd, None).await.unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.as_deref(), Some("spin 2.0.0\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_code() {
        let cmd = Command::new("sh").args(["-c", "exit 3"]);

        let result = run(&cmd, None).await.unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(result.stdout.is_none());
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let cmd = Command::new("spin-setup-definitely-missing-binary");

        let err = run(&cmd, None).await.unwrap_err();
        assert!(matches!(err, Error::Host { ref operation, .. } if operation == "execute"));
    }
}
