//! Exercises `SystemHost` through the `Host` trait against a real filesystem.

use flate2::Compression;
use flate2::write::GzEncoder;
use spin_setup_core::{Command, Host};
use spin_setup_host::SystemHost;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn spin_tarball(dir: &Path, script: &[u8]) -> PathBuf {
    let path = dir.join("spin-v2.0.0-linux-amd64.tar.gz");
    let file = File::create(&path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let mut header = tar::Header::new_gnu();
    header.set_path("spin").unwrap();
    header.set_size(script.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, script).unwrap();

    builder.into_inner().unwrap().finish().unwrap();
    path
}

#[tokio::test]
async fn extract_lands_in_unique_work_dir_folders() {
    let temp = TempDir::new().unwrap();
    let host = SystemHost::new(temp.path().join("work")).unwrap();
    let archive = spin_tarball(temp.path(), b"#!/bin/sh\necho hi\n");

    let first = host.extract_tar_gz(&archive).await.unwrap();
    let second = host.extract_tar_gz(&archive).await.unwrap();

    assert_ne!(first, second);
    assert!(first.starts_with(host.work_dir()));
    assert!(first.join("spin").is_file());
}

#[tokio::test]
async fn read_to_string_reports_missing_files() {
    let temp = TempDir::new().unwrap();
    let host = SystemHost::new(temp.path()).unwrap();

    let err = host
        .read_to_string(&temp.path().join("latest"))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("read failed: "));
}

#[tokio::test]
async fn add_folder_to_path_appends_github_path_file() {
    let temp = TempDir::new().unwrap();
    let github_path = temp.path().join("github_path");
    let host = SystemHost::new(temp.path().join("work"))
        .unwrap()
        .with_github_path(&github_path);

    host.add_folder_to_path(Path::new("/opt/spin/a"));
    host.add_folder_to_path(Path::new("/opt/spin/b"));

    let written = std::fs::read_to_string(&github_path).unwrap();
    assert_eq!(written, "/opt/spin/a\n/opt/spin/b\n");
    assert_eq!(
        host.path_folders(),
        vec![PathBuf::from("/opt/spin/a"), PathBuf::from("/opt/spin/b")]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn installed_binary_is_found_on_registered_path() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let host = SystemHost::new(temp.path().join("work")).unwrap();
    let archive = spin_tarball(temp.path(), b"#!/bin/sh\necho \"spin 9.9.9\"\n");

    let folder = host.extract_tar_gz(&archive).await.unwrap();
    let binary = folder.join("spin");
    host.chmod(&binary, 0o755).await.unwrap();
    host.add_folder_to_path(&folder);

    let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);

    let result = host
        .execute(&Command::new("spin").args(["--version"]).capture_output(true))
        .await
        .unwrap();
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout.as_deref().map(str::trim), Some("spin 9.9.9"));
}

#[tokio::test]
async fn chmod_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let host = SystemHost::new(temp.path()).unwrap();

    let err = host.chmod(&temp.path().join("nope"), 0o755).await.unwrap_err();
    assert!(err.to_string().starts_with("chmod failed: "));
}
