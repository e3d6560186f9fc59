//! End-to-end behavior of the install and cloud workflows against a fake host.

use spin_setup_core::testing::FakeHost;
use spin_setup_core::{Cloud, DeployOptions, Error, Installer, KeyValue, Platform, Spin};
use std::sync::Arc;

#[tokio::test]
async fn install_targets_running_platform() {
    let host = Arc::new(FakeHost::new());

    let tool = Installer::new(host.clone()).download("2.0.0").await.unwrap();

    let platform = Platform::current();
    let expected_url = spin_setup_core::release::download_url("v2.0.0", &platform);
    assert_eq!(host.downloads(), vec![expected_url.clone()]);
    assert!(expected_url.contains("v2.0.0"));

    assert_eq!(host.chmods().len(), 1);
    assert_eq!(host.chmods()[0].1, 0o755);
    assert_eq!(host.path_folders(), vec![tool.path.clone()]);
    assert_eq!(tool.name, "spin");
}

#[tokio::test]
async fn install_empty_version_never_downloads() {
    let host = Arc::new(FakeHost::new());

    let err = Installer::new(host.clone()).download("").await.unwrap_err();

    assert!(matches!(err.root(), Error::InputRequired { .. }));
    assert!(host.downloads().is_empty());
    assert!(host.commands().is_empty());
}

#[tokio::test]
async fn install_then_query_version() {
    let host = Arc::new(FakeHost::new().with_stdout("spin 2.0.0\n"));

    Installer::new(host.clone()).download("v2.0.0").await.unwrap();
    let version = Spin::new(host.clone()).version().await.unwrap();

    assert_eq!(version, "spin 2.0.0");
    assert_eq!(host.commands().len(), 1);
}

#[tokio::test]
async fn login_then_deploy() {
    let host = Arc::new(FakeHost::new());
    let cloud = Cloud::new(host.clone());

    assert!(cloud.login("tok").await.unwrap());
    let opts = DeployOptions {
        environment_name: Some("prod".into()),
        variables: vec![KeyValue::new("greeting", "hello")],
        ..Default::default()
    };
    assert!(cloud.deploy(Some(&opts)).await.unwrap());

    let commands = host.commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(
        commands[0].args,
        vec!["cloud", "login", "--auth-method", "token", "--token", "tok"]
    );
    assert_eq!(
        commands[1].args,
        vec![
            "cloud",
            "deploy",
            "--environment-name",
            "prod",
            "--variable",
            "greeting=hello"
        ]
    );
}

#[tokio::test]
async fn login_empty_token_records_no_invocations() {
    let host = Arc::new(FakeHost::new());

    assert!(Cloud::new(host.clone()).login("").await.is_err());
    assert!(host.commands().is_empty());
}
