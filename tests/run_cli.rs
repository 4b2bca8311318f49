// tests/run_cli.rs

mod common;
use crate::common::http_stub::{HttpStub, StubResponse};
use crate::common::{init_tracing, with_timeout};

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use pagewatch::cli::CliArgs;
use pagewatch::errors::PagewatchError;
use pagewatch::watcher::{ChangeEvent, CheckOutcome};
use pagewatch::{run, RunSummary};

/// Two digest resources, `broken` answering 500 and `embassy` answering 200.
/// Notifications go to the stub too, in case credentials sit in the
/// environment.
fn write_config(dir: &Path, stub: &HttpStub) -> String {
    let contents = format!(
        r#"
[config]
cache_backend = "memory"
timeout_secs = 5

[notify]
endpoint = "{api}"

[resource.broken]
url = "{broken}"

[resource.embassy]
url = "{embassy}"
"#,
        api = stub.base_url(),
        broken = stub.url("/down"),
        embassy = stub.url("/oeb-teheran"),
    );
    let path = dir.join("Pagewatch.toml");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

async fn page_stub() -> HttpStub {
    HttpStub::start(|req| {
        if req.path() == "/down" {
            StubResponse::with_status(500, "text/plain", b"maintenance")
        } else if req.path().starts_with("/bot") {
            StubResponse::json(r#"{"ok":true,"result":{}}"#)
        } else {
            StubResponse::html("<h1>Embassy</h1>")
        }
    })
    .await
}

fn args(config: String) -> CliArgs {
    CliArgs {
        config,
        resources: vec![],
        at: Some("10:17".into()),
        log_level: None,
        dry_run: false,
    }
}

fn page_fetches(stub: &HttpStub) -> usize {
    stub.requests()
        .iter()
        .filter(|r| !r.path().starts_with("/bot"))
        .count()
}

#[tokio::test]
async fn failing_resource_does_not_stop_the_others() {
    init_tracing();

    let stub = page_stub().await;
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &stub);

    let summary: RunSummary = with_timeout(run(args(config))).await.unwrap();

    assert_eq!(
        summary.outcomes,
        vec![
            ("broken".to_string(), CheckOutcome::FetchFailed),
            (
                "embassy".to_string(),
                CheckOutcome::Completed(vec![ChangeEvent::FirstObservation])
            ),
        ]
    );
    assert!(!summary.all_succeeded());
    assert_eq!(page_fetches(&stub), 2);
}

#[tokio::test]
async fn resource_flag_limits_and_dedups_the_checks() {
    init_tracing();

    let stub = page_stub().await;
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &stub);

    let mut cli = args(config);
    cli.resources = vec!["embassy".into(), "embassy".into()];
    let summary = with_timeout(run(cli)).await.unwrap();

    assert_eq!(summary.outcomes.len(), 1);
    assert!(summary.all_succeeded());
    assert_eq!(page_fetches(&stub), 1);
}

#[tokio::test]
async fn unknown_resource_is_rejected_before_fetching() {
    init_tracing();

    let stub = page_stub().await;
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &stub);

    let mut cli = args(config);
    cli.resources = vec!["embassy".into(), "consulate".into()];

    match with_timeout(run(cli)).await {
        Err(PagewatchError::ConfigError(msg)) => {
            assert!(msg.contains("unknown resource 'consulate'"), "{msg}");
        }
        other => panic!("expected a config error, got {other:?}"),
    }
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn dry_run_fetches_nothing() {
    init_tracing();

    let stub = page_stub().await;
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &stub);

    let mut cli = args(config);
    cli.dry_run = true;
    let summary = with_timeout(run(cli)).await.unwrap();

    assert!(summary.outcomes.is_empty());
    assert!(summary.all_succeeded());
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn malformed_at_is_a_config_error() {
    init_tracing();

    let stub = page_stub().await;
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &stub);

    let mut cli = args(config);
    cli.at = Some("quarter past ten".into());

    assert!(matches!(
        with_timeout(run(cli)).await,
        Err(PagewatchError::ConfigError(_))
    ));
}
