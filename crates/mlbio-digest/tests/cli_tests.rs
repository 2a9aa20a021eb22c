//! Exit-code tests for the compiled binary.

use std::process::Output;

use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Every variable the binary reads is set explicitly (blank counts as unset),
/// since `.env` loading never overrides a variable that already exists. The
/// binary also runs outside the repository so no `.env` is found at all.
fn digest_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mlbio-digest"));
    cmd.env("SLACK_WEBHOOK_URL", "")
        .env("CROSSREF_API_URL", "")
        .env("ARXIV_API_URL", "")
        .env("ALTMETRIC_API_URL", "")
        .env("CROSSREF_MAILTO", "")
        .env("RUST_LOG", "warn")
        .current_dir(std::env::temp_dir());
    cmd
}

async fn run(mut cmd: Command) -> Output {
    cmd.output().await.expect("binary runs")
}

#[tokio::test]
async fn test_missing_webhook_exits_with_config_error() {
    let output = run(digest_command()).await;

    // Exits before any network call; nothing is posted anywhere.
    assert!(output.stdout.is_empty());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SLACK_WEBHOOK_URL"), "stderr: {stderr}");
}

#[tokio::test]
async fn test_dotenv_does_not_override_blank_webhook() {
    let dir = std::env::temp_dir().join(format!("mlbio-digest-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "SLACK_WEBHOOK_URL=http://127.0.0.1:9/hook\n").unwrap();

    let mut cmd = digest_command();
    cmd.current_dir(&dir);
    let output = run(cmd).await;
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_webhook_failure_exits_non_zero_after_one_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server_error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let mut cmd = digest_command();
    // Source and metrics paths are unmocked, so both sources come back empty.
    cmd.env("SLACK_WEBHOOK_URL", format!("{base}/webhook"))
        .env("CROSSREF_API_URL", format!("{base}/crossref"))
        .env("ARXIV_API_URL", format!("{base}/arxiv"))
        .env("ALTMETRIC_API_URL", format!("{base}/altmetric"));

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_successful_delivery_exits_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let mut cmd = digest_command();
    cmd.env("SLACK_WEBHOOK_URL", format!("{base}/webhook"))
        .env("CROSSREF_API_URL", format!("{base}/crossref"))
        .env("ARXIV_API_URL", format!("{base}/arxiv"))
        .env("ALTMETRIC_API_URL", format!("{base}/altmetric"));

    let output = run(cmd).await;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Posted 0 items"));
}
