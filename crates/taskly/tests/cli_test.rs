//! Integration tests for the `taskly` CLI binary.
//!
//! Argument parsing, help output, completions and error exit codes run
//! without any service; the end-to-end cases talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `taskly` binary with env isolation.
///
/// Clears all `TASKLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn taskly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("taskly");
    cmd.env("HOME", "/tmp/taskly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/taskly-cli-test-nonexistent")
        .env_remove("TASKLY_PROFILE")
        .env_remove("TASKLY_ENDPOINT")
        .env_remove("TASKLY_OUTPUT")
        .env_remove("TASKLY_INSECURE")
        .env_remove("TASKLY_TIMEOUT")
        .env_remove("TASKLY_DEFAULT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

/// An endpoint on a port nothing listens on.
fn dead_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api/tasks")
}

fn record(id: &str, title: &str, done: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "isCompleted": done,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z",
    })
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = taskly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    taskly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("task collection")
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("toggle"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn test_version_flag() {
    taskly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taskly"));
}

#[test]
fn test_completions_zsh() {
    taskly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    taskly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    taskly_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"))
        .stderr(predicate::str::contains("10.0.2.2:3000"));
}

#[test]
fn test_unknown_profile() {
    taskly_cmd()
        .args(["--profile", "nope", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope"));
}

// ── Error exit codes ────────────────────────────────────────────────

#[test]
fn test_blank_title_is_usage_error_without_service() {
    taskly_cmd()
        .args(["--endpoint", &dead_endpoint(), "add", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("title"));
}

#[test]
fn test_edit_without_changes_is_usage_error() {
    taskly_cmd()
        .args(["--endpoint", &dead_endpoint(), "edit", "t1"])
        .assert()
        .code(2);
}

#[test]
fn test_unreachable_service_is_connection_error() {
    taskly_cmd()
        .args(["--endpoint", &dead_endpoint(), "list"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_endpoint() {
    taskly_cmd()
        .args(["--endpoint", "not a url", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("endpoint"));
}

// ── Against a service ───────────────────────────────────────────────

async fn service(tasks: Value) -> (MockServer, String) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(&server)
        .await;
    let endpoint = format!("{}/api/tasks", server.uri());
    (server, endpoint)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json() {
    let tasks = json!([record("t1", "Buy milk", false), record("t2", "Walk dog", true)]);
    let (_server, endpoint) = service(tasks.clone()).await;

    let mut cmd = taskly_cmd();
    cmd.args(["--endpoint", &endpoint, "list", "-o", "json"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{output:?}");
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed, tasks);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_missing_task() {
    let (_server, endpoint) = service(json!([record("t1", "Buy milk", false)])).await;

    let mut cmd = taskly_cmd();
    cmd.args(["--endpoint", &endpoint, "show", "t9"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_toggle_sends_status_only() {
    let (server, endpoint) = service(json!([record("t1", "Buy milk", false)])).await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("t1", "Buy milk", true)))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = taskly_cmd();
    cmd.args(["--endpoint", &endpoint, "-o", "plain", "toggle", "t1"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{output:?}");

    let puts: Vec<Value> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(puts, vec![json!({ "isCompleted": true })]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_requires_confirmation_when_not_interactive() {
    let (server, endpoint) = service(json!([record("t1", "Buy milk", false)])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = taskly_cmd();
    cmd.args(["--endpoint", &endpoint, "delete", "t1"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let (server, endpoint) = service(json!([record("t1", "Buy milk", false)])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = taskly_cmd();
    cmd.args(["--endpoint", &endpoint, "--yes", "delete", "t1"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{output:?}");
}
