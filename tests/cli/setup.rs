//! Tests for `mirrorer setup` command.
//!
//! API calls go to a wiremock server passed via `--api-url`.

use assert_cmd::Command;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use mirrorer::core::cipher::{Cipher, SealedBox};
use serde_json::{json, Value};
use std::process::Output;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::commands::TEST_TOKEN;
use crate::support::*;

/// Run a command off the async runtime.
async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("failed to run mirrorer"))
        .await
        .expect("command task panicked")
}

/// Mount the coordinator's secrets public key and return the matching
/// private key.
async fn mount_public_key(server: &MockServer, expected: u64) -> SecretKey {
    let store = SecretKey::generate(&mut OsRng);
    Mock::given(method("GET"))
        .and(path("/repos/dune-mirrors/mirrorer/actions/secrets/public-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key_id": "568250167242549743",
            "key": STANDARD.encode(store.public_key().as_bytes()),
        })))
        .expect(expected)
        .mount(server)
        .await;
    store
}

#[test]
fn test_setup_without_token_fails() {
    let t = Test::with_repos(FOO_BAR_REPOS);

    let output = t.cmd().arg("setup").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "GITHUB_TOKEN");
}

#[test]
fn test_setup_token_from_dotenv() {
    let t = Test::with_repos("{}");
    t.write(".env", "GITHUB_TOKEN=ghp_from_dotenv\n");

    let output = t.cmd().arg("setup").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no repositories");
}

#[test]
fn test_setup_missing_repos_file_fails() {
    let t = Test::new();

    let output = t.setup_cmd(TEST_TOKEN, &[]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "repository list not found");
    assert_stderr_contains(&output, "--repos");
}

#[test]
fn test_setup_invalid_coordinator_fails() {
    let t = Test::with_repos(FOO_BAR_REPOS);

    let output = t
        .setup_cmd(TEST_TOKEN, &["--coordinator", "no-owner"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid coordinator");
}

#[test]
fn test_setup_rejects_invalid_repo_name() {
    let t = Test::with_repos(r#"{"bad name": "https://example.com/x.git"}"#);

    let output = t.setup_cmd(TEST_TOKEN, &[]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid repository name");
}

#[test]
fn test_setup_rejects_name_without_valid_secret_name() {
    let t = Test::with_repos(LOOSE_NAME_REPOS);

    let output = t.setup_cmd(TEST_TOKEN, &[]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid repository name");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_setup_provisions_new_repository() {
    crate::skip_without_ssh_keygen!();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/dune-mirrors/foo-bar"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orgs/dune-mirrors/repos"))
        .and(body_partial_json(json!({
            "name": "foo-bar",
            "private": false,
            "has_issues": false,
            "has_projects": false,
            "has_wiki": false,
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/dune-mirrors/foo-bar/keys"))
        .and(header("authorization", "Bearer ghp_test_token"))
        .and(body_partial_json(json!({
            "title": "Mirror Deploy Key",
            "read_only": false,
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let store = mount_public_key(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path(
            "/repos/dune-mirrors/mirrorer/actions/secrets/SSH_KEY_foo_bar",
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::with_repos(FOO_BAR_REPOS);
    let output = run(t.setup_against(&server.uri())).await;
    assert_success(&output);
    assert_stdout_contains(&output, "created");
    assert_stdout_contains(&output, "provisioned 1 of 1");

    let requests = server.received_requests().await.unwrap();

    let key_request = requests
        .iter()
        .find(|r| r.url.path().ends_with("/keys"))
        .unwrap();
    let body: Value = key_request.body_json().unwrap();
    let public_key = body["key"].as_str().unwrap();
    assert!(public_key.starts_with("ssh-rsa "));
    assert!(public_key.ends_with("deploy-key-foo-bar@dune-mirrors"));

    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let body: Value = put.body_json().unwrap();
    assert_eq!(body["key_id"], "568250167242549743");

    let private_key = SealedBox
        .decrypt(body["encrypted_value"].as_str().unwrap(), &store)
        .unwrap();
    assert!(private_key.contains("PRIVATE KEY"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_setup_stops_at_first_failure() {
    crate::skip_without_ssh_keygen!();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/dune-mirrors/alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "alpha" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/dune-mirrors/alpha/keys"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "key is already in use" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Nothing after the failing stage may run, for this or any later entry
    mount_public_key(&server, 0).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/dune-mirrors/beta"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::with_repos(
        r#"{"beta": "https://example.com/beta.git", "alpha": "https://example.com/alpha.git"}"#,
    );
    let output = run(t.setup_against(&server.uri())).await;
    assert_failure(&output);
    assert_stdout_contains(&output, "failed");
    assert_stderr_contains(&output, "alpha: register deploy key failed");
    assert_stderr_contains(&output, "key is already in use");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_setup_skip_provisioned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/dune-mirrors/foo-bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "foo-bar" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/dune-mirrors/foo-bar/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "title": "Mirror Deploy Key", "read_only": false }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/repos/dune-mirrors/mirrorer/actions/secrets/SSH_KEY_foo_bar",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "SSH_KEY_foo_bar" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::with_repos(FOO_BAR_REPOS);
    let mut cmd = t.setup_against(&server.uri());
    cmd.arg("--skip-provisioned");
    let output = run(cmd).await;
    assert_success(&output);
    assert_stdout_contains(&output, "skipped");
    assert_stdout_contains(&output, "1 skipped");
}
