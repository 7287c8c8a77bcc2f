use assert_cmd::Command;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use httpmock::MockServer;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write key");
    file
}

fn gh_keys(server: &MockServer) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gh-keys"));
    cmd.env("GH_KEYS_API_URL", server.base_url())
        .args(["-u", "octocat", "-t", "ghp_token"]);
    cmd
}

#[test]
fn test_checks_credentials_with_basic_auth() {
    let server = MockServer::start();
    let auth = format!("Basic {}", STANDARD.encode("octocat:ghp_token"));
    let mock = server.mock(|when, then| {
        when.method("GET").path("/user").header("authorization", auth.as_str());
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"login":"octocat","id":583231}"#);
    });

    gh_keys(&server)
        .args(["--test", "-l"])
        .assert()
        .success()
        .stderr(contains("API Response: {"))
        .stderr(contains("\"login\": \"octocat\""));
    mock.assert();
}

#[test]
fn create_uploads_first_line_of_key_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/user/keys")
            .json_body(serde_json::json!({"title": "mykey", "key": "ssh-ed25519 AAAA... comment"}));
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":2,"key":"ssh-ed25519 AAAA...","title":"mykey"}"#);
    });

    let key = key_file("ssh-ed25519 AAAA... comment\nsecond line\n");
    gh_keys(&server)
        .args(["-c", "--title", "mykey", "-f"])
        .arg(key.path())
        .assert()
        .success()
        .stderr(contains("\"id\": 2"));
    mock.assert();
}

#[test]
fn create_without_file_exits_with_usage_status() {
    let server = MockServer::start();
    let any = server.mock(|_when, then| {
        then.status(200).body("{}");
    });

    gh_keys(&server)
        .arg("--create")
        .assert()
        .code(1)
        .stdout(contains("--file (-f) must specify a file to read from"));
    any.assert_calls(0);
}

#[test]
fn create_with_empty_file_flag_exits_with_usage_status() {
    let server = MockServer::start();
    let any = server.mock(|_when, then| {
        then.status(200).body("{}");
    });

    gh_keys(&server)
        .args(["-c", "-f", ""])
        .assert()
        .code(1)
        .stdout(contains("--file (-f) must specify a file to read from"));
    any.assert_calls(0);
}

#[test]
fn create_with_unreadable_file_fails() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().expect("tmp dir");

    gh_keys(&server)
        .arg("-c")
        .arg("-f")
        .arg(dir.path().join("missing.pub"))
        .assert()
        .failure()
        .stderr(contains("failed to read key file"));
}

#[test]
fn list_prints_keys_in_server_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/user/keys");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":1,"title":"a"}]"#);
    });

    gh_keys(&server)
        .arg("--list")
        .assert()
        .success()
        .stderr(contains("[\n    {\n        \"id\": 1,\n        \"title\": \"a\"\n    }\n]"));
}

#[test]
fn delete_sends_one_delete_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/user/keys/42");
        then.status(204);
    });

    gh_keys(&server)
        .args(["-d", "42"])
        .assert()
        .success()
        .stderr(contains("204 No Content"));
    mock.assert_calls(1);
}

#[test]
fn no_action_prints_hint_and_succeeds() {
    let server = MockServer::start();
    let any = server.mock(|_when, then| {
        then.status(200).body("{}");
    });

    gh_keys(&server)
        .assert()
        .success()
        .stdout(contains("did you specify an action to take?"));
    any.assert_calls(0);
}

#[test]
fn bad_credentials_are_reported_without_failing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/user/keys");
        then.status(401)
            .header("content-type", "application/json")
            .body(r#"{"message":"Bad credentials"}"#);
    });

    gh_keys(&server)
        .arg("-l")
        .assert()
        .success()
        .stderr(contains("401 Unauthorized"))
        .stderr(contains("\"message\": \"Bad credentials\""));
}

#[test]
fn non_json_response_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/user/keys");
        then.status(502).body("<html>bad gateway</html>");
    });

    gh_keys(&server)
        .arg("-l")
        .assert()
        .failure()
        .stderr(contains("not valid JSON"));
}

#[test]
fn unknown_flag_is_rejected() {
    let server = MockServer::start();
    gh_keys(&server).arg("--bogus").assert().failure();
}
