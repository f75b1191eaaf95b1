//! Integration tests for a full deploy against a loopback control plane.
//!
//! The control plane is a plain `TcpListener` that answers a fixed sequence
//! of responses and hands back the raw requests it received.

#![allow(clippy::expect_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::JoinHandle;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Serve one connection per response, in order. The handle yields the raw
/// requests (head and body).
fn serve(responses: Vec<Vec<u8>>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();
        for response in responses {
            let Ok((stream, _)) = listener.accept() else {
                break;
            };
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                request.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);
            request.push_str(&String::from_utf8_lossy(&body));
            let _ = reader.get_mut().write_all(&response);
            requests.push(request);
        }
        requests
    });
    (format!("http://127.0.0.1:{port}"), handle)
}

fn http_200(body: &[u8]) -> Vec<u8> {
    let mut r = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    r.extend_from_slice(body);
    r
}

fn http_status(code: u16, reason: &str) -> Vec<u8> {
    format!("HTTP/1.1 {code} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
        .into_bytes()
}

const ENVS_JSON: &[u8] = br#"[{"name":"foo","value":"bar","public":true}]"#;

/// A staged application: manifest with two hooks, a Procfile and a diff.
fn staged_app() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("tsuru.yml"),
        "hooks:\n  build:\n    - echo one >> hooks.log\n    - echo two >> hooks.log\n",
    )
    .expect("write manifest");
    std::fs::write(dir.path().join("Procfile"), "web: ./start\n").expect("write Procfile");
    std::fs::write(dir.path().join("diff"), "+changed line\n").expect("write diff");
    dir
}

fn agent(app_dir: &Path) -> Command {
    agent_with_config(app_dir, &app_dir.join("missing-config.yaml"))
}

fn agent_with_config(app_dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("deploy-agent"));
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .arg("--working-dir")
        .arg(app_dir)
        .arg("--envs-file")
        .arg(app_dir.join("app_envs"))
        .arg("--shell")
        .arg("/bin/sh");
    cmd
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).expect("read")
}

// ── Successful deploy ─────────────────────────────────────────────────────────

#[test]
fn test_deploy_runs_hooks_command_and_reports_diff() {
    let app = staged_app();
    let (url, server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    agent(app.path())
        .args([url.as_str(), "fake-token", "app1", "echo \"$foo\" > started.log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy of 'app1' finished"));

    let requests = server.join().expect("server");
    assert_eq!(requests.len(), 2);

    let register = &requests[0];
    assert!(register.starts_with("POST /apps/app1/units/register "), "{register}");
    assert!(register.contains("Authorization: bearer fake-token"), "{register}");
    assert!(register.contains("customdata="), "{register}");

    let diff = &requests[1];
    assert!(diff.starts_with("POST /apps/app1/diff "), "{diff}");
    assert!(diff.contains("Authorization: bearer fake-token"), "{diff}");
    assert!(diff.ends_with("+changed line\n"), "{diff}");

    assert_eq!(read(app.path().join("app_envs")), "export foo='bar'\n");
    assert_eq!(read(app.path().join("hooks.log")), "one\ntwo\n");
    assert_eq!(read(app.path().join("started.log")), "bar\n");
}

#[test]
fn test_deploy_accepts_legacy_deploy_argument() {
    let app = staged_app();
    let (url, server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    agent(app.path())
        .args([url.as_str(), "fake-token", "app1", "true", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy").not());

    assert_eq!(server.join().expect("server").len(), 2);
}

#[test]
fn test_deploy_warns_on_unknown_legacy_argument() {
    let app = staged_app();
    let (url, server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    agent(app.path())
        .args([url.as_str(), "fake-token", "app1", "true", "restart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ignoring unknown legacy action 'restart'"));

    assert_eq!(server.join().expect("server").len(), 2);
}

#[test]
fn test_deploy_first_deploy_sends_empty_diff() {
    let app = staged_app();
    std::fs::remove_file(app.path().join("diff")).expect("remove diff");
    let (url, server) = serve(vec![http_200(b"[]"), http_200(b"")]);

    agent(app.path())
        .args([url.as_str(), "fake-token", "app1", "true"])
        .assert()
        .success();

    let requests = server.join().expect("server");
    assert!(requests[1].starts_with("POST /apps/app1/diff "));
    assert!(requests[1].ends_with("\r\n\r\n"), "{}", requests[1]);
    assert_eq!(read(app.path().join("app_envs")), "");
}

#[test]
fn test_deploy_diff_failure_still_succeeds() {
    let app = staged_app();
    let (url, server) = serve(vec![
        http_200(ENVS_JSON),
        http_status(500, "Internal Server Error"),
    ]);

    agent(app.path())
        .args([url.as_str(), "fake-token", "app1", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HTTP 500"));

    assert_eq!(server.join().expect("server").len(), 2);
}

// ── Fatal failures ────────────────────────────────────────────────────────────

#[test]
fn test_deploy_registration_rejected_exits_one_without_running_hooks() {
    let app = staged_app();
    let (url, _server) = serve(vec![http_status(401, "Unauthorized")]);

    agent(app.path())
        .args([url.as_str(), "bad-token", "app1", "echo ran > started.log"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "fail: unit registration for app 'app1' failed",
        ))
        .stderr(predicate::str::contains("HTTP 401"));

    assert!(!app.path().join("hooks.log").exists());
    assert!(!app.path().join("started.log").exists());
    assert!(!app.path().join("app_envs").exists());
}

#[test]
fn test_deploy_unreachable_control_plane_exits_one() {
    let app = staged_app();
    // bind then drop to get a port nobody listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port();

    agent(app.path())
        .args([format!("http://127.0.0.1:{port}").as_str(), "t", "app1", "true"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot reach control plane"));
}

#[test]
fn test_deploy_failing_hook_exits_one_and_skips_command() {
    let app = staged_app();
    std::fs::write(
        app.path().join("tsuru.yml"),
        "hooks:\n  build:\n    - exit 3\n    - echo never >> hooks.log\n",
    )
    .expect("write manifest");
    let (url, _server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    agent(app.path())
        .args([url.as_str(), "fake-token", "app1", "echo ran > started.log"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("command `exit 3` failed: exit status 3"));

    assert!(!app.path().join("hooks.log").exists());
    assert!(!app.path().join("started.log").exists());
    // envs are persisted before hooks run
    assert_eq!(read(app.path().join("app_envs")), "export foo='bar'\n");
}

#[test]
fn test_deploy_malformed_manifest_exits_one_before_registration() {
    let app = staged_app();
    std::fs::write(app.path().join("tsuru.yml"), "hooks: [unclosed\n").expect("write");

    agent(app.path())
        .args(["http://127.0.0.1:1", "fake-token", "app1", "true"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse manifest"));
}

#[test]
fn test_deploy_malformed_config_exits_one() {
    let app = staged_app();
    let config = app.path().join("config.yaml");
    std::fs::write(&config, "working_dir: [\n").expect("write config");

    agent_with_config(app.path(), &config)
        .args(["http://127.0.0.1:1", "fake-token", "app1", "true"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

// ── Environment and working directory ─────────────────────────────────────────

#[test]
fn test_deploy_with_no_color_one_prints_plain_markers() {
    let app = staged_app();
    let (url, server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    agent(app.path())
        .env("NO_COLOR", "1")
        .args([url.as_str(), "fake-token", "app1", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("----> loading manifest..."))
        .stdout(predicate::str::contains("\x1b[").not());

    assert_eq!(server.join().expect("server").len(), 2);
}

#[test]
fn test_deploy_without_no_color_env_succeeds() {
    let app = staged_app();
    let (url, server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    // stdout is a pipe here, so colors stay off even without NO_COLOR
    agent(app.path())
        .env_remove("NO_COLOR")
        .args([url.as_str(), "fake-token", "app1", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy of 'app1' finished"))
        .stdout(predicate::str::contains("\x1b[").not());

    assert_eq!(server.join().expect("server").len(), 2);
}

#[test]
fn test_deploy_missing_working_dir_runs_from_root() {
    let out = TempDir::new().expect("tempdir");
    let marker = out.path().join("pwd.txt");
    let command = format!("pwd > '{}'", marker.display());
    let (url, server) = serve(vec![http_200(ENVS_JSON), http_200(b"")]);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("deploy-agent"));
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(out.path().join("missing-config.yaml"))
        .arg("--working-dir")
        .arg("/nonexistent/deploy-agent/app")
        .arg("--envs-file")
        .arg(out.path().join("app_envs"))
        .arg("--shell")
        .arg("/bin/sh")
        .args([url.as_str(), "fake-token", "app1", command.as_str()])
        .assert()
        .success();

    assert_eq!(read(&marker).trim(), "/");
    assert_eq!(read(out.path().join("app_envs")), "export foo='bar'\n");
    assert_eq!(server.join().expect("server").len(), 2);
}
