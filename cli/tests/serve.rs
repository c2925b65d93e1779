//! # Helpdesk CLI Serve Integration Tests
//!
//! File: cli/tests/serve.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Starts `helpdesk serve` as a child process, waits for the startup banner
//! to learn the bound port, then drives the session API over HTTP. Only
//! greetings are submitted, so no model is contacted.
//!

mod common;
use common::*;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader};
use std::process::{Child, Stdio};
use tempfile::{tempdir, TempDir};

/// Kills the server when the test ends, pass or fail.
struct ServerGuard(Child);

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn start_server(sandbox: &TempDir, port: u16) -> (ServerGuard, String) {
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("helpdesk"));
    cmd.current_dir(sandbox.path())
        .env_remove("RUST_LOG")
        .env("HOME", sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join(".config"))
        .env("GEMINI_API_KEY", TEST_API_KEY)
        .args(["serve", "--port", &port.to_string()])
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = cmd.spawn().expect("Failed to start helpdesk serve");
    let stdout = child.stdout.take().expect("stdout is piped");
    let guard = ServerGuard(child);

    let mut bound_port = None;
    for line in BufReader::new(stdout).lines() {
        let line = line.expect("Failed to read server stdout");
        if let Some(url) = line.split("http://localhost:").nth(1) {
            bound_port = url.trim().parse::<u16>().ok();
        }
        if line.contains("Server starting!") {
            break;
        }
    }
    let port = bound_port.expect("Server did not print its local URL");
    (guard, format!("http://127.0.0.1:{}", port))
}

async fn wait_until_healthy(client: &reqwest::Client, base: &str) {
    for _ in 0..50 {
        if let Ok(response) = client.get(format!("{}/health", base)).send().await {
            if response.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    panic!("Server at {} never became healthy", base);
}

#[tokio::test]
async fn test_serve_session_lifecycle() {
    let sandbox = tempdir().unwrap();
    let (_server, base) = start_server(&sandbox, 58731);
    let client = reqwest::Client::new();
    wait_until_healthy(&client, &base).await;

    let created: Value = client
        .post(format!("{}/api/sessions", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["session_id"].as_str().unwrap().to_string();
    let messages_url = format!("{}/api/sessions/{}/messages", base, id);

    let response = client
        .post(&messages_url)
        .json(&json!({ "text": "hey" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["content"], GREETING_REPLY);

    let response = client
        .post(&messages_url)
        .json(&json!({ "text": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let transcript: Value = client.get(&messages_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(transcript.as_array().unwrap().len(), 2);

    let response = client
        .delete(format!("{}/api/sessions/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = client.get(&messages_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
