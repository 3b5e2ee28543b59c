//! CLI integration tests
//!
//! Runs the built binary and checks output formats and exit codes. Generation runs
//! offline so no LLM backend is needed.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn ideaforge_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ideaforge"))
}

/// Command with an isolated usage ledger and default stage budgets
fn ideaforge(usage_log: &Path) -> Command {
    let mut cmd = Command::new(ideaforge_bin());
    cmd.env("IDEAFORGE_USAGE_LOG", usage_log)
        .env("IDEAFORGE_LOG_LEVEL", "error")
        .env_remove("IDEAFORGE_REFINE_TIMEOUT")
        .env_remove("IDEAFORGE_DOMAIN_TIMEOUT")
        .env_remove("IDEAFORGE_PRODUCT_TIMEOUT")
        .env_remove("IDEAFORGE_MAX_CONCURRENCY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("Failed to execute ideaforge")
}

#[test]
fn test_cli_help() {
    let output = run(Command::new(ideaforge_bin()).arg("--help"));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ideaforge"));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("features"));
    assert!(stdout.contains("tools"));
}

#[test]
fn test_cli_version() {
    let output = run(Command::new(ideaforge_bin()).arg("--version"));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_features_json() {
    let output = run(Command::new(ideaforge_bin()).args([
        "features",
        "AI writing assistant with stripe billing",
        "--format",
        "json",
    ]));

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["detected_features"], serde_json::json!(["ai", "payments"]));
    assert_eq!(value["estimated_complexity"], "MVP");
    assert!(value["tech_stack"]["frontend"].is_string());
}

#[test]
fn test_tools_human() {
    let output = run(Command::new(ideaforge_bin()).arg("tools"));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["lovable", "replit", "base44", "claude_code"] {
        assert!(stdout.contains(id), "missing {}", id);
    }
}

#[test]
fn test_generate_offline_json() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("usage.jsonl");

    let output = run(ideaforge(&ledger).args([
        "-q",
        "generate",
        "A habit tracker app",
        "--offline",
        "--mode",
        "mvp",
        "--format",
        "json",
    ]));

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["refined_idea"], "A habit tracker app");
    assert_eq!(value["prompt_count"], 4);
    assert_eq!(value["estimated_complexity"], "MVP");

    let ledger_content = fs::read_to_string(&ledger).unwrap();
    assert_eq!(ledger_content.lines().count(), 1);
    assert!(ledger_content.contains("\"action\":\"generation\""));
}

#[test]
fn test_generate_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("package.yaml");

    let output = run(ideaforge(&dir.path().join("usage.jsonl")).args([
        "-q",
        "generate",
        "A clinic scheduler for small practices",
        "--offline",
        "--tool",
        "base44",
        "--format",
        "yaml",
        "--output",
        out.to_str().unwrap(),
    ]));

    assert_eq!(output.status.code(), Some(0));
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("entity_reference"));
    assert!(written.contains("scheduling"));
}

#[test]
fn test_generate_too_short_exits_2() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("usage.jsonl");

    let output = run(ideaforge(&ledger).args(["-q", "generate", "abcdefghi", "--offline"]));

    assert_eq!(output.status.code(), Some(2));
    assert!(!ledger.exists(), "rejected requests are not recorded");
}

#[test]
fn test_generate_over_limit_exits_3() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("usage.jsonl");
    let line = serde_json::json!({
        "created_at": Utc::now(),
        "user_id": "local",
        "action": "generation",
        "idea_summary": "A habit tracker app",
        "mode": "mvp"
    })
    .to_string();
    fs::write(&ledger, format!("{}\n", line).repeat(5)).unwrap();

    let output = run(ideaforge(&ledger).args([
        "-q",
        "generate",
        "A habit tracker app",
        "--offline",
        "--tier",
        "free",
    ]));
    assert_eq!(output.status.code(), Some(3));

    let output = run(ideaforge(&ledger).args([
        "-q",
        "generate",
        "A habit tracker app",
        "--offline",
        "--tier",
        "pro",
        "--format",
        "json",
    ]));
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_generate_from_request_file() {
    let dir = TempDir::new().unwrap();
    let request = dir.path().join("idea.yaml");
    fs::write(
        &request,
        "idea: real-time chat for teams\nmode: production\ntool: replit\n",
    )
    .unwrap();

    let output = run(ideaforge(&dir.path().join("usage.jsonl")).args([
        "-q",
        "generate",
        "--request",
        request.to_str().unwrap(),
        "--offline",
        "--format",
        "json",
    ]));

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["docs"]["api_spec"].is_string());
    assert!(value["detected_features"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("realtime")));
}

#[test]
fn test_invalid_request_file_exits_1() {
    let dir = TempDir::new().unwrap();

    let output = run(ideaforge(&dir.path().join("usage.jsonl")).args([
        "-q",
        "generate",
        "--request",
        dir.path().join("missing.yaml").to_str().unwrap(),
        "--offline",
    ]));

    assert_eq!(output.status.code(), Some(1));
}
