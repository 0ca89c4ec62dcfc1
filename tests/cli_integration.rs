//! Integration tests for the `tre` CLI.
//!
//! Each test creates a temp store, runs `tre` as a subprocess, and
//! verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `tre` binary.
fn tre_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tre");
    path
}

/// Create a minimal test store in the given directory.
fn create_test_store(root: &Path) {
    let dir = root.join(".trellis");
    fs::create_dir_all(dir.join("templates")).unwrap();

    fs::write(
        dir.join("config.toml"),
        r#"[project]
default = "demo"

[agent]
actor = "tester"

[stale]
after_hours = 24
"#,
    )
    .unwrap();

    fs::write(
        dir.join("items.jsonl"),
        concat!(
            r#"{"type":"item","id":"ts-1","project":"demo","kind":"task","title":"Parse config file","status":"open","priority":2,"labels":["core"],"created_at":"2025-06-01T00:00:00Z","updated_at":"2025-06-01T00:00:00Z"}"#,
            "\n",
            r#"{"type":"item","id":"ts-2","project":"demo","kind":"task","title":"Wire the parser in","status":"open","priority":3,"created_at":"2025-06-02T00:00:00Z","updated_at":"2025-06-02T00:00:00Z"}"#,
            "\n",
            r#"{"type":"item","id":"ts-3","project":"demo","kind":"task","title":"Polish help text","status":"done","priority":4,"created_at":"2025-06-03T00:00:00Z","updated_at":"2025-06-03T00:00:00Z"}"#,
            "\n",
            r#"{"type":"item","id":"ep-1","project":"demo","kind":"epic","title":"v2 release","status":"in_progress","priority":1,"worktree":{"branch":"release-v2","base":"main"},"created_at":"2025-05-01T00:00:00Z","updated_at":"2025-06-10T00:00:00Z"}"#,
            "\n",
            r#"{"type":"item","id":"ts-4","project":"demo","kind":"task","title":"Draft release notes","status":"in_progress","priority":3,"parent":"ep-1","created_at":"2025-05-02T00:00:00Z","updated_at":"2025-05-02T00:00:00Z"}"#,
            "\n",
            r#"{"type":"dep","blocker":"ts-1","blocked":"ts-2"}"#,
            "\n",
            r#"{"type":"log","item":"ts-1","at":"2025-06-01T01:00:00Z","actor":"alice","text":"filed from triage"}"#,
            "\n",
        ),
    )
    .unwrap();

    fs::write(
        dir.join("templates/bugfix.toml"),
        r#"id = "bugfix"
name = "Bug fix"
description = "A bug report with repro steps"
body = """
## Problem

{{.problem}}
"""

[[variables]]
name = "problem"
prompt = "What is broken?"
"#,
    )
    .unwrap();
}

/// Run `tre` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tre(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tre_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run tre");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tre` expecting success, return stdout.
fn run_tre_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tre(dir, args);
    if !success {
        panic!(
            "tre {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_default() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["list"]);
    assert!(out.contains("ts-1"));
    assert!(out.contains("Parse config file"));
    assert!(out.contains("ep-1"));
    // p1 epic sorts above the p2 task
    let pos_ep = out.find("ep-1").unwrap();
    let pos_ts = out.find("ts-1").unwrap();
    assert!(pos_ep < pos_ts);
}

#[test]
fn test_list_status_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["list", "--status", "open"]);
    assert!(out.contains("ts-1"));
    assert!(out.contains("ts-2"));
    assert!(!out.contains("ts-3")); // done
    assert!(!out.contains("ep-1")); // in_progress
}

#[test]
fn test_list_label_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["list", "--label", "core"]);
    assert!(out.contains("ts-1"));
    assert!(!out.contains("ts-2"));
}

#[test]
fn test_list_search() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["list", "--search", "parser"]);
    assert!(out.contains("ts-2"));
    assert!(!out.contains("ts-1"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 5);
    let ts1 = arr.iter().find(|v| v["id"] == "ts-1").unwrap();
    assert_eq!(ts1["status"], "open");
    assert_eq!(ts1["priority"], 2);
    assert_eq!(ts1["labels"][0], "core");
}

#[test]
fn test_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["show", "ts-2"]);
    assert!(out.contains("Wire the parser in"));
    assert!(out.contains("depends on:"));
    assert!(out.contains("ts-1"));
}

#[test]
fn test_show_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["show", "ts-2", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], "ts-2");
    assert_eq!(parsed["depends_on"][0]["id"], "ts-1");

    // ts-1 blocks ts-2, so the reverse direction shows under "blocks"
    let out = run_tre_ok(tmp.path(), &["show", "ts-1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["blocks"][0]["id"], "ts-2");
    assert_eq!(parsed["log"][0]["actor"], "alice");
}

#[test]
fn test_show_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) = run_tre(tmp.path(), &["show", "ts-999"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_stale() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    // Fixture dates are fixed, so both in_progress items are long idle
    let out = run_tre_ok(tmp.path(), &["stale"]);
    assert!(out.contains("ts-4"));
    assert!(out.contains("ep-1"));
    assert!(out.contains("idle"));
    assert!(!out.contains("ts-1")); // open, not in_progress
}

#[test]
fn test_stale_huge_threshold_is_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["stale", "--hours", "876000"]);
    assert!(!out.contains("ts-4"));
}

#[test]
fn test_stale_project_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["stale", "--project", "other"]);
    assert!(!out.contains("ts-4"));
}

#[test]
fn test_templates_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["templates"]);
    assert!(out.contains("Bug fix"));
    assert!(out.contains("(bugfix)"));
}

#[test]
fn test_templates_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["templates", "show", "bugfix"]);
    assert!(out.contains("What is broken?"));
    assert!(out.contains("{{.problem}}"));
}

#[test]
fn test_templates_show_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["templates", "show", "bugfix", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], "bugfix");
    assert!(parsed["body"].as_str().unwrap().contains("{{.problem}}"));
    assert_eq!(parsed["variables"][0]["name"], "problem");
}

#[test]
fn test_config_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["config"]);
    assert!(out.contains("project.default = \"demo\""));
    assert!(out.contains("stale.after_hours = 24"));
}

#[test]
fn test_config_get() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["config", "get", "agent.actor"]);
    assert_eq!(out.trim(), "tester");
}

#[test]
fn test_config_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["config", "set", "stale.after_hours", "72"]);
    let written = fs::read_to_string(tmp.path().join(".trellis/config.toml")).unwrap();
    assert!(written.contains("after_hours = 72"));
}

#[test]
fn test_config_set_invalid() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) =
        run_tre(tmp.path(), &["config", "set", "stale.after_hours", "soon"]);
    assert!(!success);
    assert!(stderr.contains("must be a number"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["add", "task", "New task from CLI"]);
    assert!(out.contains("ts-5")); // next ID after ts-4

    let items = fs::read_to_string(tmp.path().join(".trellis/items.jsonl")).unwrap();
    assert!(items.contains("New task from CLI"));
}

#[test]
fn test_add_epic_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(
        tmp.path(),
        &["add", "epic", "Side quest", "--project", "side", "--json"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], "ep-2");
    assert_eq!(parsed["kind"], "epic");
    assert_eq!(parsed["project"], "side");
}

#[test]
fn test_add_with_parent_and_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(
        tmp.path(),
        &[
            "add", "task", "Child task", "--parent", "ep-1", "--priority", "1", "--json",
        ],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["parent"], "ep-1");
    assert_eq!(parsed["priority"], 1);
}

#[test]
fn test_add_invalid_kind() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) = run_tre(tmp.path(), &["add", "blob", "Nope"]);
    assert!(!success);
    assert!(stderr.contains("unknown kind"));
}

#[test]
fn test_add_parent_must_be_epic() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) =
        run_tre(tmp.path(), &["add", "task", "Nope", "--parent", "ts-1"]);
    assert!(!success);
    assert!(stderr.contains("not an epic"));
}

#[test]
fn test_status_change() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let out = run_tre_ok(tmp.path(), &["status", "ts-1", "in_progress"]);
    assert!(out.contains("ts-1"));
    assert!(out.contains("in_progress"));

    // The change lands in the file with a history line naming the actor
    let show = run_tre_ok(tmp.path(), &["show", "ts-1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&show).unwrap();
    assert_eq!(parsed["status"], "in_progress");
    let log = parsed["log"].as_array().unwrap();
    let last = log.last().unwrap();
    assert_eq!(last["actor"], "tester");
    assert!(last["text"].as_str().unwrap().contains("open"));
}

#[test]
fn test_status_with_reason() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(
        tmp.path(),
        &["status", "ts-2", "blocked", "--reason", "waiting on API keys"],
    );
    let show = run_tre_ok(tmp.path(), &["show", "ts-2"]);
    assert!(show.contains("waiting on API keys"));
}

#[test]
fn test_status_invalid() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) = run_tre(tmp.path(), &["status", "ts-1", "paused"]);
    assert!(!success);
    assert!(stderr.contains("unknown status"));
}

#[test]
fn test_log() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["log", "ts-1", "repro narrowed to the lexer"]);
    let show = run_tre_ok(tmp.path(), &["show", "ts-1"]);
    assert!(show.contains("repro narrowed to the lexer"));
    assert!(show.contains("tester"));
}

#[test]
fn test_dep_add_remove() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["dep", "ts-3", "add", "ts-1"]);
    let show = run_tre_ok(tmp.path(), &["show", "ts-3"]);
    assert!(show.contains("depends on:"));
    assert!(show.contains("ts-1"));

    run_tre_ok(tmp.path(), &["dep", "ts-3", "rm", "ts-1"]);
    let show = run_tre_ok(tmp.path(), &["show", "ts-3"]);
    assert!(!show.contains("depends on:"));
}

#[test]
fn test_dep_cycle_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    // ts-2 already depends on ts-1; the reverse edge would loop
    let (_stdout, stderr, success) = run_tre(tmp.path(), &["dep", "ts-1", "add", "ts-2"]);
    assert!(!success);
    assert!(stderr.contains("cycle"));
}

#[test]
fn test_dep_unknown_action() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) = run_tre(tmp.path(), &["dep", "ts-1", "toggle", "ts-3"]);
    assert!(!success);
    assert!(stderr.contains("unknown action"));
}

#[test]
fn test_label_add_remove() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["label", "ts-2", "add", "urgent"]);
    let out = run_tre_ok(tmp.path(), &["list", "--label", "urgent"]);
    assert!(out.contains("ts-2"));

    run_tre_ok(tmp.path(), &["label", "ts-2", "rm", "urgent"]);
    let out = run_tre_ok(tmp.path(), &["list", "--label", "urgent"]);
    assert!(!out.contains("ts-2"));
}

#[test]
fn test_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["priority", "ts-2", "1"]);
    let show = run_tre_ok(tmp.path(), &["show", "ts-2", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&show).unwrap();
    assert_eq!(parsed["priority"], 1);
}

#[test]
fn test_priority_out_of_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) = run_tre(tmp.path(), &["priority", "ts-2", "9"]);
    assert!(!success);
    assert!(stderr.contains("priority must be"));
}

#[test]
fn test_describe() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(
        tmp.path(),
        &["describe", "ts-1", "Use serde for the config surface."],
    );
    let show = run_tre_ok(tmp.path(), &["show", "ts-1"]);
    assert!(show.contains("Use serde for the config surface."));
}

#[test]
fn test_delete() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["delete", "ts-3"]);
    let out = run_tre_ok(tmp.path(), &["list"]);
    assert!(!out.contains("ts-3"));
}

#[test]
fn test_delete_epic_with_children_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    // ts-4 still points at ep-1
    let (_stdout, stderr, success) = run_tre(tmp.path(), &["delete", "ep-1"]);
    assert!(!success);
    assert!(stderr.contains("child"));
}

// ---------------------------------------------------------------------------
// Error handling tests
// ---------------------------------------------------------------------------

#[test]
fn test_not_a_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    // No .trellis/ anywhere under the temp root
    let (_stdout, stderr, success) = run_tre(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("not a trellis project"));
}

#[test]
fn test_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    // Run from an unrelated cwd, pointing -C at the store root
    let elsewhere = tempfile::TempDir::new().unwrap();
    let out = run_tre_ok(
        elsewhere.path(),
        &["-C", tmp.path().to_str().unwrap(), "list"],
    );
    assert!(out.contains("ts-1"));
}

#[test]
fn test_help() {
    let out = run_tre_ok(Path::new("."), &["--help"]);
    assert!(out.contains("trellis"));
    assert!(out.contains("list"));
    assert!(out.contains("add"));
}

// ---------------------------------------------------------------------------
// Combined workflow tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_then_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let add_out = run_tre_ok(tmp.path(), &["add", "task", "Workflow test task"]);
    // One-line summary: [icon] id p<n> title
    let id = add_out.split_whitespace().nth(1).unwrap();

    let show_out = run_tre_ok(tmp.path(), &["show", id]);
    assert!(show_out.contains("Workflow test task"));
}

#[test]
fn test_add_then_status_then_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let add_out = run_tre_ok(tmp.path(), &["add", "task", "Lifecycle check"]);
    let id = add_out.split_whitespace().nth(1).unwrap().to_string();

    run_tre_ok(tmp.path(), &["status", &id, "done"]);
    let show_out = run_tre_ok(tmp.path(), &["show", &id, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&show_out).unwrap();
    assert_eq!(parsed["status"], "done");
}

// ---------------------------------------------------------------------------
// Init tests
// ---------------------------------------------------------------------------

#[test]
fn test_init() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_tre_ok(tmp.path(), &["init", "--name", "fresh"]);
    assert!(out.contains("Initialized"));

    let config = fs::read_to_string(tmp.path().join(".trellis/config.toml")).unwrap();
    assert!(config.contains("default = \"fresh\""));
    assert!(tmp.path().join(".trellis/items.jsonl").exists());
    assert!(tmp.path().join(".trellis/templates/bugfix.toml").exists());
}

#[test]
fn test_init_refuses_existing() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    let (_stdout, stderr, success) = run_tre(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_init_force_recreates() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_store(tmp.path());

    run_tre_ok(tmp.path(), &["init", "--force", "--name", "clean"]);

    let config = fs::read_to_string(tmp.path().join(".trellis/config.toml")).unwrap();
    assert!(config.contains("default = \"clean\""));
    // The old fixture items are gone
    let items = fs::read_to_string(tmp.path().join(".trellis/items.jsonl")).unwrap();
    assert!(!items.contains("ts-1"));
}
