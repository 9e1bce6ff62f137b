//! Integration tests for the sapp binary.
//!
//! These tests exercise the full CLI: global option parsing, context
//! construction, and dispatch to each registered command.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Get a command for running sapp inside `dir`, isolated from the caller's
/// environment.
fn sapp(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sapp").unwrap();
    cmd.current_dir(dir)
        .env_remove("SAPP_CONFIG")
        .env_remove("SAPP_LOG");
    cmd
}

fn write_output(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

const OUTPUT: &str = r#"{"kind": "issue", "callable": "app.views.login", "code": 5001}
{"kind": "issue", "callable": "app.views.logout", "code": 5002}
{"kind": "model", "callable": "app.db.query"}
"#;

// =============================================================================
// Help and version
// =============================================================================

#[test]
fn help_lists_every_command() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("--database-engine"));
}

#[test]
fn version_flag_works() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sapp"));
}

#[test]
fn no_arguments_shows_usage() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// =============================================================================
// Global option validation
// =============================================================================

#[test]
fn invalid_engine_rejected_before_any_side_effect() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .args(["--database-engine", "postgres", "info"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("postgres"))
        .stderr(predicate::str::contains("sqlite"))
        .stderr(predicate::str::contains("memory"));

    assert!(!temp.path().join("sapp.db").exists());
}

#[test]
fn unknown_command_rejected_before_any_side_effect() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .arg("explode")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("explode"));

    assert!(!temp.path().join("sapp.db").exists());
}

#[test]
fn unwritable_database_location_fails() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("no-such-dir").join("sapp.db");
    sapp(temp.path())
        .args(["--dbname", db.to_str().unwrap(), "info"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no-such-dir"));
}

// =============================================================================
// Context-bound commands
// =============================================================================

#[test]
fn info_reports_memory_context() {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().to_str().unwrap();
    sapp(temp.path())
        .args([
            "--database-engine",
            "memory",
            "--database-name",
            "test",
            "--repository",
            repo,
            "info",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("repository: {}", repo)))
        .stdout(predicate::str::contains("engine:     memory"))
        .stdout(predicate::str::contains("database:   test"))
        .stdout(predicate::str::contains("parser:     json-lines"))
        .stdout(predicate::str::contains("assertions: on"));

    assert!(!temp.path().join("test").exists());
}

#[test]
fn info_json_output() {
    let temp = TempDir::new().unwrap();
    let output = sapp(temp.path())
        .args(["--database", "memory", "info", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["engine"], "memory");
    assert_eq!(value["parser"], "json-lines");
    assert_eq!(value["records"], 0);
}

#[test]
fn sqlite_is_the_default_engine() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("engine:     sqlite"));

    assert!(temp.path().join("sapp.db").exists());
}

#[test]
fn analyze_then_query_across_runs() {
    let temp = TempDir::new().unwrap();
    let input = write_output(temp.path(), "taint-output.json", OUTPUT);

    sapp(temp.path())
        .args(["analyze", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored 3 record(s)"));

    sapp(temp.path())
        .args([
            "query",
            "SELECT kind, COUNT(*) AS n FROM trace_records GROUP BY kind ORDER BY kind",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("kind\tn\nissue\t2\nmodel\t1\n"));
}

#[test]
fn memory_engine_does_not_persist() {
    let temp = TempDir::new().unwrap();
    let input = write_output(temp.path(), "taint-output.json", OUTPUT);

    sapp(temp.path())
        .args(["--database-engine", "memory", "analyze", &input])
        .assert()
        .success();

    sapp(temp.path())
        .args(["--database-engine", "memory", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("records:    0"));
}

#[test]
fn analyze_reports_bad_input() {
    let temp = TempDir::new().unwrap();
    let input = write_output(temp.path(), "bad.json", "{\"callable\": \"x\"}\n");

    sapp(temp.path())
        .args(["--database", "memory", "analyze", &input])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bad.json"))
        .stderr(predicate::str::contains("kind"));
}

#[test]
fn analyze_requires_existing_repository() {
    let temp = TempDir::new().unwrap();
    let input = write_output(temp.path(), "taint-output.json", OUTPUT);

    sapp(temp.path())
        .args(["--database", "memory", "-r", "/definitely/not/here", "analyze", &input])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--repository"));
}

#[test]
fn missing_repository_rejected_before_any_side_effect() {
    let temp = TempDir::new().unwrap();

    sapp(temp.path())
        .args(["-r", "/definitely/not/here", "info"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--repository"))
        .stderr(predicate::str::contains("/definitely/not/here"));

    sapp(temp.path())
        .args(["--database", "memory", "-r", "/definitely/not/here", "query", "SELECT 1"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());

    assert!(!temp.path().join("sapp.db").exists());
}

#[test]
fn config_file_supplies_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".sapp.toml"),
        "database_engine = \"memory\"\ndatabase_name = \"from-config\"\n",
    )
    .unwrap();

    sapp(temp.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("engine:     memory"))
        .stdout(predicate::str::contains("database:   from-config"));

    sapp(temp.path())
        .args(["--database-engine", "sqlite", "--dbname", "flag.db", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("engine:     sqlite"));
    assert!(temp.path().join("flag.db").exists());
}

#[test]
fn invalid_config_file_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".sapp.toml"), "database_engine = \"postgres\"\n").unwrap();

    sapp(temp.path())
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("postgres"));

    assert!(!temp.path().join("sapp.db").exists());
}

#[test]
fn debug_flag_logs_context() {
    let temp = TempDir::new().unwrap();
    sapp(temp.path())
        .args(["--debug", "--database", "memory", "--dbname", "test", "info"])
        .assert()
        .success()
        .stderr(predicate::str::contains("built context"))
        .stderr(predicate::str::contains("json-lines"));
}

// =============================================================================
// lint
// =============================================================================

#[test]
fn lint_passes_clean_files_without_database() {
    let temp = TempDir::new().unwrap();
    let input = write_output(temp.path(), "taint-output.json", OUTPUT);

    sapp(temp.path())
        .args(["lint", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found in 1 file(s)"));

    assert!(!temp.path().join("sapp.db").exists());
}

#[test]
fn lint_reports_findings_and_fails() {
    let temp = TempDir::new().unwrap();
    let input = write_output(
        temp.path(),
        "bad.json",
        "{\"kind\": \"issue\"}\n{oops\n{\"callable\": \"x\"}\n",
    );

    sapp(temp.path())
        .args(["lint", &input])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bad.json:2: invalid JSON"))
        .stdout(predicate::str::contains("bad.json:3: missing required field 'kind'"))
        .stderr(predicate::str::contains("2 problem(s) found"));
}
