//! E2E CLI lifecycle tests: sample seeding, project CRUD, and the JSON
//! output contract.
//!
//! Each test runs `pk` as a subprocess against an isolated temp data
//! directory in local mode.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the pk binary, with its snapshot in `dir`.
fn pk_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pk"));
    cmd.current_dir(dir);
    cmd.env("PLANK_DATA_DIR", dir.join("data"));
    // Keep host config and env from leaking into the test process.
    cmd.env_remove("PLANK_API_URL");
    cmd.env_remove("FORMAT");
    // Suppress tracing output that goes to stderr.
    cmd.env("PLANK_LOG", "error");
    cmd.arg("--local");
    cmd
}

/// Run `pk project list --json` and parse the array.
fn list_projects(dir: &Path) -> Vec<Value> {
    let output = pk_cmd(dir)
        .args(["project", "list", "--json"])
        .output()
        .expect("list should not crash");
    assert!(
        output.status.success(),
        "list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value =
        serde_json::from_slice(&output.stdout).expect("list --json should produce valid JSON");
    json.as_array().expect("array output").clone()
}

/// Create a project via CLI, return its id.
fn create_project(dir: &Path, name: &str) -> String {
    let output = pk_cmd(dir)
        .args(["project", "add", name, "--json"])
        .output()
        .expect("add should not crash");
    assert!(
        output.status.success(),
        "add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json["id"]
        .as_str()
        .expect("add output should have 'id' field")
        .to_string()
}

// ---------------------------------------------------------------------------
// Sample seed
// ---------------------------------------------------------------------------

#[test]
fn first_run_seeds_two_sample_projects() {
    let dir = TempDir::new().unwrap();
    let projects = list_projects(dir.path());
    assert_eq!(projects.len(), 2);

    let names: Vec<&str> = projects
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert!(names.contains(&"Website relaunch"));
    assert!(names.contains(&"Mobile app"));
}

#[test]
fn seeding_happens_only_once() {
    let dir = TempDir::new().unwrap();
    let _ = list_projects(dir.path());

    let id = create_project(dir.path(), "Third project");
    pk_cmd(dir.path())
        .args(["project", "rm", id.as_str()])
        .assert()
        .success();

    // Still the two sample projects, not re-seeded around the delete.
    assert_eq!(list_projects(dir.path()).len(), 2);
}

// ---------------------------------------------------------------------------
// Project lifecycle
// ---------------------------------------------------------------------------

#[test]
fn project_add_update_rm_lifecycle() {
    let dir = TempDir::new().unwrap();
    let id = create_project(dir.path(), "Q2 planning");

    // Visible in the list.
    assert_eq!(list_projects(dir.path()).len(), 3);

    // Update the name, check via show --json.
    pk_cmd(dir.path())
        .args(["project", "update", id.as_str(), "--name", "Q2 roadmap", "--json"])
        .assert()
        .success();

    let output = pk_cmd(dir.path())
        .args(["project", "show", id.as_str(), "--json"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "Q2 roadmap");
    assert!(json["createdAt"].is_string());

    // Remove and confirm it is gone.
    pk_cmd(dir.path())
        .args(["project", "rm", id.as_str()])
        .assert()
        .success();
    assert_eq!(list_projects(dir.path()).len(), 2);
}

#[test]
fn project_show_unknown_id_fails_with_code() {
    let dir = TempDir::new().unwrap();
    let _ = list_projects(dir.path());

    let output = pk_cmd(dir.path())
        .args(["project", "show", "p-ghost", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E2001"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("p-ghost"));
}

#[test]
fn blank_project_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = pk_cmd(dir.path())
        .args(["project", "add", "   ", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("E2005"));
}

// ---------------------------------------------------------------------------
// JSON contract
// ---------------------------------------------------------------------------

#[test]
fn created_project_json_has_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let output = pk_cmd(dir.path())
        .args([
            "project",
            "add",
            "Launch",
            "--description",
            "big one",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["id"].as_str().is_some());
    assert_eq!(json["name"], "Launch");
    assert_eq!(json["description"], "big one");
    assert!(json["createdAt"].is_string());
}

#[test]
fn rm_reports_structured_success() {
    let dir = TempDir::new().unwrap();
    let id = create_project(dir.path(), "Temp");

    let output = pk_cmd(dir.path())
        .args(["project", "rm", id.as_str(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ok"], true);
}
