// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! End-to-end tests for the spt binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const SHIP_YAML: &str = r#"title: Ship
stages:
  - title: Build
    stages:
      - title: Compile
      - title: Link
  - title: Test
    depends_on: [Build]
    parallel_stages:
      - title: Unit
      - title: Integration
        milestone: true
"#;

fn project_dir(yaml: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("project.yaml"), yaml).unwrap();
    dir
}

fn spt(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spt").unwrap();
    cmd.arg("-C").arg(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn diagram_reads_default_project_file() {
    let dir = project_dir(SHIP_YAML);

    spt(dir.path())
        .arg("diagram")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("flowchart BT\nProject([\"Ship\"])"))
        .stdout(predicate::str::contains("subgraph \"Build\""))
        .stdout(predicate::str::contains("    B2{{\"Integration\"}}"))
        .stdout(predicate::str::contains("Group_2_head --> Project"));
}

#[test]
fn diagram_writes_to_file() {
    let dir = project_dir(SHIP_YAML);

    spt(dir.path())
        .args(["diagram", "-o", "ship.mmd"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(dir.path().join("ship.mmd")).unwrap();
    assert!(written.starts_with("flowchart BT"));
}

#[test]
fn order_prints_work_order() {
    let dir = project_dir(SHIP_YAML);

    spt(dir.path()).arg("order").assert().success().stdout(
        "# Suggested order of work\n\
         \n\
         1. Compile\n\
         2. Link\n\
         3. Build (group)\n\
         4. Unit\n\
         5. Integration (milestone)\n\
         6. Test (group)\n\
         7. Ship (project)\n\
         \n\
         Total stages: 7\n",
    );
}

#[test]
fn order_incomplete_only_with_tree_completion() {
    let yaml = SHIP_YAML.replace("  - title: Test\n", "    complete: true\n  - title: Test\n");
    let dir = project_dir(&yaml);

    spt(dir.path())
        .args(["order", "-c", "-i"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Unit\n"))
        .stdout(predicate::str::contains("Compile").not())
        .stdout(predicate::str::contains("Total stages: 4"));
}

#[test]
fn order_as_json() {
    let dir = project_dir(SHIP_YAML);

    let output = spt(dir.path())
        .args(["order", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total"], 7);
    assert_eq!(json["entries"][0]["title"], "Compile");
    assert_eq!(json["entries"][4]["milestone"], true);
}

#[test]
fn update_persists_implied_completion() {
    let yaml = SHIP_YAML.replace("      - title: Link\n", "      - title: Link\n        complete: true\n");
    let dir = project_dir(&yaml);

    spt(dir.path())
        .args(["update", "--no-format", "-o", "updated.yaml"])
        .assert()
        .success();

    let updated = spt::Stage::from_file(&dir.path().join("updated.yaml")).unwrap();
    let build = &updated.stages[0];
    assert!(build.stages[0].complete, "Compile comes before Link");
    assert!(build.stages[1].complete);
    assert!(!build.complete);
    assert!(!updated.complete);
}

#[test]
fn update_reports_formatter_failure() {
    let dir = project_dir(SHIP_YAML);

    spt(dir.path())
        .args(["update", "--formatter", "/definitely/not/prettier"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prettier"));
}

#[test]
fn validate_accepts_project_with_warnings() {
    let dir = project_dir(SHIP_YAML);

    spt(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("redundant"))
        .stdout(predicate::str::contains("Project is valid but has warnings."));
}

#[test]
fn validate_accepts_clean_project() {
    let dir = project_dir(&SHIP_YAML.replace("    depends_on: [Build]\n", ""));

    spt(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project is valid!"));
}

#[test]
fn validate_lists_every_error() {
    let yaml = r#"title: P
stages:
  - title: A
    depends_on: [Nope]
  - title: A
"#;
    let dir = project_dir(yaml);

    spt(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown stage 'Nope'"))
        .stdout(predicate::str::contains("'A' is used more than once"));
}

#[test]
fn cycle_is_rejected() {
    let yaml = r#"title: P
parallel_stages:
  - title: A
    depends_on: [B]
  - title: B
    depends_on: [A]
"#;
    let dir = project_dir(yaml);

    spt(dir.path())
        .arg("diagram")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Circular dependency"));
}

#[test]
fn missing_project_file() {
    let dir = tempfile::tempdir().unwrap();

    spt(dir.path())
        .args(["order", "plan.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project file not found"));
}
