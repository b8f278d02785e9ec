//! Tests for report generation

use super::common::{TestContext, OFFLINE_PROJECTS};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_generate_writes_both_reports() {
    let ctx = TestContext::new();
    let input = ctx.write_input(OFFLINE_PROJECTS);

    ctx.osslist()
        .arg(&input)
        .arg("--skip-validation")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 4 project(s)"));

    let csv = fs::read_to_string(ctx.path().join("table.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Category;Project;Repository;Description"));
    assert!(lines[1].starts_with("Apps;app;"));
    assert!(lines[2].starts_with("Tools;Tool2;"));
    assert!(lines[3].starts_with("Tools;tool10;"));
    assert!(lines[4].starts_with("Other;misc;"));
    assert!(lines[4].contains("Miscellaneous, odds and ends"));
    assert!(lines[3].contains(";MIT;Rust, C;cli;"));
    assert!(lines[2].ends_with(";2019-04-01"));

    let html = fs::read_to_string(ctx.path().join("table.html")).unwrap();
    assert!(html.contains("An &lt;app&gt;"));
    assert!(html.contains("<a href=\"https://tool2.example.invalid\">"));
}

#[test]
fn test_output_dir() {
    let ctx = TestContext::new();
    let input = ctx.write_input(OFFLINE_PROJECTS);

    ctx.osslist()
        .arg(&input)
        .args(["--skip-validation", "--output-dir", "site", "--workers", "1"])
        .assert()
        .success();

    assert!(ctx.path().join("site/table.html").is_file());
    assert!(ctx.path().join("site/table.csv").is_file());
}

#[test]
fn test_duplicate_names_fail_after_reconciliation() {
    let ctx = TestContext::new();
    let input = ctx.write_input(
        r#"
A:
  - {name: dup, repository: "https://code.example.invalid/a/a", description: d}
B:
  - {name: dup, repository: "https://code.example.invalid/b/b", description: d}
"#,
    );

    ctx.osslist()
        .arg(&input)
        .arg("--skip-validation")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Duplicate project names: dup"));

    assert!(!ctx.path().join("table.csv").exists());
}

#[test]
fn test_missing_description_is_fatal() {
    let ctx = TestContext::new();
    let input = ctx.write_input(
        "Tools:\n  - name: a\n    repository: https://code.example.invalid/a/a\n",
    );

    ctx.osslist()
        .arg(&input)
        .arg("--skip-validation")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tools[0]: project needs a description"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_malformed_yaml_is_fatal() {
    let ctx = TestContext::new();
    let input = ctx.write_input("Tools: [\n");

    ctx.osslist()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML"));
}

#[test]
fn test_missing_input_file() {
    let ctx = TestContext::new();

    ctx.osslist()
        .arg(ctx.path().join("nope.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
