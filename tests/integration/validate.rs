//! Tests for URL validation and `--validate-only`

use super::common::TestContext;
use predicates::prelude::*;

const MALFORMED: &str = r#"
Tools:
  - name: a
    repository: not-a-url
    description: d
  - name: b
    repository: ftp://files.example.invalid/b
    description: d
"#;

#[test]
fn test_validate_only_reports_and_succeeds() {
    let ctx = TestContext::new();
    let input = ctx.write_input(MALFORMED);

    ctx.osslist()
        .arg(&input)
        .arg("--validate-only")
        .assert()
        .success()
        .stderr(predicate::str::contains("2 invalid URL(s)"))
        .stderr(predicate::str::contains("not-a-url"))
        .stdout(predicate::str::contains("Validated 2 project(s)"));

    assert!(!ctx.path().join("table.html").exists());
}

#[test]
fn test_abort_strategy_fails() {
    let ctx = TestContext::new();
    let input = ctx.write_input(MALFORMED);

    ctx.osslist()
        .arg(&input)
        .args(["--validate-only", "--invalid-url", "abort"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ftp://files.example.invalid/b"));
}

#[test]
fn test_ignore_strategy_is_silent() {
    let ctx = TestContext::new();
    let input = ctx.write_input(MALFORMED);

    ctx.osslist()
        .arg(&input)
        .args(["--validate-only", "-i", "ignore"])
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid URL").not());
}

#[test]
fn test_validate_only_detects_duplicates() {
    let ctx = TestContext::new();
    let input = ctx.write_input(
        r#"
A:
  - {name: same, repository: not-a-url, description: d}
B:
  - {name: same, repository: also-not-a-url, description: d}
"#,
    );

    ctx.osslist()
        .arg(&input)
        .args(["--validate-only", "-i", "ignore"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate project names: same"));
}

#[test]
fn test_validate_only_conflicts_with_skip_validation() {
    let ctx = TestContext::new();
    let input = ctx.write_input(MALFORMED);

    ctx.osslist()
        .arg(&input)
        .args(["--validate-only", "--skip-validation"])
        .assert()
        .failure();
}
