use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

#[allow(deprecated)]
fn fieldcheck() -> Command {
    Command::cargo_bin("fieldcheck").expect("Failed to find fieldcheck binary")
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_yaml_schema() {
    fieldcheck()
        .arg("check")
        .arg(fixture_path("route.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema is valid"))
        .stdout(predicate::str::contains("Url:"))
        .stdout(predicate::str::contains("numeric, required"))
        .stdout(predicate::str::contains("skipped (no usable type)"))
        .stdout(predicate::str::contains("rejected"))
        .stdout(predicate::str::contains("Custom messages: 1"));
}

#[test]
fn test_check_toml_schema_orders_terminal_fields() {
    fieldcheck()
        .arg("check")
        .arg(fixture_path("route.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("string, required, terminal"))
        .stdout(predicate::str::contains("Evaluation order: name, age"));
}

#[test]
fn test_check_json_output() {
    let output = fieldcheck()
        .arg("check")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("route.yml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value =
        serde_json::from_slice(&output).expect("Output should be valid JSON");
    assert_eq!(summary["valid"], true);
    assert_eq!(summary["sections"][0]["section"], "url");
    assert_eq!(summary["sections"][2]["skipped"], 1);
    assert_eq!(summary["sections"][1]["disallowExtraFields"], true);
}

#[test]
fn test_check_invalid_schema() {
    fieldcheck()
        .arg("check")
        .arg(fixture_path("invalid_route.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("must be a mapping"));
}

#[test]
fn test_check_invalid_regex() {
    fieldcheck()
        .arg("check")
        .arg(fixture_path("bad_regex.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid regex"));
}

#[test]
fn test_check_missing_file() {
    fieldcheck()
        .arg("check")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_passing_request() {
    fieldcheck()
        .arg("validate")
        .arg(fixture_path("route.yml"))
        .arg(fixture_path("request_ok.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"))
        .stdout(predicate::str::contains("Sections validated: 3"));
}

#[test]
fn test_validate_failing_request_exits_non_zero() {
    fieldcheck()
        .arg("validate")
        .arg(fixture_path("route.yml"))
        .arg(fixture_path("request_bad.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains(
            "Url: Param id has invalid type (numeric)",
        ));
}

#[test]
fn test_validate_fail_slow_reports_everything() {
    fieldcheck()
        .arg("validate")
        .arg("--fail-slow")
        .arg(fixture_path("route.yml"))
        .arg(fixture_path("request_bad.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Query: Should not contain extra fields (sort)",
        ))
        .stdout(predicate::str::contains(
            "Query: Param tags must belong to [news,sport]",
        ))
        .stdout(predicate::str::contains(
            "Body: Param name must have a minimum length of 3",
        ))
        .stdout(predicate::str::contains("Email address is malformed"));
}

#[test]
fn test_validate_json_output_shows_coerced_inputs() {
    let output = fieldcheck()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("route.yml"))
        .arg(fixture_path("request_ok.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value =
        serde_json::from_slice(&output).expect("Output should be valid JSON");
    assert_eq!(report["passed"], true);
    assert_eq!(report["inputs"]["params"]["id"], 42);
    assert_eq!(report["inputs"]["query"]["tags"][1], "sport");
    assert_eq!(report["summary"]["fields_skipped"], 1);
}

#[test]
fn test_validate_json_errors() {
    let output = fieldcheck()
        .arg("validate")
        .arg("--fail-slow")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("route.yml"))
        .arg(fixture_path("request_bad.json"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value =
        serde_json::from_slice(&output).expect("Output should be valid JSON");
    assert_eq!(report["passed"], false);
    assert_eq!(report["errors"][0]["section"], "url");
    assert_eq!(report["errors"][0]["constraint"], "type");
    assert_eq!(report["errors"][1]["field"], "disallowExtraFields");
}

#[test]
fn test_validate_request_from_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let request_path = temp_dir.path().join("request.yml");
    fs::write(&request_path, "url:\n  id: 7\nbody:\n  name: Zed\n  age: 200\n").unwrap();

    fieldcheck()
        .arg("validate")
        .arg(fixture_path("route.toml"))
        .arg(&request_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Body: Param age must have a maximum length of 150",
        ));
}

#[test]
fn test_validate_missing_request() {
    fieldcheck()
        .arg("validate")
        .arg(fixture_path("route.yml"))
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load request file"));
}

// ============================================================================
// general CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    fieldcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_cli_version() {
    fieldcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_validate_help() {
    fieldcheck()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--fail-slow"))
        .stdout(predicate::str::contains("--format"));
}
