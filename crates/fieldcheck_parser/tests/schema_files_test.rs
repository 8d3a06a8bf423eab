//! Schema and request files parsed from disk and validated end to end.

use fieldcheck_core::Value;
use fieldcheck_parser::{ParserError, load_request, parse_file};
use fieldcheck_validator::RequestValidator;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

fn write_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

const ROUTE_YAML: &str = r#"
url:
  id:
    type: numeric
    required: true
query:
  tags:
    type: array
    arrayType: string
    values: [news, sport]
  disallowExtraFields: true
body:
  site:
    type: string
    required: true
    regex: "/^HTTPS?:/i"
  name:
    type: string
    required: true
    min: 3
    terminal: true
messages:
  site:
    regex: Site must be a web address
"#;

#[test]
fn test_yaml_schema_with_valid_request() {
    let schema = write_file(".yml", ROUTE_YAML);
    let request = write_file(
        ".json",
        r#"{
            "params": {"id": "42"},
            "query": {"tags": "news,sport"},
            "body": {"site": "https://example.org", "name": "Ada"}
        }"#,
    );

    let validation = parse_file(schema.path()).expect("parse schema");
    let mut request = load_request(request.path())
        .expect("load request")
        .with_validation(validation);

    let validator = RequestValidator::new();
    assert_eq!(validator.check(&mut request), Ok(()));
    assert_eq!(request.params.get("id"), Some(&Value::from(42)));
    assert_eq!(
        request.query.get("tags"),
        Some(&Value::from(vec!["news", "sport"]))
    );
}

#[test]
fn test_yaml_schema_with_failing_request() {
    let schema = write_file(".yaml", ROUTE_YAML);
    let request = write_file(
        ".json",
        r#"{
            "params": {"id": "x"},
            "query": {"tags": "news,cinema", "page": "2"},
            "body": {"site": "ftp://example.org", "name": "Al"}
        }"#,
    );

    let validation = parse_file(schema.path()).expect("parse schema");
    let mut request = load_request(request.path())
        .expect("load request")
        .with_validation(validation);

    let mut validator = RequestValidator::new();
    validator.disable_fail_on_first_error();
    let err = validator.check(&mut request).unwrap_err();

    assert_eq!(
        err.lines().collect::<Vec<_>>(),
        vec![
            "Url: Param id has invalid type (numeric)",
            "Query: Should not contain extra fields (page)",
            "Query: Param tags must belong to [news,sport]",
            "Body: Param name must have a minimum length of 3",
        ]
    );
}

#[test]
fn test_toml_schema_keeps_field_order() {
    let schema = write_file(
        ".toml",
        r#"
[body.zeta]
type = "string"
required = true

[body.alpha]
type = "string"
required = true

[messages.alpha]
required = "Alpha is missing"
"#,
    );

    let validation = parse_file(schema.path()).expect("parse schema");
    let body = validation.body.clone().expect("body section");
    let names: Vec<&str> = body.fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);

    let mut request = fieldcheck_core::Request::new().with_validation(validation);
    let mut validator = RequestValidator::new();
    validator.disable_fail_on_first_error();

    assert_eq!(
        validator.check(&mut request).unwrap_err().message,
        "Body: Param zeta is required\nAlpha is missing"
    );
}

#[test]
fn test_missing_file() {
    let result = parse_file(Path::new("does/not/exist.yml"));
    assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
}

#[test]
fn test_unsupported_request_extension() {
    let request = write_file(".txt", "params: {}");
    assert!(matches!(
        load_request(request.path()).unwrap_err(),
        ParserError::UnsupportedFormat(_)
    ));
}

#[test]
fn test_yaml_request_fixture() {
    let request = write_file(".yml", "url:\n  id: 7\nbody:\n  tags: [a, b]\n");
    let request = load_request(request.path()).expect("load request");

    assert_eq!(request.params.get("id"), Some(&Value::from(7)));
    assert_eq!(request.body.get("tags"), Some(&Value::from(vec!["a", "b"])));
    assert!(request.query.is_empty());
}

#[test]
fn test_regex_flags_in_messages() {
    let schema = write_file(
        ".yml",
        "query:\n  q:\n    type: string\n    regex: \"/^abc$/i\"\n",
    );
    let validation = parse_file(schema.path()).expect("parse schema");

    let mut request = fieldcheck_core::Request::new()
        .with_validation(validation)
        .with_query(fieldcheck_core::Params::from([("q", "xyz")]));

    assert_eq!(
        RequestValidator::new().check(&mut request).unwrap_err().message,
        "Query: Param q must match regex /^abc$/i"
    );
}
