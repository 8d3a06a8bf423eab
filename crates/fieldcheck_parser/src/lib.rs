//! Parser for fieldcheck validation schemas (YAML/TOML/JSON formats).
//!
//! This module reads route validation schemas and request fixtures from
//! files into the core `RouteValidation` and `Request` types.
//!
//! # Example
//!
//! ```rust
//! use fieldcheck_parser::parse_yaml;
//!
//! let yaml = r#"
//! url:
//!   id:
//!     type: numeric
//!     required: true
//! query:
//!   q:
//!     type: string
//!     regex: "/^[a-z]+$/i"
//!   disallowExtraFields: true
//! messages:
//!   id:
//!     required: An id is needed
//! "#;
//!
//! let validation = parse_yaml(yaml).expect("Failed to parse schema");
//! assert!(validation.query.unwrap().disallow_extra_fields);
//! ```

mod document;

pub use document::{RequestDocument, SchemaDocument, compile_pattern};

use fieldcheck_core::{Request, RouteValidation};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during schema parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// A `regex` property does not compile
    #[error("Invalid regex {pattern} for field '{field}': {source}")]
    InvalidRegex {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A section is not a mapping
    #[error("Section '{section}' must be a mapping, found {found}")]
    InvalidSection {
        section: String,
        found: &'static str,
    },
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

fn deserialize<T: DeserializeOwned>(content: &str, format: SchemaFormat) -> Result<T> {
    Ok(match format {
        SchemaFormat::Yaml => serde_yaml_ng::from_str(content)?,
        SchemaFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?
        }
        SchemaFormat::Json => serde_json::from_str(content)?,
    })
}

/// Parse a route validation schema from a string in the given format.
pub fn parse_schema(content: &str, format: SchemaFormat) -> Result<RouteValidation> {
    deserialize::<SchemaDocument>(content, format)?.into_validation()
}

/// Parse a route validation schema from a YAML string.
pub fn parse_yaml(content: &str) -> Result<RouteValidation> {
    parse_schema(content, SchemaFormat::Yaml)
}

/// Parse a route validation schema from a TOML string.
///
/// # Example
///
/// ```rust
/// use fieldcheck_parser::parse_toml;
///
/// let toml = r#"
/// [body.name]
/// type = "string"
/// required = true
///
/// [body.age]
/// type = "number"
/// max = 150
/// "#;
///
/// let validation = parse_toml(toml).unwrap();
/// assert_eq!(validation.body.unwrap().len(), 2);
/// ```
pub fn parse_toml(content: &str) -> Result<RouteValidation> {
    parse_schema(content, SchemaFormat::Toml)
}

/// Parse a route validation schema from a JSON string.
pub fn parse_json(content: &str) -> Result<RouteValidation> {
    parse_schema(content, SchemaFormat::Json)
}

/// Detect the file format from a path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SchemaFormat::Yaml`
/// * `.toml` → `SchemaFormat::Toml`
/// * `.json` → `SchemaFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        "json" => Ok(SchemaFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a route validation schema from a file with automatic format
/// detection.
///
/// # Example
///
/// ```no_run
/// use fieldcheck_parser::parse_file;
/// use std::path::Path;
///
/// let validation = parse_file(Path::new("routes/create_user.yml")).unwrap();
/// println!("Body schema: {}", validation.body.is_some());
/// ```
pub fn parse_file(path: &Path) -> Result<RouteValidation> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "parsing schema file");

    parse_schema(&content, format)
}

/// Parse request inputs (`params`, `query`, `body`) from a JSON string.
pub fn parse_request_json(content: &str) -> Result<Request> {
    deserialize::<RequestDocument>(content, SchemaFormat::Json)?.into_request()
}

/// Load request inputs from a file with automatic format detection.
pub fn load_request(path: &Path) -> Result<Request> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "loading request file");

    deserialize::<RequestDocument>(&content, format)?.into_request()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_core::{Descriptor, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_yaml_sections() {
        let yaml = r#"
url:
  id:
    type: numeric
    required: true
body:
  name:
    type: string
    min: 3
  tags:
    type: array
    arrayType: string
    values: [a, b]
"#;

        let validation = parse_yaml(yaml).expect("Failed to parse valid YAML");

        assert!(validation.query.is_none());
        assert!(validation.messages.is_none());

        let url = validation.url.expect("url section");
        let id = url.get("id").expect("id rule");
        assert_eq!(
            id.get("required").and_then(Descriptor::as_value),
            Some(&Value::Bool(true))
        );

        let body = validation.body.expect("body section");
        let names: Vec<&str> = body.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "tags"]);
        assert_eq!(
            body.get("tags")
                .and_then(|rule| rule.get("values"))
                .and_then(Descriptor::as_value),
            Some(&Value::from(vec!["a", "b"]))
        );
    }

    #[test]
    fn test_parse_messages_alias() {
        let json = r#"{
            "query": {"q": {"type": "string", "required": true}},
            "validationMessages": {"q": {"required": "Search is required"}}
        }"#;

        let validation = parse_json(json).expect("Failed to parse JSON");
        let messages = validation.messages.expect("messages");
        assert_eq!(messages.get("q", "required"), Some("Search is required"));
    }

    #[test]
    fn test_null_section_is_absent() {
        let validation = parse_yaml("url: ~\n").unwrap();
        assert!(validation.url.is_none());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_yaml("url: [unclosed");
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("[body\nname = ");
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json("{\"url\": ");
        assert!(matches!(result.unwrap_err(), ParserError::JsonError(_)));
    }

    #[test]
    fn test_section_must_be_mapping() {
        let result = parse_yaml("query: 12\n");
        assert!(matches!(
            result.unwrap_err(),
            ParserError::InvalidSection { found: "number", .. }
        ));
    }

    #[test]
    fn test_invalid_regex() {
        let yaml = "body:\n  site:\n    type: string\n    regex: \"/(/\"\n";
        let err = parse_yaml(yaml).unwrap_err();
        assert!(err.to_string().starts_with("Invalid regex /(/ for field 'site'"));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.yml")).unwrap(), SchemaFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.YAML")).unwrap(), SchemaFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), SchemaFormat::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), SchemaFormat::Json);
        assert!(matches!(
            detect_format(Path::new("a.xml")).unwrap_err(),
            ParserError::UnsupportedFormat(ext) if ext == "xml"
        ));
        assert!(matches!(
            detect_format(Path::new("schema")).unwrap_err(),
            ParserError::InvalidExtension
        ));
    }

    #[test]
    fn test_parse_request_json() {
        let request = parse_request_json(
            r#"{"params": {"id": "12"}, "query": {"tags": "a,b"}, "body": {"age": 30}}"#,
        )
        .unwrap();

        assert_eq!(request.params.get("id"), Some(&Value::from("12")));
        assert_eq!(request.query.get("tags"), Some(&Value::from("a,b")));
        assert_eq!(request.body.get("age"), Some(&Value::from(30)));
    }
}
