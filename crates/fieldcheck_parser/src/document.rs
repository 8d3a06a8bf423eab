//! Document shapes for schema and request files, and their conversion into
//! core types.

use crate::{ParserError, Result};
use fieldcheck_core::{
    Descriptor, MessageTable, Params, Pattern, RawRule, Request, RouteValidation, SectionSchema,
    Value,
};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tracing::trace;

/// Key that turns on the extra-fields check inside a section.
const DISALLOW_EXTRA_FIELDS: &str = "disallowExtraFields";

/// A schema file: one mapping per section plus custom messages.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub url: Option<JsonValue>,

    #[serde(default)]
    pub query: Option<JsonValue>,

    #[serde(default)]
    pub body: Option<JsonValue>,

    #[serde(default, alias = "validationMessages")]
    pub messages: Option<HashMap<String, HashMap<String, String>>>,
}

impl SchemaDocument {
    /// Converts the document into a route validation.
    pub fn into_validation(self) -> Result<RouteValidation> {
        Ok(RouteValidation {
            url: self.url.map(|s| section_schema("url", s)).transpose()?,
            query: self.query.map(|s| section_schema("query", s)).transpose()?,
            body: self.body.map(|s| section_schema("body", s)).transpose()?,
            messages: self.messages.map(message_table),
        })
    }
}

/// A request fixture: the inputs of one request.
#[derive(Debug, Default, Deserialize)]
pub struct RequestDocument {
    #[serde(default, alias = "url")]
    pub params: Option<JsonValue>,

    #[serde(default)]
    pub query: Option<JsonValue>,

    #[serde(default)]
    pub body: Option<JsonValue>,
}

impl RequestDocument {
    /// Converts the document into a request without a validation schema.
    pub fn into_request(self) -> Result<Request> {
        Ok(Request::new()
            .with_params(input("params", self.params)?)
            .with_query(input("query", self.query)?)
            .with_body(input("body", self.body)?))
    }
}

fn expect_mapping(section: &str, value: JsonValue) -> Result<Map<String, JsonValue>> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(ParserError::InvalidSection {
            section: section.to_string(),
            found: json_kind(&other),
        }),
    }
}

fn input(section: &str, value: Option<JsonValue>) -> Result<Params> {
    match value {
        None | Some(JsonValue::Null) => Ok(Params::new()),
        Some(value) => expect_mapping(section, value).map(Params::from),
    }
}

fn section_schema(section: &str, value: JsonValue) -> Result<SectionSchema> {
    let mut schema = SectionSchema::new();

    for (field, rule) in expect_mapping(section, value)? {
        if field == DISALLOW_EXTRA_FIELDS {
            match rule {
                JsonValue::Bool(disallow) => schema.disallow_extra_fields = disallow,
                other => trace!(section, found = json_kind(&other), "ignoring extra-fields flag"),
            }
            continue;
        }

        let raw = match rule {
            JsonValue::Object(properties) => raw_rule(&field, properties)?,
            other => {
                trace!(section, field = %field, found = json_kind(&other), "rule is not a mapping");
                RawRule::new()
            }
        };
        schema.insert(field, raw);
    }

    Ok(schema)
}

fn raw_rule(field: &str, properties: Map<String, JsonValue>) -> Result<RawRule> {
    let mut rule = RawRule::new();

    for (name, value) in properties {
        let descriptor = match (name.as_str(), value) {
            ("regex", JsonValue::String(pattern)) => {
                Descriptor::Pattern(compile_pattern(&pattern).map_err(|source| {
                    ParserError::InvalidRegex {
                        field: field.to_string(),
                        pattern: pattern.clone(),
                        source,
                    }
                })?)
            }
            (_, value) => Descriptor::Value(Value::from(value)),
        };
        rule.set(name, descriptor);
    }

    Ok(rule)
}

/// Compiles a pattern written either bare or as `/pattern/flags`.
///
/// Supported flags: `i`, `m`, `s`, `x`.
pub fn compile_pattern(pattern: &str) -> std::result::Result<Pattern, regex::Error> {
    let Some((body, flags)) = split_delimited(pattern) else {
        return Regex::new(pattern).map(Pattern::new);
    };

    let regex = RegexBuilder::new(body)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()?;

    Ok(Pattern::with_flags(regex, flags))
}

fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let inner = pattern.strip_prefix('/')?;
    let end = inner.rfind('/')?;
    let flags = &inner[end + 1..];

    if flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x')) {
        Some((&inner[..end], flags))
    } else {
        None
    }
}

fn message_table(messages: HashMap<String, HashMap<String, String>>) -> MessageTable {
    let mut table = MessageTable::new();
    for (field, by_constraint) in messages {
        for (constraint, message) in by_constraint {
            table.insert(field.as_str(), constraint, message);
        }
    }
    table
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delimited_patterns() {
        assert_eq!(split_delimited("/^a/i"), Some(("^a", "i")));
        assert_eq!(split_delimited("/a/b/"), Some(("a/b", "")));
        assert_eq!(split_delimited("/usr/local"), None);
        assert_eq!(split_delimited("^a$"), None);

        let re = compile_pattern("/^abc$/i").unwrap();
        assert!(re.is_match("ABC"));
        assert_eq!(re.regex().as_str(), "^abc$");
        assert_eq!(re.flags(), "i");
        assert_eq!(re.to_string(), "/^abc$/i");

        let bare = compile_pattern(r"^\d+$").unwrap();
        assert!(!bare.is_match("x"));
        assert_eq!(bare.to_string(), r"/^\d+$/");
    }

    #[test]
    fn test_section_flag_and_non_mapping_rules() {
        let schema = section_schema(
            "body",
            json!({"name": {"type": "string"}, "note": "loose", "disallowExtraFields": true}),
        )
        .unwrap();

        assert!(schema.disallow_extra_fields);
        assert!(schema.contains("note"));
        assert!(schema.get("note").unwrap().is_empty());
        assert!(!schema.contains(DISALLOW_EXTRA_FIELDS));
    }

    #[test]
    fn test_section_must_be_mapping() {
        let err = section_schema("url", json!(["a"])).unwrap_err();
        assert!(matches!(
            err,
            ParserError::InvalidSection { ref section, found: "array" } if section == "url"
        ));
    }

    #[test]
    fn test_invalid_regex_names_field() {
        let err = section_schema("query", json!({"q": {"type": "string", "regex": "("}}))
            .unwrap_err();
        assert!(matches!(err, ParserError::InvalidRegex { ref field, .. } if field == "q"));
    }

    #[test]
    fn test_request_inputs() {
        let doc = RequestDocument {
            params: Some(json!({"id": "1"})),
            query: None,
            body: Some(JsonValue::Null),
        };
        let request = doc.into_request().unwrap();
        assert_eq!(request.params.get("id"), Some(&Value::from("1")));
        assert!(request.query.is_empty());
        assert!(request.body.is_empty());
        assert!(request.validation.is_none());
    }
}
