//! Raw validation schemas and the request they are attached to.
//!
//! Raw schemas are deliberately loose: a [`RawRule`] may carry any property
//! with any shape, and it is the rule compiler's job to keep only what it
//! understands. This mirrors schemas that come from configuration files or
//! route definitions written by hand.

use crate::{Formatter, Params, Pattern, Value};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

/// One loosely-typed schema property.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Plain data (`type`, `required`, `min`, `values`, `terminal`, ...)
    Value(Value),
    /// Compiled pattern, the only accepted shape for `regex`
    Pattern(Pattern),
    /// Transform, the only accepted shape for `format`
    Format(Formatter),
}

impl Descriptor {
    /// Returns the plain value, if this descriptor holds one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Descriptor::Value(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! descriptor_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Descriptor {
                fn from(value: $source) -> Self {
                    Descriptor::Value(value.into())
                }
            }
        )*
    };
}

descriptor_from!(Value, &str, String, bool, i32, i64, f64, Vec<Value>, Vec<&str>);

impl From<Regex> for Descriptor {
    fn from(regex: Regex) -> Self {
        Descriptor::Pattern(Pattern::new(regex))
    }
}

impl From<Pattern> for Descriptor {
    fn from(pattern: Pattern) -> Self {
        Descriptor::Pattern(pattern)
    }
}

impl From<Formatter> for Descriptor {
    fn from(formatter: Formatter) -> Self {
        Descriptor::Format(formatter)
    }
}

/// Uncompiled description of one field: property name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct RawRule {
    properties: IndexMap<String, Descriptor>,
}

impl RawRule {
    /// Creates an empty description (compiles to no rule).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing a previous one with the same name.
    pub fn set(&mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) {
        self.properties.insert(name.into(), descriptor.into());
    }

    /// Builder-style [`RawRule::set`].
    pub fn with(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.set(name, descriptor);
        self
    }

    /// Gets a property.
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.properties.get(name)
    }

    /// Iterates over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.properties.iter().map(|(key, d)| (key.as_str(), d))
    }

    /// Returns true if no property is set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Schema of one request section: field rules plus the extra-fields flag.
#[derive(Debug, Clone, Default)]
pub struct SectionSchema {
    fields: IndexMap<String, RawRule>,

    /// Reject input keys that no field describes
    pub disallow_extra_fields: bool,
}

impl SectionSchema {
    /// Creates an empty section schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the raw rule of a field, keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, rule: RawRule) {
        self.fields.insert(name.into(), rule);
    }

    /// Builder-style [`SectionSchema::insert`].
    pub fn field(mut self, name: impl Into<String>, rule: RawRule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Sets the extra-fields flag.
    pub fn disallow_extra_fields(mut self, disallow: bool) -> Self {
        self.disallow_extra_fields = disallow;
        self
    }

    /// Gets the raw rule of a field.
    pub fn get(&self, name: &str) -> Option<&RawRule> {
        self.fields.get(name)
    }

    /// Returns true if the schema names this field, compilable or not.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &RawRule)> {
        self.fields.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Custom messages: field name to constraint name to message.
///
/// The extra-fields message lives under field [`MessageTable::EXTRA_FIELDS`]
/// and constraint `default`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageTable {
    messages: HashMap<String, HashMap<String, String>>,
}

impl MessageTable {
    /// Key under which the extra-fields message is stored.
    pub const EXTRA_FIELDS: &'static str = "disallowExtraFields";

    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for a field and constraint name.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.messages
            .entry(field.into())
            .or_default()
            .insert(constraint.into(), message.into());
    }

    /// Builder-style [`MessageTable::insert`].
    pub fn with(
        mut self,
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.insert(field, constraint, message);
        self
    }

    /// Looks up the message for a field and constraint name.
    pub fn get(&self, field: &str, constraint: &str) -> Option<&str> {
        self.messages
            .get(field)
            .and_then(|by_constraint| by_constraint.get(constraint))
            .map(String::as_str)
    }

    /// Returns the number of messages across all fields.
    pub fn len(&self) -> usize {
        self.messages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Validation attached to a route: one optional schema per section plus
/// custom messages.
#[derive(Debug, Clone, Default)]
pub struct RouteValidation {
    /// URL parameters
    pub url: Option<SectionSchema>,

    /// Query string
    pub query: Option<SectionSchema>,

    /// Request body
    pub body: Option<SectionSchema>,

    /// Custom messages shared by all sections
    pub messages: Option<MessageTable>,
}

/// The request-like value handed to the orchestrator.
///
/// Inputs are owned; validation coerces them in place.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Validation schema of the matched route, if any
    pub validation: Option<RouteValidation>,

    /// URL parameters
    pub params: Params,

    /// Query string parameters
    pub query: Params,

    /// Parsed request body
    pub body: Params,
}

impl Request {
    /// Creates a request without a schema or inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a validation schema.
    pub fn with_validation(mut self, validation: RouteValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Sets the URL parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the query string parameters.
    pub fn with_query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: Params) -> Self {
        self.body = body;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_rule_set_replaces() {
        let rule = RawRule::new().with("type", "string").with("type", "number");
        assert_eq!(rule.iter().count(), 1);
        assert_eq!(
            rule.get("type").and_then(Descriptor::as_value),
            Some(&Value::from("number"))
        );
    }

    #[test]
    fn test_section_schema_order() {
        let schema = SectionSchema::new()
            .field("b", RawRule::new())
            .field("a", RawRule::new())
            .field("b", RawRule::new().with("type", "string"));

        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(schema.contains("a"));
        assert!(!schema.get("b").unwrap().is_empty());
    }

    #[test]
    fn test_message_table_lookup() {
        let table = MessageTable::new()
            .with("name", "required", "The name is required")
            .with(MessageTable::EXTRA_FIELDS, "default", "No extras");

        assert_eq!(table.get("name", "required"), Some("The name is required"));
        assert_eq!(table.get("name", "min"), None);
        assert_eq!(table.get("disallowExtraFields", "default"), Some("No extras"));
        assert_eq!(table.len(), 2);
    }
}
