//! Compiled field rules.
//!
//! A [`FieldRule`] is the normalized, strongly-typed form of one raw schema
//! entry. Rules are produced by the rule compiler and never change afterwards.

use crate::Value;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// Text value
    String,
    /// Anything that survives numeric coercion
    Number,
    /// Boolean or boolean-like token
    Boolean,
    /// Number or non-empty numeric string
    Numeric,
    /// Date value or parseable date string
    Date,
    /// List value (comma-separated in URLs)
    Array,
    /// Object-kinded value
    Object,
}

impl RuleType {
    /// All supported types, in declaration order.
    pub const ALL: [RuleType; 7] = [
        RuleType::String,
        RuleType::Number,
        RuleType::Boolean,
        RuleType::Numeric,
        RuleType::Date,
        RuleType::Array,
        RuleType::Object,
    ];

    /// Returns the schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::String => "string",
            RuleType::Number => "number",
            RuleType::Boolean => "boolean",
            RuleType::Numeric => "numeric",
            RuleType::Date => "date",
            RuleType::Array => "array",
            RuleType::Object => "object",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Element type allowed inside `array` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayType {
    String,
    Number,
    Boolean,
    Numeric,
}

impl ArrayType {
    pub const ALL: [ArrayType; 4] = [
        ArrayType::String,
        ArrayType::Number,
        ArrayType::Boolean,
        ArrayType::Numeric,
    ];

    /// Returns the schema name of this element type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayType::String => "string",
            ArrayType::Number => "number",
            ArrayType::Boolean => "boolean",
            ArrayType::Numeric => "numeric",
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrayType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Name of a single check that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Constraint {
    Required,
    Type,
    ArrayType,
    Length,
    Min,
    Max,
    Values,
    Regex,
    /// Section-level check not bound to one field (extra input fields)
    Default,
}

impl Constraint {
    pub const ALL: [Constraint; 9] = [
        Constraint::Required,
        Constraint::Type,
        Constraint::ArrayType,
        Constraint::Length,
        Constraint::Min,
        Constraint::Max,
        Constraint::Values,
        Constraint::Regex,
        Constraint::Default,
    ];

    /// Returns the name used in schemas and custom message tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::Type => "type",
            Constraint::ArrayType => "arrayType",
            Constraint::Length => "length",
            Constraint::Min => "min",
            Constraint::Max => "max",
            Constraint::Values => "values",
            Constraint::Regex => "regex",
            Constraint::Default => "default",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Constraint {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// A name that does not match any known type or constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown name '{0}'")]
pub struct UnknownName(pub String);

/// Short-circuit policy of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Terminal {
    /// Errors on this field never stop evaluation
    #[default]
    Never,
    /// Any error on this field stops the rest of the section
    Always,
    /// When one of these constraints fails, only those errors are reported
    /// for the field
    On(Vec<Constraint>),
}

impl Terminal {
    /// Returns true if the field is evaluated before ordinary fields.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Terminal::Never)
    }
}

/// A pure value transform applied after all checks of a field.
#[derive(Clone)]
pub struct Formatter(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Formatter {
    /// Wraps a transform.
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Applies the transform.
    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

/// A compiled `regex` constraint together with the flags it was written with.
///
/// Displays in `/pattern/flags` form.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    flags: String,
}

impl Pattern {
    /// Wraps a regex compiled without flags.
    pub fn new(regex: Regex) -> Self {
        Self::with_flags(regex, "")
    }

    /// Wraps a regex together with the flags used to build it.
    pub fn with_flags(regex: Regex, flags: impl Into<String>) -> Self {
        Self {
            regex,
            flags: flags.into(),
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Returns true if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::new(regex)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.regex.as_str(), self.flags)
    }
}

/// Compiled constraint set for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Declared type
    pub rule_type: RuleType,

    /// Whether the field must be present and non-null
    pub required: bool,

    /// Lower bound (value for numbers, length for strings and arrays);
    /// `None` for boolean fields
    pub min: Option<f64>,

    /// Upper bound, same semantics as `min`
    pub max: Option<f64>,

    /// Exact length for strings and arrays
    pub length: Option<f64>,

    /// Element type for arrays
    pub array_type: Option<ArrayType>,

    /// Allow-list
    pub values: Option<Vec<Value>>,

    /// Pattern tested against the stringified value
    pub regex: Option<Pattern>,

    /// Transform applied last
    pub format: Option<Formatter>,

    /// Short-circuit policy
    pub terminal: Terminal,
}

impl FieldRule {
    /// Creates a rule with default constraints for the given type.
    pub fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            required: false,
            min: match rule_type {
                RuleType::Boolean => None,
                _ => Some(1.0),
            },
            max: None,
            length: None,
            array_type: None,
            values: None,
            regex: None,
            format: None,
            terminal: Terminal::Never,
        }
    }
}
