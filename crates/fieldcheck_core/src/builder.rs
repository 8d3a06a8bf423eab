//! Builder pattern for creating raw schemas.
//!
//! Raw rules are loose maps; these builders give a typed way to write the
//! common shapes without spelling out property names.

use crate::{
    Constraint, Formatter, MessageTable, Pattern, RawRule, RouteValidation, SectionSchema, Value,
};

/// Builder for a field's [`RawRule`].
///
/// # Example
///
/// ```rust
/// use fieldcheck_core::RuleBuilder;
///
/// let rule = RuleBuilder::new("string")
///     .required(true)
///     .min(3.0)
///     .values(["fr", "en"])
///     .build();
///
/// assert!(rule.get("values").is_some());
/// ```
#[derive(Debug, Default)]
pub struct RuleBuilder {
    rule: RawRule,
}

impl RuleBuilder {
    /// Creates a builder for the given type name.
    ///
    /// The name is not checked here; an unsupported name makes the rule
    /// compile to nothing.
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule: RawRule::new().with("type", rule_type.into()),
        }
    }

    /// Sets whether the field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.rule.set("required", required);
        self
    }

    /// Sets the lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.rule.set("min", min);
        self
    }

    /// Sets the upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.rule.set("max", max);
        self
    }

    /// Sets the exact length.
    pub fn length(mut self, length: f64) -> Self {
        self.rule.set("length", length);
        self
    }

    /// Sets the element type of an array field.
    pub fn array_type(mut self, array_type: impl Into<String>) -> Self {
        self.rule.set("arrayType", array_type.into());
        self
    }

    /// Sets the allow-list.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.rule.set("values", values);
        self
    }

    /// Sets the pattern.
    pub fn regex(mut self, pattern: impl Into<Pattern>) -> Self {
        self.rule.set("regex", pattern.into());
        self
    }

    /// Sets the transform applied after all checks.
    pub fn format(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.rule.set("format", Formatter::new(f));
        self
    }

    /// Makes any error on this field stop the section.
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.rule.set("terminal", terminal);
        self
    }

    /// Restricts the field's reported errors to these constraints when one
    /// of them fails.
    pub fn terminal_on(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        let names: Vec<Value> = constraints
            .into_iter()
            .map(|c| Value::from(c.as_str()))
            .collect();
        self.rule.set("terminal", names);
        self
    }

    /// Sets an arbitrary property.
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule.set(name, value.into());
        self
    }

    /// Builds the raw rule.
    pub fn build(self) -> RawRule {
        self.rule
    }
}

/// Builder for a [`RouteValidation`].
///
/// # Example
///
/// ```rust
/// use fieldcheck_core::{RuleBuilder, SectionSchema, ValidationBuilder};
///
/// let validation = ValidationBuilder::new()
///     .query(SectionSchema::new().field("page", RuleBuilder::new("numeric").build()))
///     .message("page", "type", "Page must be a number")
///     .build();
///
/// assert!(validation.query.is_some());
/// assert!(validation.url.is_none());
/// ```
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    validation: RouteValidation,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL parameter schema.
    pub fn url(mut self, schema: SectionSchema) -> Self {
        self.validation.url = Some(schema);
        self
    }

    /// Sets the query string schema.
    pub fn query(mut self, schema: SectionSchema) -> Self {
        self.validation.query = Some(schema);
        self
    }

    /// Sets the body schema.
    pub fn body(mut self, schema: SectionSchema) -> Self {
        self.validation.body = Some(schema);
        self
    }

    /// Adds a custom message.
    pub fn message(
        mut self,
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.validation
            .messages
            .get_or_insert_with(MessageTable::new)
            .insert(field, constraint, message);
        self
    }

    /// Builds the route validation.
    pub fn build(self) -> RouteValidation {
        self.validation
    }
}
