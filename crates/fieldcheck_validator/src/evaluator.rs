//! Field evaluator: runs compiled rules over one request section.
//!
//! Evaluation of a section happens in three steps:
//! 1. Extra-fields check, when the schema disallows unknown keys
//! 2. Terminal-flagged fields, in schema order
//! 3. All other fields, in schema order
//!
//! Each field's value is coerced and formatted in place. A field with errors
//! stops the section when the evaluator fails fast or the field is terminal.

use crate::checks::{
    TypeCheck, check_array_type, check_length, check_max, check_min, check_regex, check_type,
    check_values,
};
use crate::compiler::compile;
use fieldcheck_core::{
    Constraint, ErrorRecord, FieldRule, MessageTable, Params, RuleType, SectionSchema, Terminal,
    Value,
};
use tracing::debug;

/// A compiled field in evaluation order.
#[derive(Debug, Clone)]
pub struct PlannedField<'a> {
    pub name: &'a str,
    pub rule: FieldRule,
}

/// Compiled fields of a section, terminal-flagged fields first.
#[derive(Debug, Clone, Default)]
pub struct EvaluationPlan<'a> {
    fields: Vec<PlannedField<'a>>,
    skipped: usize,
}

impl<'a> EvaluationPlan<'a> {
    /// Compiles every field of a schema and orders them for evaluation.
    ///
    /// Fields whose rule does not compile are counted and left out.
    pub fn build(schema: &'a SectionSchema) -> Self {
        let mut terminal = Vec::new();
        let mut ordinary = Vec::new();
        let mut skipped = 0;

        for (name, raw) in schema.fields() {
            match compile(raw) {
                Some(rule) if rule.terminal.is_flagged() => {
                    terminal.push(PlannedField { name, rule })
                }
                Some(rule) => ordinary.push(PlannedField { name, rule }),
                None => skipped += 1,
            }
        }

        terminal.extend(ordinary);
        Self {
            fields: terminal,
            skipped,
        }
    }

    /// Iterates over fields in evaluation order.
    pub fn fields(&self) -> impl Iterator<Item = &PlannedField<'a>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of schema entries that produced no rule.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// What evaluating one section produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionOutcome {
    /// Error records in production order
    pub errors: Vec<ErrorRecord>,

    /// Fields evaluated before the section finished or stopped
    pub fields_checked: usize,

    /// Schema entries without a usable rule
    pub fields_skipped: usize,
}

/// Evaluates section schemas against section inputs.
///
/// # Example
///
/// ```rust
/// use fieldcheck_core::{Params, RuleBuilder, SectionSchema, Value};
/// use fieldcheck_validator::SectionEvaluator;
///
/// let schema = SectionSchema::new().field("page", RuleBuilder::new("numeric").build());
/// let mut input = Params::from([("page", "3")]);
///
/// let errors = SectionEvaluator::new(true).evaluate_section(&mut input, &schema, true);
///
/// assert!(errors.is_empty());
/// assert_eq!(input.get("page"), Some(&Value::from(3)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SectionEvaluator<'m> {
    fail_on_first_error: bool,
    messages: Option<&'m MessageTable>,
}

impl<'m> SectionEvaluator<'m> {
    /// Creates an evaluator without custom messages.
    pub fn new(fail_on_first_error: bool) -> Self {
        Self {
            fail_on_first_error,
            messages: None,
        }
    }

    /// Uses a custom message table.
    pub fn with_messages(mut self, messages: Option<&'m MessageTable>) -> Self {
        self.messages = messages;
        self
    }

    /// Evaluates one section and returns its error records.
    ///
    /// `from_url` enables comma-splitting of array fields.
    pub fn evaluate_section(
        &self,
        input: &mut Params,
        schema: &SectionSchema,
        from_url: bool,
    ) -> Vec<ErrorRecord> {
        self.evaluate(input, schema, from_url).errors
    }

    /// Evaluates one section and returns errors with field counts.
    pub fn evaluate(
        &self,
        input: &mut Params,
        schema: &SectionSchema,
        from_url: bool,
    ) -> SectionOutcome {
        let plan = EvaluationPlan::build(schema);
        let mut outcome = SectionOutcome {
            fields_skipped: plan.skipped(),
            ..SectionOutcome::default()
        };

        if schema.disallow_extra_fields {
            outcome.errors.extend(self.check_extra_fields(input, schema));
        }

        for field in plan.fields() {
            let errors = self.evaluate_field(field.name, &field.rule, input, from_url);
            outcome.fields_checked += 1;

            if errors.is_empty() {
                continue;
            }

            debug!(field = field.name, errors = errors.len(), "field failed validation");
            outcome.errors.extend(errors);

            if self.fail_on_first_error || field.rule.terminal == Terminal::Always {
                debug!(field = field.name, "stopping section evaluation");
                break;
            }
        }

        outcome
    }

    /// Reports input keys the schema does not name, in input order.
    fn check_extra_fields(&self, input: &Params, schema: &SectionSchema) -> Option<ErrorRecord> {
        let extras: Vec<&str> = input.keys().filter(|key| !schema.contains(key)).collect();
        if extras.is_empty() {
            return None;
        }

        Some(self.record(MessageTable::EXTRA_FIELDS, Constraint::Default, || {
            format!("Should not contain extra fields ({})", extras.join(", "))
        }))
    }

    /// Runs every check of one field and writes the coerced value back.
    fn evaluate_field(
        &self,
        name: &str,
        rule: &FieldRule,
        input: &mut Params,
        from_url: bool,
    ) -> Vec<ErrorRecord> {
        let mut value = input.get(name).cloned();
        let mut errors = Vec::new();

        if from_url && rule.rule_type == RuleType::Array {
            if let Some(Value::String(raw)) = &value {
                let items: Vec<Value> = raw
                    .split(',')
                    .filter(|item| !item.is_empty())
                    .map(Value::from)
                    .collect();
                value = (!items.is_empty()).then_some(Value::Array(items));
            }
        }

        if rule.required && value.as_ref().is_none_or(Value::is_null) {
            errors.push(self.record(name, Constraint::Required, || {
                format!("Param {} is required", name)
            }));
        }

        if let Some(current) = value.as_ref().filter(|v| !v.is_null()) {
            match check_type(current, rule.rule_type) {
                TypeCheck::Valid => {}
                TypeCheck::Coerced(coerced) => value = Some(coerced),
                TypeCheck::Invalid => errors.push(self.record(name, Constraint::Type, || {
                    format!("Param {} has invalid type ({})", name, rule.rule_type)
                })),
            }
        }

        if let Some(current) = value.as_ref().filter(|v| !v.is_null()) {
            errors.extend(self.check_present(name, rule, current));
        }

        if let Some(format) = &rule.format {
            value = value.map(|v| if v.is_null() { v } else { format.apply(v) });
        }

        match value {
            Some(value) => {
                input.insert(name, value);
            }
            None => {
                input.remove(name);
            }
        }

        match &rule.terminal {
            Terminal::On(constraints) => filter_terminal(errors, constraints),
            _ => errors,
        }
    }

    /// Runs the checks that need a present, non-null value.
    fn check_present(&self, name: &str, rule: &FieldRule, value: &Value) -> Vec<ErrorRecord> {
        let mut errors = Vec::new();

        if let (Value::Array(items), Some(array_type)) = (value, rule.array_type) {
            if !check_array_type(items, array_type) {
                errors.push(self.record(name, Constraint::ArrayType, || {
                    format!("Param {} has invalid content type ({}[])", name, array_type)
                }));
            }
        }

        if let Some(length) = rule.length {
            if !check_length(value, length) {
                errors.push(self.record(name, Constraint::Length, || {
                    format!("Param {} must have a length of {}", name, bound(length))
                }));
            }
        }

        if let Some(min) = rule.min {
            if !check_min(value, min) {
                errors.push(self.record(name, Constraint::Min, || {
                    format!("Param {} must have a minimum length of {}", name, bound(min))
                }));
            }
        }

        if let Some(max) = rule.max {
            if !check_max(value, max) {
                errors.push(self.record(name, Constraint::Max, || {
                    format!("Param {} must have a maximum length of {}", name, bound(max))
                }));
            }
        }

        if let Some(values) = &rule.values {
            if !check_values(value, values) {
                errors.push(self.record(name, Constraint::Values, || {
                    format!(
                        "Param {} must belong to [{}]",
                        name,
                        Value::Array(values.clone()).stringify()
                    )
                }));
            }
        }

        if let Some(regex) = &rule.regex {
            if !check_regex(value, regex) {
                errors.push(self.record(name, Constraint::Regex, || {
                    format!("Param {} must match regex {}", name, regex)
                }));
            }
        }

        errors
    }

    /// Builds an error record, preferring the custom message when one exists.
    fn record(
        &self,
        field: &str,
        constraint: Constraint,
        default_message: impl FnOnce() -> String,
    ) -> ErrorRecord {
        match self
            .messages
            .and_then(|messages| messages.get(field, constraint.as_str()))
        {
            Some(custom) => ErrorRecord::custom(field, constraint, custom),
            None => ErrorRecord::new(field, constraint, default_message()),
        }
    }
}

/// Keeps only the errors of the listed constraints, unless none of them
/// failed.
fn filter_terminal(errors: Vec<ErrorRecord>, constraints: &[Constraint]) -> Vec<ErrorRecord> {
    let terminal: Vec<ErrorRecord> = errors
        .iter()
        .filter(|record| constraints.contains(&record.constraint))
        .cloned()
        .collect();

    if terminal.is_empty() { errors } else { terminal }
}

fn bound(n: f64) -> String {
    Value::Number(n).stringify()
}
