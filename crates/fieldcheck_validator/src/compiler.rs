//! Rule compiler: raw schema entries to [`FieldRule`]s.
//!
//! Compilation never fails. A raw rule without a known `type` produces no
//! rule at all, and every property with an unexpected shape is dropped so
//! the default for that constraint applies.

use fieldcheck_core::{Constraint, Descriptor, FieldRule, RawRule, RuleType, Terminal, Value};
use tracing::trace;

/// Compiles a raw rule.
///
/// Returns `None` when the `type` property is missing, not a string, or not
/// one of the supported type names.
pub fn compile(raw: &RawRule) -> Option<FieldRule> {
    let rule_type = match raw.get("type").and_then(Descriptor::as_value) {
        Some(Value::String(name)) => match name.parse::<RuleType>() {
            Ok(rule_type) => rule_type,
            Err(err) => {
                trace!(error = %err, "rule has an unsupported type");
                return None;
            }
        },
        _ => {
            trace!("rule has no type");
            return None;
        }
    };

    let mut rule = FieldRule::new(rule_type);

    for (name, descriptor) in raw.iter() {
        let accepted = match (name, descriptor) {
            ("type", _) => true,
            ("required", Descriptor::Value(Value::Bool(required))) => {
                rule.required = *required;
                true
            }
            ("min", Descriptor::Value(Value::Number(min))) => {
                rule.min = Some(*min);
                true
            }
            ("max", Descriptor::Value(Value::Number(max))) => {
                rule.max = Some(*max);
                true
            }
            ("length", Descriptor::Value(Value::Number(length))) => {
                rule.length = Some(*length);
                true
            }
            ("arrayType", Descriptor::Value(Value::String(name))) => match name.parse() {
                Ok(array_type) => {
                    rule.array_type = Some(array_type);
                    true
                }
                Err(_) => false,
            },
            ("values", Descriptor::Value(Value::Array(values))) => {
                rule.values = Some(values.clone());
                true
            }
            ("regex", Descriptor::Pattern(regex)) => {
                rule.regex = Some(regex.clone());
                true
            }
            ("format", Descriptor::Format(formatter)) => {
                rule.format = Some(formatter.clone());
                true
            }
            ("terminal", Descriptor::Value(value)) => match compile_terminal(value) {
                Some(terminal) => {
                    rule.terminal = terminal;
                    true
                }
                None => false,
            },
            _ => false,
        };

        if !accepted {
            trace!(property = name, "ignoring schema property");
        }
    }

    Some(rule)
}

/// Reads a `terminal` property: a boolean or a list of constraint names.
///
/// Unknown names in the list are dropped.
fn compile_terminal(value: &Value) -> Option<Terminal> {
    match value {
        Value::Bool(true) => Some(Terminal::Always),
        Value::Bool(false) => Some(Terminal::Never),
        Value::Array(names) => Some(Terminal::On(
            names
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .filter_map(|name| name.parse::<Constraint>().ok())
                .collect(),
        )),
        _ => None,
    }
}
