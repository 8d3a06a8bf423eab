//! Individual field checks.
//!
//! Each check looks at one present, non-null value:
//! - Type: the value matches the declared type, possibly after coercion
//! - ArrayType: every element of a list matches the element type
//! - Length / Min / Max: size or magnitude bounds
//! - Values: allow-list membership
//! - Regex: pattern match on the text form
//!
//! Checks that do not apply to a value's kind pass.

use crate::coerce::{is_numeric_string, parse_date, to_boolean, to_integer, to_number};
use fieldcheck_core::{ArrayType, Pattern, RuleType, Value};

/// Result of a type check.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeCheck {
    /// The value matches and stays as is
    Valid,
    /// The value matches and is replaced by its typed form
    Coerced(Value),
    /// The value does not match
    Invalid,
}

/// Checks a value against a declared type.
pub fn check_type(value: &Value, rule_type: RuleType) -> TypeCheck {
    match rule_type {
        RuleType::Numeric => {
            let numeric = match value {
                Value::Number(n) => !n.is_nan(),
                Value::String(s) => is_numeric_string(s),
                _ => false,
            };
            if numeric { integer(value) } else { TypeCheck::Invalid }
        }
        RuleType::Number => {
            if to_number(value).is_some() {
                integer(value)
            } else {
                TypeCheck::Invalid
            }
        }
        RuleType::Boolean => match (value, to_boolean(value)) {
            (Value::Bool(_), _) => TypeCheck::Valid,
            (_, Some(b)) => TypeCheck::Coerced(Value::Bool(b)),
            (_, None) => TypeCheck::Invalid,
        },
        RuleType::Date => match value {
            Value::Date(_) => TypeCheck::Valid,
            Value::String(s) => parse_date(s)
                .map(|date| TypeCheck::Coerced(Value::Date(date)))
                .unwrap_or(TypeCheck::Invalid),
            _ => TypeCheck::Invalid,
        },
        RuleType::Array => matches_kind(matches!(value, Value::Array(_))),
        RuleType::String => matches_kind(matches!(value, Value::String(_))),
        RuleType::Object => matches_kind(matches!(
            value,
            Value::Object(_) | Value::Array(_) | Value::Date(_)
        )),
    }
}

fn integer(value: &Value) -> TypeCheck {
    match to_integer(value) {
        Some(n) if *value == Value::Number(n) => TypeCheck::Valid,
        Some(n) => TypeCheck::Coerced(Value::Number(n)),
        None => TypeCheck::Valid,
    }
}

fn matches_kind(matches: bool) -> TypeCheck {
    if matches {
        TypeCheck::Valid
    } else {
        TypeCheck::Invalid
    }
}

/// Checks that every element of a list has the element type.
///
/// `numeric` elements only need to convert to a number; the other element
/// types require the exact kind.
pub fn check_array_type(items: &[Value], array_type: ArrayType) -> bool {
    items.iter().all(|item| match array_type {
        ArrayType::Numeric => to_number(item).is_some(),
        ArrayType::String => matches!(item, Value::String(_)),
        ArrayType::Number => matches!(item, Value::Number(_)),
        ArrayType::Boolean => matches!(item, Value::Bool(_)),
    })
}

/// Measures a value for size checks: list length, character count, or the
/// number itself.
fn magnitude(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => Some(items.len() as f64),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Number(n) => Some(*n),
        _ => None,
    }
}

/// Checks the exact length of a string or list.
pub fn check_length(value: &Value, length: f64) -> bool {
    match value {
        Value::Array(_) | Value::String(_) => magnitude(value) == Some(length),
        _ => true,
    }
}

/// Checks a lower bound on a number, or on the length of a string or list.
pub fn check_min(value: &Value, min: f64) -> bool {
    magnitude(value).is_none_or(|m| m >= min)
}

/// Checks an upper bound on a number, or on the length of a string or list.
pub fn check_max(value: &Value, max: f64) -> bool {
    magnitude(value).is_none_or(|m| m <= max)
}

/// Checks allow-list membership. Every element of a list must be allowed.
///
/// An empty allow-list accepts everything.
pub fn check_values(value: &Value, allowed: &[Value]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    match value {
        Value::Array(items) => items.iter().all(|item| allowed.contains(item)),
        other => allowed.contains(other),
    }
}

/// Checks the text form of a value against a pattern.
pub fn check_regex(value: &Value, pattern: &Pattern) -> bool {
    pattern.is_match(&value.stringify())
}
