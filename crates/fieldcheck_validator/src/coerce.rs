//! Numeric, boolean and date coercion of untyped values.
//!
//! These helpers decide whether a loosely-typed value "is" a number, a
//! boolean or a date, and produce its typed replacement. The rules are fixed
//! because clients rely on them: a query string `?page=07` must keep
//! validating as the number 7.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fieldcheck_core::Value;

/// Converts a value to a number the way loosely-typed inputs are compared.
///
/// Returns `None` when the value is not a number (the NaN case). Blank
/// strings, null and empty lists are 0; booleans are 0 or 1; dates are
/// milliseconds since the epoch; lists convert through their text form.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => (!n.is_nan()).then_some(*n),
        Value::String(s) => parse_number(s),
        Value::Date(d) => Some(d.timestamp_millis() as f64),
        Value::Array(_) => parse_number(&value.stringify()),
        Value::Object(_) => None,
    }
}

/// Parses a numeric string.
///
/// Surrounding whitespace is ignored and a blank string is 0. Accepts
/// decimal and exponent notation, `0x`/`0o`/`0b` integers and `Infinity`
/// with an optional sign.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let lower = trimmed.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    // f64::from_str also accepts "inf" and "nan" spellings
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Accumulates digits into a float so literals wider than 64 bits stay finite.
fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }

    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// Returns true for a non-blank string that parses as a number.
pub fn is_numeric_string(s: &str) -> bool {
    !s.trim().is_empty() && parse_number(s).is_some()
}

/// Reads the leading integer of a string: optional sign, then decimal digits.
///
/// `"12.7"` is 12 and `"3px"` is 3. Returns `None` when no digit leads.
pub fn parse_leading_integer(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }

    digits.parse::<f64>().ok().map(|n| sign * n)
}

/// Coerces a value that passed a numeric type check to an integer.
///
/// Strings use their leading integer; when none exists (blank strings,
/// `".5"`) the numeric conversion is truncated instead. Returns `None` when
/// no finite integer can be produced, in which case the value is kept.
pub fn to_integer(value: &Value) -> Option<f64> {
    let integer = match value {
        Value::String(s) => parse_leading_integer(s).or_else(|| parse_number(s).map(f64::trunc)),
        other => to_number(other).map(f64::trunc),
    };
    integer.filter(|n| n.is_finite())
}

/// Interprets a boolean-like token.
///
/// Accepts `true`/`false`, `1`/`0` as numbers and the strings
/// `"true"`, `"false"`, `"1"`, `"0"`.
pub fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) if *n == 1.0 => Some(true),
        Value::Number(n) if *n == 0.0 => Some(false),
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a date string.
///
/// Accepts RFC 3339, RFC 2822, a bare `YYYY-MM-DD` (midnight UTC) and
/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]` without offset, read as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}
