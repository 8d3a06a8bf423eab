//! Untyped values for request inputs and schema properties.
//!
//! This module provides the tagged union used for everything that arrives
//! without a static type: URL parameters, query strings, request bodies, and
//! the loosely-typed properties of a raw schema.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Number;

/// A value in a request input or a raw schema property.
///
/// An absent value has no variant: it is a key missing from [`Params`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// String value
    String(String),
    /// Point in time, produced by `date` coercion
    Date(DateTime<Utc>),
    /// List value
    Array(Vec<Value>),
    /// Nested mapping
    Object(Params),
}

impl Value {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Renders the value as text.
    ///
    /// This is the form matched against `regex` constraints and listed in
    /// `values` messages: arrays join their elements with `,`, integral
    /// numbers drop the fractional part, dates use RFC 3339 and objects
    /// render as compact JSON.
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    // nulls inside lists render empty
                    Value::Null => String::new(),
                    other => other.stringify(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => self.to_json().to_string(),
        }
    }

    /// Converts the value into JSON.
    ///
    /// Dates become RFC 3339 strings, integral numbers become JSON integers
    /// and non-finite numbers become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => {
                serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(params) => serde_json::Value::Object(
                params
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if is_integral(n) {
        serde_json::Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i as f64)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(f64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// An insertion-ordered mapping from names to values.
///
/// Used for request inputs (`params`, `query`, `body`) and nested objects.
/// Keys keep the position of their first insertion, so error messages that
/// list input keys are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: IndexMap<String, Value>,
}

impl Params {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Gets a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns true if `key` is present, even when its value is null.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value, replacing an existing one in place.
    ///
    /// Returns the previous value if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a key, returning its value. Remaining keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Params {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Params {
    fn from(entries: [(K, V); N]) -> Self {
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Params {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_stringify() {
        assert_eq!(Value::from(3.0).stringify(), "3");
        assert_eq!(Value::from(2.5).stringify(), "2.5");
        assert_eq!(Value::from(-7).stringify(), "-7");
        assert_eq!(Value::from(vec!["men", "women"]).stringify(), "men,women");
        assert_eq!(
            Value::Array(vec![Value::from(1), Value::Null, Value::from("x")]).stringify(),
            "1,,x"
        );
        assert_eq!(Value::Null.stringify(), "null");

        let date = Utc.with_ymd_and_hms(2016, 10, 6, 16, 32, 39).unwrap();
        assert_eq!(Value::from(date).stringify(), "2016-10-06T16:32:39.000Z");
    }

    #[test]
    fn test_from_json_keeps_key_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": [true, null], "mid": "x"}));
        let Value::Object(params) = &value else {
            panic!("expected an object, got {value:?}");
        };

        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            params.get("alpha"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_to_json_numbers() {
        assert_eq!(Value::from(4.0).to_json(), json!(4));
        assert_eq!(Value::from(4.5).to_json(), json!(4.5));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_params_insert_replaces_in_place() {
        let mut params = Params::from([("a", 1), ("b", 2)]);
        assert_eq!(params.insert("a", "one"), Some(Value::from(1)));
        params.insert("c", 3);

        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(params.get("a"), Some(&Value::from("one")));

        assert_eq!(params.remove("b"), Some(Value::from(2)));
        assert!(!params.contains_key("b"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_remove_keeps_order() {
        let mut params: Params = (0..1_000)
            .map(|i| (format!("k{i}"), Value::from(i)))
            .collect();

        assert_eq!(params.remove("k0"), Some(Value::from(0)));
        assert_eq!(params.remove("k500"), Some(Value::from(500)));
        assert_eq!(params.remove("missing"), None);

        let keys: Vec<&str> = params.keys().take(3).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(params.keys().nth(498), Some("k499"));
        assert_eq!(params.keys().nth(499), Some("k501"));
        assert_eq!(params.len(), 998);
    }
}
