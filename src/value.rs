//! Typed JSON value model
//!
//! Backend payloads arrive with no schema. `JsonValue` is the tagged union
//! every decoded document lands in; `serde_json::Value` is the native form
//! the resolver, discovery and chart heuristics walk.
//!
//! The free functions at the bottom of this module implement the shared
//! coercion rules (render-as-string, numeric parse, id extraction) over the
//! native form so that every component applies them identically.

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

// Locale-invariant decimal: sign, digits with optional fraction or a bare
// fraction, optional exponent. Rejects inf/nan which `f64::from_str` accepts.
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap()
});

/// A decoded JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum JsonValue {
    String(String),
    Number(f64),
    Bool(bool),
    Object(BTreeMap<String, JsonValue>),
    Array(Vec<JsonValue>),
    Null,
}

impl JsonValue {
    /// Decode a JSON document. Exactly one variant is produced at the root.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let native: Value = serde_json::from_slice(bytes)?;
        Ok(JsonValue::from(native))
    }

    /// Render for display.
    ///
    /// Integral numbers have no trailing `.0`, null is empty, and
    /// containers fall back to their encoded JSON text.
    pub fn as_string(&self) -> String {
        match self {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => render_f64(*n),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Null => String::new(),
            JsonValue::Object(_) | JsonValue::Array(_) => {
                serde_json::to_string(&self.to_native()).unwrap_or_default()
            }
        }
    }

    /// Convert to the native dynamic form.
    pub fn to_native(&self) -> Value {
        match self {
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Number(n) => number_to_native(*n),
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Object(obj) => Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_native()))
                    .collect::<Map<String, Value>>(),
            ),
            JsonValue::Array(arr) => Value::Array(arr.iter().map(JsonValue::to_native).collect()),
            JsonValue::Null => Value::Null,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Number(n) => n.as_f64().map(JsonValue::Number).unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s),
            Value::Array(arr) => JsonValue::Array(arr.into_iter().map(JsonValue::from).collect()),
            Value::Object(obj) => JsonValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        value.to_native()
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        value.to_native()
    }
}

/// Integral doubles inside the i64 range go back out as integers so that
/// `42` does not re-encode as `42.0`.
fn number_to_native(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

fn render_f64(n: f64) -> String {
    // Display for f64 prints integral values without a fractional part
    format!("{}", n)
}

fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(render_f64).unwrap_or_default()
}

/// Render a native value with the same rules as [`JsonValue::as_string`].
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => render_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Render only scalars; containers and null yield `None`.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(render(value)),
        _ => None,
    }
}

/// Parse a trimmed, numeric-looking string.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !NUMERIC_REGEX.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric coercion: numbers and numeric-looking strings.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Id coercion: strings pass through, integer-like numbers are stringified.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| (f as i64).to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_picks_single_variant() {
        let value = JsonValue::parse(br#"{"a": [1, "x", true, null]}"#).unwrap();
        let JsonValue::Object(obj) = &value else {
            panic!("expected object, got {:?}", value);
        };
        assert_eq!(
            obj.get("a"),
            Some(&JsonValue::Array(vec![
                JsonValue::Number(1.0),
                JsonValue::String("x".to_string()),
                JsonValue::Bool(true),
                JsonValue::Null,
            ]))
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(JsonValue::parse(b"{\"a\": ").is_err());
    }

    #[test]
    fn test_as_string_rules() {
        assert_eq!(JsonValue::Number(42.0).as_string(), "42");
        assert_eq!(JsonValue::Number(5.5).as_string(), "5.5");
        assert_eq!(JsonValue::Bool(false).as_string(), "false");
        assert_eq!(JsonValue::Null.as_string(), "");
        assert_eq!(
            JsonValue::Array(vec![JsonValue::Number(1.0)]).as_string(),
            "[1]"
        );
    }

    #[test]
    fn test_round_trip_preserves_value() {
        let native = json!({"n": 3, "f": 1.25, "s": "hi", "l": [null, false]});
        let typed = JsonValue::from(native.clone());
        assert_eq!(typed.to_native(), native);

        let encoded = serde_json::to_string(&typed).unwrap();
        let decoded: JsonValue = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, typed);
    }

    #[test]
    fn test_native_render() {
        assert_eq!(render(&json!(42.0)), "42");
        assert_eq!(render(&json!(7)), "7");
        assert_eq!(render(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(render_scalar(&json!(null)), None);
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(number(&json!("-3")), Some(-3.0));
        assert_eq!(number(&json!(".5")), Some(0.5));
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("12abc")), None);
        assert_eq!(number(&json!("")), None);
        assert_eq!(number(&json!(true)), None);
        assert_eq!(number(&json!({"v": 1})), None);
    }

    #[test]
    fn test_id_coercion() {
        assert_eq!(id_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(id_string(&json!(17)), Some("17".to_string()));
        assert_eq!(id_string(&json!(17.0)), Some("17".to_string()));
        assert_eq!(id_string(&json!(1.5)), None);
        assert_eq!(id_string(&json!(null)), None);
    }
}
