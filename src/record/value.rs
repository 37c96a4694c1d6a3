//! Field values and literal coercion
//!
//! A console literal is first classified on its own:
//! 1. Matches `^-?[0-9]+$` and fits i64 → `Value::Integer`
//! 2. Matches a decimal/exponent pattern → `Value::Float`
//! 3. Everything else → `Value::String`
//!
//! The result is then reconciled with the attribute's declared
//! [`FieldType`], so a `name` set to `42` is stored as the text `"42"` and a
//! `latitude` set to `37` is stored as `37.0`. Input is never evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

/// Declared type of an attribute in a kind's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    List,
}

impl FieldType {
    /// The value a freshly constructed record carries for this type
    pub fn default_value(self) -> Value {
        match self {
            FieldType::String => Value::String(String::new()),
            FieldType::Integer => Value::Integer(0),
            FieldType::Float => Value::Float(0.0),
            FieldType::List => Value::List(Vec::new()),
        }
    }

    /// Coerce a raw console literal into a value of this type.
    ///
    /// Returns a human-readable reason on mismatch.
    pub fn coerce(self, raw: &str) -> Result<Value, String> {
        match self {
            FieldType::String => Ok(Value::String(raw.to_string())),
            FieldType::Integer => match infer_literal(raw) {
                Value::Integer(i) => Ok(Value::Integer(i)),
                _ => Err(format!("expected an integer, got '{}'", raw)),
            },
            FieldType::Float => match infer_literal(raw) {
                Value::Integer(i) => Ok(Value::Float(i as f64)),
                Value::Float(f) => Ok(Value::Float(f)),
                _ => Err(format!("expected a number, got '{}'", raw)),
            },
            FieldType::List => parse_list(raw).map(Value::List),
        }
    }

    /// Whether a stored value already has this type
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::String, Value::String(_))
                | (FieldType::Integer, Value::Integer(_))
                | (FieldType::Float, Value::Float(_))
                | (FieldType::List, Value::List(_))
        )
    }
}

/// Classify a literal as integer, float, or string.
pub fn infer_literal(raw: &str) -> Value {
    if is_integer(raw) {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if is_float(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Value::Float(f);
            }
        }
    }

    Value::String(raw.to_string())
}

/// `["a", "b"]` as JSON, otherwise a comma-separated list
fn parse_list(raw: &str) -> Result<Vec<String>, String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|e| format!("invalid list literal: {}", e));
    }

    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

fn is_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_float(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() || !s.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        return false;
    }
    s.bytes().all(|b| {
        b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || b == b'+' || b == b'-'
    })
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => s.clone().into(),
            Value::Integer(i) => (*i).into(),
            // Non-finite floats have no JSON form and become null
            Value::Float(x) => (*x).into(),
            Value::List(items) => items.clone().into(),
        }
    }
}

// =============================================================================
// Display (console form)
// =============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write_quoted(f, s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Single-quoted with `\` and `'` escaped
pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}
