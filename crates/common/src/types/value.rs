use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A literal as it appears in statements and result rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Null | Value::Float64(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int64(0) => Some(false),
            Value::Int64(1) => Some(true),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            Value::Null | Value::Int64(_) | Value::Float64(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Null | Value::Bool(_) | Value::Int64(_) | Value::Float64(_) => None,
        }
    }

    /// Renders the value the way a setting stores it, so that `SET x = 1`
    /// and `SET x = true` compare equal against a boolean setting.
    pub fn to_setting_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Value::Int64(n) => n.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::String(s) => s.clone(),
        }
    }

    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int64(n) => n.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int64(n) => JsonValue::from(*n),
            Value::Float64(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Float64(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_string_normalizes_booleans() {
        assert_eq!(Value::Bool(true).to_setting_string(), "1");
        assert_eq!(Value::Int64(1).to_setting_string(), "1");
        assert_eq!(Value::string("abc").to_setting_string(), "abc");
    }

    #[test]
    fn test_as_bool_accepts_numeric_and_textual_forms() {
        assert_eq!(Value::Int64(0).as_bool(), Some(false));
        assert_eq!(Value::string("TRUE").as_bool(), Some(true));
        assert_eq!(Value::Int64(2).as_bool(), None);
        assert_eq!(Value::Float64(1.0).as_bool(), None);
    }

    #[test]
    fn test_sql_literal_escapes_quotes() {
        assert_eq!(Value::string("it's").to_sql_literal(), "'it\\'s'");
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
    }
}
