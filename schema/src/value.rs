//! @ai:module:intent Dynamically typed parameter values and configurations
//! @ai:module:layer domain
//! @ai:module:public_api Value, Configuration
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// @ai:intent A flat mapping from parameter name to its bound value
pub type Configuration = BTreeMap<String, Value>;

/// @ai:intent A concrete value for a parameter, default, or category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Real(f64),
    Text(String),
    Sequence(Vec<i64>),
}

impl Value {
    /// @ai:intent Name of the value's type, used in error messages
    /// @ai:effects pure
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Sequence(_) => "sequence",
        }
    }

    /// @ai:intent Numeric view of the value, if it is a number
    /// @ai:effects pure
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// @ai:intent Integer view of the value, if it is an integer
    /// @ai:effects pure
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{:?}", v),
            Value::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Sequence(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json_literals() {
        let cfg: Configuration =
            serde_json::from_str(r#"{"a": 3, "b": 2.5, "c": "x", "d": [1, 0, 2]}"#).unwrap();
        assert_eq!(cfg["a"], Value::Int(3));
        assert_eq!(cfg["b"], Value::Real(2.5));
        assert_eq!(cfg["c"], Value::Text("x".to_string()));
        assert_eq!(cfg["d"], Value::Sequence(vec![1, 0, 2]));
    }

    #[test]
    fn test_display_sequence() {
        assert_eq!(Value::Sequence(vec![1, 0, 2, 3, 4]).to_string(), "(1, 0, 2, 3, 4)");
    }
}
