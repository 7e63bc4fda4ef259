//! Host-side dynamic values.

use serde::Serialize;
use serde_json::{Number, Value as JsonValue};

/// A script value after projection into the host.
///
/// Objects and arrays arrive as parsed JSON; scalars keep their own variant so
/// integers and doubles stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dynamic {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(JsonValue),
}

impl Dynamic {
    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Dynamic::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Any number, widened to a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Dynamic::Int(n) => Some(*n as f64),
            Dynamic::Float(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Dynamic::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to a JSON value. Non-finite doubles become `null`, as in `JSON.stringify`.
    pub fn to_json(&self) -> JsonValue {
        self.clone().into()
    }
}

impl From<JsonValue> for Dynamic {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Dynamic::Null,
            JsonValue::Bool(b) => Dynamic::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Dynamic::Int(i),
                None => Dynamic::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Dynamic::Text(s),
            v @ (JsonValue::Array(_) | JsonValue::Object(_)) => Dynamic::Json(v),
        }
    }
}

impl From<Dynamic> for JsonValue {
    fn from(d: Dynamic) -> Self {
        match d {
            Dynamic::Null => JsonValue::Null,
            Dynamic::Bool(b) => JsonValue::Bool(b),
            Dynamic::Int(n) => JsonValue::Number(n.into()),
            Dynamic::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            Dynamic::Text(s) => JsonValue::String(s),
            Dynamic::Json(v) => v,
        }
    }
}

impl From<bool> for Dynamic {
    fn from(b: bool) -> Self {
        Dynamic::Bool(b)
    }
}

impl From<i64> for Dynamic {
    fn from(n: i64) -> Self {
        Dynamic::Int(n)
    }
}

impl From<i32> for Dynamic {
    fn from(n: i32) -> Self {
        Dynamic::Int(n as i64)
    }
}

impl From<f64> for Dynamic {
    fn from(d: f64) -> Self {
        Dynamic::Float(d)
    }
}

impl From<String> for Dynamic {
    fn from(s: String) -> Self {
        Dynamic::Text(s)
    }
}

impl From<&str> for Dynamic {
    fn from(s: &str) -> Self {
        Dynamic::Text(s.to_owned())
    }
}
