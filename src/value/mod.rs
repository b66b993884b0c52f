//! The internal value representation: what resolvers return, what coerced variables and
//! default values look like, and what gets serialized onto the wire.
//!
//! Distinct from [`crate::ast::Value`] (the literal AST node, which may still contain
//! variable references) — by the time a [`Value`] exists, every variable has been resolved.

mod object;

pub use self::object::Object;

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value as Json;

/// A fully-resolved GraphQL value: a resolver's output, a coerced variable, or a default.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    /// The name of an enum member. Which [`crate::schema::meta::EnumType`] it belongs to is
    /// determined by the static type of the position it occupies, not carried on the value.
    Enum(String),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::List(items)
    }

    pub fn object(o: Object) -> Self {
        Self::Object(o)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a field on this value as if it were an object, per the executor's default
    /// property-lookup resolver.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(name))
    }

    /// Converts a JSON value received from a variables payload into a [`Value`]. Used by the
    /// variable coercer before each declared type's `parseValue` is applied.
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Json::String(s) => Self::String(s.clone()),
            Json::Array(items) => Self::List(items.iter().map(Value::from_json).collect()),
            Json::Object(fields) => {
                let mut obj = Object::new();
                for (k, v) in fields {
                    obj.insert(k.clone(), Value::from_json(v));
                }
                Self::Object(obj)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_converts_every_json_shape() {
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!(3)), Value::Int(3));
        assert_eq!(Value::from_json(&json!(3.5)), Value::Float(3.5));
        assert_eq!(Value::from_json(&json!("hi")), Value::String("hi".to_string()));
        assert_eq!(Value::from_json(&json!([1, 2])), Value::List(vec![Value::Int(1), Value::Int(2)]));

        let converted = Value::from_json(&json!({"a": 1}));
        assert_eq!(converted.get_field("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn display_matches_graphql_literal_syntax() {
        assert_eq!(Value::String("hi".to_string()).to_string(), "\"hi\"");
        assert_eq!(Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(), "[1, 2]");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn serializes_to_the_expected_json_shape() {
        let mut obj = Object::new();
        obj.insert("a", Value::Int(1));
        obj.insert("b", Value::Null);
        let json = serde_json::to_value(Value::Object(obj)).unwrap();
        assert_eq!(json, json!({"a": 1, "b": null}));
    }
}

/// Wire serialization: the shape a [`Value`] takes once placed into the `data` field of a
/// [`crate::error::Response`].
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(s) | Self::Enum(s) => serializer.serialize_str(s),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::List(items) => items.serialize(serializer),
            Self::Object(o) => o.serialize(serializer),
        }
    }
}
