//! Built-in scalar types: `Int`, `Float`, `String`, `Boolean`, `ID`.

use crate::ast::Value as AstValue;
use crate::schema::meta::ScalarType;
use crate::value::Value;

pub fn int() -> ScalarType {
    ScalarType::new(
        "Int",
        |v| match v {
            AstValue::Int(i) => i32::try_from(*i).map(|i| Value::Int(i64::from(i))).map_err(|_| {
                format!("Int cannot represent non 32-bit signed integer value: {i}")
            }),
            other => Err(format!("Int cannot represent non-integer value: {other}")),
        },
        |v| match v {
            Value::Int(i) if i32::try_from(*i).is_ok() => Ok(Value::Int(*i)),
            Value::Int(i) => Err(format!("Int cannot represent non 32-bit signed integer value: {i}")),
            other => Err(format!("Int cannot represent non-integer value: {other}")),
        },
        |v| match v {
            Value::Int(i) => Ok(Value::Int(*i)),
            other => Err(format!("Int cannot represent non-integer value: {other}")),
        },
    )
    .described("The `Int` scalar type represents a signed 32-bit numeric value.")
}

pub fn float() -> ScalarType {
    ScalarType::new(
        "Float",
        |v| match v {
            AstValue::Float(f) => Ok(Value::Float(*f)),
            AstValue::Int(i) => Ok(Value::Float(*i as f64)),
            other => Err(format!("Float cannot represent non numeric value: {other}")),
        },
        |v| match v {
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            other => Err(format!("Float cannot represent non numeric value: {other}")),
        },
        |v| match v {
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            other => Err(format!("Float cannot represent non numeric value: {other}")),
        },
    )
    .described("The `Float` scalar type represents signed double-precision fractional values.")
}

pub fn string() -> ScalarType {
    ScalarType::new(
        "String",
        |v| match v {
            AstValue::String(s) => Ok(Value::String(s.clone())),
            other => Err(format!("String cannot represent a non string value: {other}")),
        },
        |v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(format!("String cannot represent a non string value: {other}")),
        },
        |v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(format!("String cannot represent a non string value: {other}")),
        },
    )
    .described("The `String` scalar type represents textual data as UTF-8 character sequences.")
}

pub fn boolean() -> ScalarType {
    ScalarType::new(
        "Boolean",
        |v| match v {
            AstValue::Boolean(b) => Ok(Value::Boolean(*b)),
            other => Err(format!("Boolean cannot represent a non boolean value: {other}")),
        },
        |v| match v {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            other => Err(format!("Boolean cannot represent a non boolean value: {other}")),
        },
        |v| match v {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            other => Err(format!("Boolean cannot represent a non boolean value: {other}")),
        },
    )
    .described("The `Boolean` scalar type represents `true` or `false`.")
}

/// `ID` serializes as a string but accepts both string and int literals/values.
pub fn id() -> ScalarType {
    ScalarType::new(
        "ID",
        |v| match v {
            AstValue::String(s) => Ok(Value::String(s.clone())),
            AstValue::Int(i) => Ok(Value::String(i.to_string())),
            other => Err(format!("ID cannot represent value: {other}")),
        },
        |v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            other => Err(format!("ID cannot represent value: {other}")),
        },
        |v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            other => Err(format!("ID cannot represent value: {other}")),
        },
    )
    .described("The `ID` scalar type represents a unique identifier, serialized as a String.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value as AstValue;

    #[test]
    fn int_round_trips_through_literal_value_and_serialize() {
        let ty = int();
        assert_eq!(ty.parse_literal(&AstValue::Int(42)).unwrap(), Value::Int(42));
        assert_eq!(ty.parse_value(&Value::Int(42)).unwrap(), Value::Int(42));
        assert_eq!(ty.serialize(&Value::Int(42)).unwrap(), Value::Int(42));
    }

    #[test]
    fn int_rejects_values_outside_32_bits() {
        let ty = int();
        assert!(ty.parse_literal(&AstValue::Int(i64::from(i32::MAX) + 1)).is_err());
        assert!(ty.parse_value(&Value::Int(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn float_accepts_int_literals_and_values() {
        let ty = float();
        assert_eq!(ty.parse_literal(&AstValue::Int(7)).unwrap(), Value::Float(7.0));
        assert_eq!(ty.parse_value(&Value::Int(7)).unwrap(), Value::Float(7.0));
        assert_eq!(ty.serialize(&Value::Float(1.5)).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn string_rejects_non_string_literal() {
        let ty = string();
        assert!(ty.parse_literal(&AstValue::Int(1)).is_err());
        assert_eq!(ty.parse_literal(&AstValue::String("ok".to_string())).unwrap(), Value::String("ok".to_string()));
    }

    #[test]
    fn id_accepts_both_string_and_int_but_serializes_as_string() {
        let ty = id();
        assert_eq!(ty.parse_literal(&AstValue::Int(7)).unwrap(), Value::String("7".to_string()));
        assert_eq!(ty.parse_literal(&AstValue::String("abc".to_string())).unwrap(), Value::String("abc".to_string()));
        assert_eq!(ty.serialize(&Value::Int(7)).unwrap(), Value::String("7".to_string()));
    }

    #[test]
    fn boolean_round_trips() {
        let ty = boolean();
        assert_eq!(ty.parse_literal(&AstValue::Boolean(true)).unwrap(), Value::Boolean(true));
        assert_eq!(ty.parse_value(&Value::Boolean(false)).unwrap(), Value::Boolean(false));
        assert_eq!(ty.serialize(&Value::Boolean(true)).unwrap(), Value::Boolean(true));
    }
}
