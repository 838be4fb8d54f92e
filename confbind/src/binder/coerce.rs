//! Conversion of scalar values to primitive field types.

use serde_json::{Number, Value};

use super::schema::{IntBounds, Primitive};
use crate::error::{Error, Result};

/// Converts `value` to `primitive`, naming `key` on failure.
pub(crate) fn coerce(value: &Value, primitive: Primitive, key: &str) -> Result<Value> {
    let coerced = match primitive {
        Primitive::Str => to_str(value),
        Primitive::Int(bounds) => to_int(value, bounds),
        Primitive::Float => to_float(value),
        Primitive::Bool => to_bool(value),
    };

    coerced.ok_or_else(|| Error::Coercion {
        key: key.to_string(),
        expected: primitive.to_string(),
        found: value.to_string(),
    })
}

fn to_str(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn to_int(value: &Value, bounds: IntBounds) -> Option<Value> {
    let n = match value {
        Value::Number(n) => number_to_i128(n)?,
        Value::String(s) => s.trim().parse::<i128>().ok()?,
        _ => return None,
    };

    if !bounds.contains(n) {
        return None;
    }

    if let Ok(i) = i64::try_from(n) {
        Some(Value::from(i))
    } else {
        u64::try_from(n).ok().map(Value::from)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_i128(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }

    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1.0e38 {
        Some(f as i128)
    } else {
        None
    }
}

fn to_float(value: &Value) -> Option<Value> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    Number::from_f64(f).map(Value::Number)
}

fn to_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(s) => parse_bool(s).map(Value::Bool),
        _ => None,
    }
}

/// Parses the boolean spellings accepted in configuration files.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INT: Primitive = Primitive::Int(IntBounds::I64);

    fn ok(value: Value, primitive: Primitive) -> Value {
        coerce(&value, primitive, "key").unwrap()
    }

    fn fails(value: Value, primitive: Primitive) -> bool {
        matches!(
            coerce(&value, primitive, "key"),
            Err(Error::Coercion { .. })
        )
    }

    #[test]
    fn test_str_accepts_scalars() {
        assert_eq!(ok(json!("text"), Primitive::Str), json!("text"));
        assert_eq!(ok(json!(42), Primitive::Str), json!("42"));
        assert_eq!(ok(json!(1.5), Primitive::Str), json!("1.5"));
        assert_eq!(ok(json!(true), Primitive::Str), json!("true"));
    }

    #[test]
    fn test_str_rejects_containers_and_null() {
        assert!(fails(json!(null), Primitive::Str));
        assert!(fails(json!([1]), Primitive::Str));
        assert!(fails(json!({"a": 1}), Primitive::Str));
    }

    #[test]
    fn test_int_from_numbers_and_strings() {
        assert_eq!(ok(json!(8080), INT), json!(8080));
        assert_eq!(ok(json!(3.0), INT), json!(3));
        assert_eq!(ok(json!(" 9090 "), INT), json!(9090));
        assert_eq!(ok(json!("-12"), INT), json!(-12));
    }

    #[test]
    fn test_int_rejections() {
        assert!(fails(json!("eighty"), INT));
        assert!(fails(json!(1.5), INT));
        assert!(fails(json!(true), INT));
        assert!(fails(json!(null), INT));
        assert!(fails(json!("1.0"), INT));
    }

    #[test]
    fn test_int_bounds() {
        let port = Primitive::Int(IntBounds::of_u16());
        assert_eq!(ok(json!(65535), port), json!(65535));
        assert!(fails(json!(65536), port));
        assert!(fails(json!("-1"), port));
    }

    #[test]
    fn test_large_unsigned_values() {
        let u64_bounds = Primitive::Int(IntBounds::new(0, i128::from(u64::MAX)));
        assert_eq!(ok(json!(u64::MAX), u64_bounds), json!(u64::MAX));
        assert!(fails(json!(u64::MAX), INT));
    }

    #[test]
    fn test_float() {
        assert_eq!(ok(json!(1.5), Primitive::Float), json!(1.5));
        assert_eq!(ok(json!(2), Primitive::Float), json!(2.0));
        assert_eq!(ok(json!("0.25"), Primitive::Float), json!(0.25));
        assert!(fails(json!("NaN"), Primitive::Float));
        assert!(fails(json!("inf"), Primitive::Float));
        assert!(fails(json!("fast"), Primitive::Float));
        assert!(fails(json!(false), Primitive::Float));
    }

    #[test]
    fn test_bool() {
        assert_eq!(ok(json!(true), Primitive::Bool), json!(true));
        for truthy in ["true", "TRUE", "1", "yes", "On"] {
            assert_eq!(ok(json!(truthy), Primitive::Bool), json!(true));
        }
        for falsy in ["false", "0", "No", "off"] {
            assert_eq!(ok(json!(falsy), Primitive::Bool), json!(false));
        }
        assert!(fails(json!("maybe"), Primitive::Bool));
        assert!(fails(json!(1), Primitive::Bool));
    }

    #[test]
    fn test_error_carries_context() {
        let err = coerce(&json!("eighty"), INT, "server.port").unwrap_err();
        match err {
            Error::Coercion {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "server.port");
                assert_eq!(expected, "int");
                assert_eq!(found, "\"eighty\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
