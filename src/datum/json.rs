use serde_json::Value;

use super::{Datum, DatumKind};
use crate::num::number::{parse_float, parse_integer};
use crate::num::{Mat4, Vec4};
use crate::text::{parse_mat4, parse_vec4};
use crate::{Error, Result};

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(kind: DatumKind, value: &Value) -> Error {
    Error::type_conflict(format!(
        "expected a {kind} literal, found {}",
        json_type(value)
    ))
}

fn to_integer(value: &Value, strict: bool) -> Result<i32> {
    match value {
        Value::Number(number) => {
            if let Some(wide) = number.as_i64() {
                return i32::try_from(wide).map_err(|_| {
                    Error::invalid_argument(format!("{wide} does not fit in an integer datum"))
                });
            }
            match number.as_f64() {
                Some(float) if !strict && float.fract() == 0.0 && float.abs() <= i32::MAX as f64 => {
                    Ok(float as i32)
                }
                _ => Err(mismatch(DatumKind::Integer, value)),
            }
        }
        Value::String(text) if !strict => parse_integer(text),
        _ => Err(mismatch(DatumKind::Integer, value)),
    }
}

fn to_float(value: &Value, strict: bool) -> Result<f32> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(|float| float as f32)
            .ok_or_else(|| mismatch(DatumKind::Float, value)),
        Value::String(text) if !strict => parse_float(text),
        _ => Err(mismatch(DatumKind::Float, value)),
    }
}

fn to_string(value: &Value, strict: bool) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(_) | Value::Bool(_) if !strict => Ok(value.to_string()),
        _ => Err(mismatch(DatumKind::String, value)),
    }
}

fn collect_floats(value: &Value, out: &mut Vec<f32>) -> bool {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(float) => {
                out.push(float as f32);
                true
            }
            None => false,
        },
        Value::Array(items) => items.iter().all(|item| collect_floats(item, out)),
        _ => false,
    }
}

fn to_vector(value: &Value) -> Result<Vec4> {
    match value {
        Value::String(text) => parse_vec4(text),
        Value::Array(_) => {
            let mut floats = Vec::with_capacity(4);
            match (collect_floats(value, &mut floats), floats.as_slice()) {
                (true, [x, y, z, w]) => Ok(Vec4::new(*x, *y, *z, *w)),
                _ => Err(mismatch(DatumKind::Vector, value)),
            }
        }
        _ => Err(mismatch(DatumKind::Vector, value)),
    }
}

fn to_matrix(value: &Value) -> Result<Mat4> {
    match value {
        Value::String(text) => parse_mat4(text),
        Value::Array(_) => {
            let mut floats = Vec::with_capacity(16);
            if !collect_floats(value, &mut floats) {
                return Err(mismatch(DatumKind::Matrix, value));
            }
            Mat4::from_cols_slice(&floats).ok_or_else(|| mismatch(DatumKind::Matrix, value))
        }
        _ => Err(mismatch(DatumKind::Matrix, value)),
    }
}

impl Datum {
    /// Kind a JSON literal will be stored as. Strict mode never infers one.
    fn literal_kind(&self, value: &Value, strict: bool) -> Result<DatumKind> {
        if let Some(kind) = self.kind() {
            return Ok(kind);
        }
        if strict {
            return Err(Error::type_conflict(
                "datum has no kind, declare a \"type\" before its \"value\"",
            ));
        }
        match value {
            Value::Number(number) if number.as_i64().is_some_and(|n| i32::try_from(n).is_ok()) => {
                Ok(DatumKind::Integer)
            }
            Value::Number(_) => Ok(DatumKind::Float),
            Value::String(_) => Ok(DatumKind::String),
            _ => Err(Error::type_conflict(format!(
                "cannot infer a datum kind from {}",
                json_type(value)
            ))),
        }
    }

    /// Writes a JSON scalar into element `index`.
    pub fn set_json(&mut self, value: &Value, index: usize, strict: bool) -> Result<()> {
        match self.literal_kind(value, strict)? {
            DatumKind::Integer => self.set(to_integer(value, strict)?, index),
            DatumKind::Float => self.set(to_float(value, strict)?, index),
            DatumKind::String => self.set(to_string(value, strict)?, index),
            DatumKind::Vector => self.set(to_vector(value)?, index),
            DatumKind::Matrix => self.set(to_matrix(value)?, index),
            kind @ (DatumKind::Pointer | DatumKind::Table) => Err(mismatch(kind, value)),
        }
    }

    /// Appends a JSON scalar, fixing the kind from the literal when lenient.
    pub fn push_back_json(&mut self, value: &Value, strict: bool) -> Result<()> {
        match self.literal_kind(value, strict)? {
            DatumKind::Integer => self.push_back(to_integer(value, strict)?),
            DatumKind::Float => self.push_back(to_float(value, strict)?),
            DatumKind::String => self.push_back(to_string(value, strict)?),
            DatumKind::Vector => self.push_back(to_vector(value)?),
            DatumKind::Matrix => self.push_back(to_matrix(value)?),
            kind @ (DatumKind::Pointer | DatumKind::Table) => Err(mismatch(kind, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[rstest::rstest]
    #[case(DatumKind::Integer, json!(10), Datum::from(10))]
    #[case(DatumKind::Float, json!(1.5), Datum::from(1.5f32))]
    #[case(DatumKind::Float, json!(2), Datum::from(2.0f32))]
    #[case(DatumKind::String, json!("Bob"), Datum::from("Bob"))]
    #[case(DatumKind::Vector, json!("vec4(1, 0, 0, 1)"), Datum::from(Vec4::new(1.0, 0.0, 0.0, 1.0)))]
    #[case(DatumKind::Vector, json!([0, 1, 2, 3]), Datum::from(Vec4::new(0.0, 1.0, 2.0, 3.0)))]
    #[case(DatumKind::Matrix, json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]), Datum::from(Mat4::IDENTITY))]
    fn strict_literals(#[case] kind: DatumKind, #[case] value: Value, #[case] expected: Datum) {
        let mut datum = Datum::with_kind(kind);
        datum.push_back_json(&value, true).unwrap();
        assert_eq!(datum, expected);
    }

    #[rstest::rstest]
    #[case(DatumKind::Integer, json!("10"))]
    #[case(DatumKind::Integer, json!(1.5))]
    #[case(DatumKind::Float, json!("1.5"))]
    #[case(DatumKind::String, json!(3))]
    #[case(DatumKind::Vector, json!([1, 2]))]
    #[case(DatumKind::Table, json!(1))]
    fn strict_rejects_mismatches(#[case] kind: DatumKind, #[case] value: Value) {
        let mut datum = Datum::with_kind(kind);
        assert!(datum.push_back_json(&value, true).is_err());
        assert!(datum.is_empty());
    }

    #[rstest::rstest]
    fn lenient_converts_and_infers() {
        let mut datum = Datum::with_kind(DatumKind::Integer);
        datum.push_back_json(&json!("7"), false).unwrap();
        datum.push_back_json(&json!(8.0), false).unwrap();
        assert_eq!(datum, Datum::from(vec![7, 8]));

        let mut inferred = Datum::new();
        inferred.push_back_json(&json!(2.5), false).unwrap();
        assert!(inferred.is_kind(DatumKind::Float));

        let mut untyped = Datum::new();
        let err = untyped.push_back_json(&json!(1), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeConflict);
    }

    #[rstest::rstest]
    fn set_json_writes_in_place() {
        let mut datum = Datum::from(vec![String::new(), String::new()]);
        datum.set_json(&json!("Jim"), 1, true).unwrap();
        assert_eq!(datum.get::<String>(1).unwrap(), "Jim");
        assert_eq!(
            datum.set_json(&json!("Fred"), 2, true).unwrap_err().kind,
            ErrorKind::Bounds
        );
    }

    #[rstest::rstest]
    fn oversized_integers_are_rejected() {
        let mut datum = Datum::with_kind(DatumKind::Integer);
        let err = datum.push_back_json(&json!(5_000_000_000i64), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
