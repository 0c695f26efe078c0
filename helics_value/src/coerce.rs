//! Cross-type coercion and change detection, per spec.md §4.1.
//!
//! The coercion matrix is total: every `(from, to)` pair produces a value,
//! never an error, except a STRING → numeric parse failure, which is
//! reported to the caller rather than treated as a core fault ("a parse
//! failure in coercion is not fatal to the core").

use helics_core::error::{Error, Result};

use crate::value::{NamedPoint, Value};

/// The type a caller wants a value coerced to, mirroring [`crate::codec::TypeTag`]
/// but named for the coercion API rather than the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Double,
    Int,
    Complex,
    String,
    Vector,
    ComplexVector,
    NamedPoint,
    Bool,
}

fn parse_vector_literal(s: &str) -> Option<Vec<f64>> {
    let inner = s
        .strip_prefix("v2[")
        .or_else(|| s.strip_prefix('['))
        .map(|s| s.trim_end_matches(']'))?;
    inner
        .split(',')
        .map(|tok| tok.trim().parse::<f64>().ok())
        .collect()
}

fn string_to_double(s: &str) -> Result<f64> {
    s.trim().parse::<f64>().or_else(|_| {
        parse_vector_literal(s)
            .map(|v| Value::vector_norm(&v))
            .ok_or_else(|| Error::FunctionExecutionFailure(format!("cannot parse '{s}' as a number")))
    })
}

fn string_to_bool(s: &str) -> bool {
    !s.is_empty() && s != "0" && s != "false"
}

/// `RAW`'s display form: utf-8 if valid, else lowercase hex, so an
/// ANY/CUSTOM-tagged value can route through the same STRING-based
/// coercions as every other variant instead of having no arm to land on.
fn raw_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
    }
}

/// Interpret `value` as if it had been declared with `target`, per the
/// coercion matrix in spec.md §4.1.
pub fn coerce(value: &Value, target: TargetType) -> Result<Value> {
    use TargetType as T;
    Ok(match (value, target) {
        (Value::Double(d), T::Double) => Value::Double(*d),
        (Value::Int(i), T::Int) => Value::Int(*i),
        (Value::Complex(re, im), T::Complex) => Value::Complex(*re, *im),
        (Value::String(s), T::String) => Value::String(s.clone()),
        (Value::Vector(v), T::Vector) => Value::Vector(v.clone()),
        (Value::ComplexVector(v), T::ComplexVector) => Value::ComplexVector(v.clone()),
        (Value::NamedPoint(p), T::NamedPoint) => Value::NamedPoint(p.clone()),
        (Value::Bool(b), T::Bool) => Value::Bool(*b),

        // numeric -> numeric: static_cast semantics
        (Value::Double(d), T::Int) => Value::Int(*d as i64),
        (Value::Int(i), T::Double) => Value::Double(*i as f64),
        (Value::Bool(b), T::Double) => Value::Double(if *b { 1.0 } else { 0.0 }),
        (Value::Bool(b), T::Int) => Value::Int(if *b { 1 } else { 0 }),
        (Value::Double(d), T::Bool) => Value::Bool(*d != 0.0),
        (Value::Int(i), T::Bool) => Value::Bool(*i != 0),

        // numeric -> STRING: locale-independent decimal
        (Value::Double(d), T::String) => Value::String(d.to_string()),
        (Value::Int(i), T::String) => Value::String(i.to_string()),
        (Value::Bool(b), T::String) => Value::String(if *b { "1".into() } else { "0".into() }),
        (Value::Complex(re, im), T::String) => Value::String(format!("{re}{im:+}j")),
        (Value::Vector(v), T::String) => {
            let joined = v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(",");
            Value::String(format!("v[{joined}]"))
        }

        // STRING -> numeric: strict parse, vector-literal fallback to norm
        (Value::String(s), T::Double) => Value::Double(string_to_double(s)?),
        (Value::String(s), T::Int) => Value::Int(string_to_double(s)? as i64),
        (Value::String(s), T::Bool) => Value::Bool(string_to_bool(s)),

        // VECTOR -> scalar: Euclidean norm
        (Value::Vector(v), T::Double) => Value::Double(Value::vector_norm(v)),
        (Value::Vector(v), T::Int) => Value::Int(Value::vector_norm(v) as i64),

        // COMPLEX -> scalar: magnitude
        (Value::Complex(re, im), T::Double) => {
            Value::Double((re * re + im * im).sqrt())
        }
        (Value::ComplexVector(v), T::Double) => Value::Double(Value::complex_vector_norm(v)),

        // NAMED_POINT -> scalar: value field if finite, else parse the name
        (Value::NamedPoint(p), T::Double) => {
            if p.value.is_finite() {
                Value::Double(p.value)
            } else {
                Value::Double(string_to_double(&p.name)?)
            }
        }
        (Value::NamedPoint(p), T::String) => Value::String(p.name.clone()),

        // Any -> NAMED_POINT: string form as name and NaN as value, or
        // {"value": x} for numerics
        (Value::String(s), T::NamedPoint) => {
            Value::NamedPoint(NamedPoint::new(s.clone(), f64::NAN))
        }
        (Value::Double(d), T::NamedPoint) => {
            Value::NamedPoint(NamedPoint::new(format!("{{\"value\": {d}}}"), *d))
        }
        (Value::Int(i), T::NamedPoint) => {
            Value::NamedPoint(NamedPoint::new(format!("{{\"value\": {i}}}"), *i as f64))
        }

        // COMPLEX_VECTOR -> STRING: same joined-literal convention as VECTOR -> STRING
        (Value::ComplexVector(v), T::String) => {
            let joined = v
                .iter()
                .map(|(re, im)| format!("{re}{im:+}j"))
                .collect::<Vec<_>>()
                .join(",");
            Value::String(format!("cv[{joined}]"))
        }

        // RAW -> any: the opaque bytes have no native numeric meaning, so
        // every target goes through RAW's STRING display form first (same
        // parse-failure rules as STRING -> target), which keeps RAW off the
        // fallback below instead of recursing into it forever.
        (Value::Raw(bytes), T::String) => Value::String(raw_to_string(bytes)),
        (Value::Raw(bytes), T::Double) => Value::Double(string_to_double(&raw_to_string(bytes))?),
        (Value::Raw(bytes), T::Int) => Value::Int(string_to_double(&raw_to_string(bytes))? as i64),
        (Value::Raw(bytes), T::Bool) => Value::Bool(string_to_bool(&raw_to_string(bytes))),
        (Value::Raw(bytes), T::Complex) => Value::Complex(string_to_double(&raw_to_string(bytes))?, 0.0),
        (Value::Raw(bytes), T::Vector) => Value::Vector(vec![string_to_double(&raw_to_string(bytes))?]),
        (Value::Raw(bytes), T::ComplexVector) => {
            Value::ComplexVector(vec![(string_to_double(&raw_to_string(bytes))?, 0.0)])
        }
        (Value::Raw(bytes), T::NamedPoint) => {
            Value::NamedPoint(NamedPoint::new(raw_to_string(bytes), f64::NAN))
        }

        // fallback: route through STRING, then reinterpret
        (other, target) => {
            let as_string = coerce(other, T::String)?;
            if target == T::String {
                as_string
            } else {
                return Err(Error::FunctionExecutionFailure(format!(
                    "no coercion path from {other:?} to {target:?}"
                )));
            }
        }
    })
}

/// `changed(prev, new, delta)`: format-level change detection per spec.md §4.1.
pub fn changed(prev: &Value, new: &Value, delta: f64) -> bool {
    match (prev, new) {
        (Value::Double(p), Value::Double(n)) => (p - n).abs() > delta,
        (Value::Int(p), Value::Int(n)) => (*p - *n).unsigned_abs() as f64 > delta,
        (Value::Bool(p), Value::Bool(n)) => p != n,
        (Value::Complex(pr, pi), Value::Complex(nr, ni)) => {
            ((pr - nr).powi(2) + (pi - ni).powi(2)).sqrt() > delta
        }
        (Value::String(p), Value::String(n)) => p != n,
        (Value::Vector(p), Value::Vector(n)) => {
            p.len() != n.len()
                || p.iter()
                    .zip(n.iter())
                    .any(|(a, b)| (a - b).abs() > delta)
        }
        (Value::ComplexVector(p), Value::ComplexVector(n)) => {
            p.len() != n.len()
                || p.iter().zip(n.iter()).any(|((pr, pi), (nr, ni))| {
                    ((pr - nr).powi(2) + (pi - ni).powi(2)).sqrt() > delta
                })
        }
        (Value::NamedPoint(p), Value::NamedPoint(n)) => {
            p.name != n.name || (p.value - n.value).abs() > delta
        }
        (Value::Raw(p), Value::Raw(n)) => p != n,
        // different tags always count as a change
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_to_scalar_norm() {
        let v = Value::Vector(vec![3.0, 4.0]);
        assert_eq!(coerce(&v, TargetType::Double).unwrap(), Value::Double(5.0));
    }

    #[test]
    fn test_string_parse_failure_is_typed_error() {
        let v = Value::String("not a number".into());
        assert!(coerce(&v, TargetType::Double).is_err());
    }

    #[test]
    fn test_string_vector_literal_coerces_to_norm() {
        let v = Value::String("[3,4]".into());
        assert_eq!(coerce(&v, TargetType::Double).unwrap(), Value::Double(5.0));
    }

    #[test]
    fn test_changed_respects_delta() {
        assert!(!changed(&Value::Double(1.0), &Value::Double(1.0005), 0.01));
        assert!(changed(&Value::Double(1.0), &Value::Double(1.5), 0.01));
    }

    #[test]
    fn test_changed_tag_switch_is_change() {
        assert!(changed(&Value::Double(1.0), &Value::Int(1), 1.0));
    }

    #[test]
    fn test_raw_coerces_to_string_and_numeric_without_overflow() {
        let raw = Value::Raw(b"42".to_vec());
        assert_eq!(coerce(&raw, TargetType::String).unwrap(), Value::String("42".into()));
        assert_eq!(coerce(&raw, TargetType::Double).unwrap(), Value::Double(42.0));
        assert_eq!(coerce(&raw, TargetType::Bool).unwrap(), Value::Bool(true));

        let binary = Value::Raw(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(coerce(&binary, TargetType::String).unwrap(), Value::String("deadbeef".into()));
        assert!(coerce(&binary, TargetType::Double).is_err());
    }

    #[test]
    fn test_complex_vector_coerces_to_string() {
        let v = Value::ComplexVector(vec![(1.0, 2.0), (3.0, -4.0)]);
        assert_eq!(coerce(&v, TargetType::String).unwrap(), Value::String("cv[1+2j,3-4j]".into()));
    }
}
