//! The closed value set, per spec.md "Value types (the closed set used by
//! ValueCodec)" and `examples/original_source/src/helics/application_api/helicsTypes.hpp`'s
//! `helics_type_t`.
//!
//! This is deliberately a separate type from whatever wire tag a buffer
//! carries: a `Value` is the in-memory representation a federate's code
//! works with, while [`crate::codec::TypeTag`] is what travels on the wire.
//! Collapsing the two would make the ANY/CUSTOM passthrough case and the
//! coercion matrix awkward to express.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `{name, value}` pair, per `named_point` in the original source.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    pub name: String,
    pub value: f64,
}

impl NamedPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One value of the closed type set a `Publication`/`Input` can carry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Int(i64),
    Complex(f64, f64),
    String(String),
    Vector(Vec<f64>),
    ComplexVector(Vec<(f64, f64)>),
    NamedPoint(NamedPoint),
    Bool(bool),
    /// Producer-defined, untagged payload (ANY / CUSTOM).
    Raw(Vec<u8>),
}

impl Value {
    /// Euclidean norm used when collapsing a vector-shaped value to a scalar.
    pub(crate) fn vector_norm(v: &[f64]) -> f64 {
        v.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    pub(crate) fn complex_vector_norm(v: &[(f64, f64)]) -> f64 {
        v.iter().map(|(re, im)| re * re + im * im).sum::<f64>().sqrt()
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}
