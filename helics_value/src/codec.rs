//! Bit-exact binary wire format, per spec.md "Binary value wire format".
//!
//! ```text
//! offset  size   field
//! 0       1      type_code
//! 1       2      reserved    (zero)
//! 3       1      endian      (0 = little, 1 = big)
//! 4       4      length_be   (unsigned, element count, always big-endian)
//! 8       ...    body
//! ```
//!
//! The `length` field counts elements, not bytes: for STRING and the
//! NAMED_POINT name it's the byte count of the name, for VECTOR/COMPLEX_VECTOR
//! it's the element count. A change of endian byte across a receive is the
//! caller's cue to byte-swap every element of the body before interpreting it.

use helics_core::error::{Error, Result};

use crate::value::{NamedPoint, Value};

const HEADER_LEN: usize = 8;

/// The wire-level type tag, distinct from [`Value`]'s in-memory shape:
/// an ANY/CUSTOM buffer round-trips as opaque bytes even though nothing in
/// the closed [`Value`] enum maps onto it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Double,
    Int,
    Complex,
    String,
    Vector,
    ComplexVector,
    NamedPoint,
    Bool,
    Custom,
}

impl TypeTag {
    pub const fn code(self) -> u8 {
        match self {
            TypeTag::Double => 0xB0,
            TypeTag::Int => 0x50,
            TypeTag::Complex => 0x12,
            TypeTag::String => 0x0E,
            TypeTag::Vector => 0x6C,
            TypeTag::NamedPoint => 0xAE,
            TypeTag::ComplexVector => 0x62,
            TypeTag::Custom => 0xF4,
        }
    }

    /// Auto-detect a tag from a buffer's first byte; an unknown byte maps to
    /// `Custom` rather than failing, per "unknown tag → CUSTOM (opaque)".
    pub fn from_code(code: u8) -> Self {
        match code {
            0xB0 => TypeTag::Double,
            0x50 => TypeTag::Int,
            0x12 => TypeTag::Complex,
            0x0E => TypeTag::String,
            0x6C => TypeTag::Vector,
            0xAE => TypeTag::NamedPoint,
            0x62 => TypeTag::ComplexVector,
            _ => TypeTag::Custom,
        }
    }

    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Double(_) => TypeTag::Double,
            Value::Int(_) => TypeTag::Int,
            Value::Complex(_, _) => TypeTag::Complex,
            Value::String(_) => TypeTag::String,
            Value::Vector(_) => TypeTag::Vector,
            Value::ComplexVector(_) => TypeTag::ComplexVector,
            Value::NamedPoint(_) => TypeTag::NamedPoint,
            Value::Bool(_) => TypeTag::Bool,
            Value::Raw(_) => TypeTag::Custom,
        }
    }
}

fn host_is_big_endian() -> bool {
    1u16.to_be() == 1u16
}

fn write_header(buf: &mut Vec<u8>, tag: TypeTag, length: u32) {
    buf.push(tag.code());
    buf.extend_from_slice(&[0u8, 0u8]);
    buf.push(host_is_big_endian() as u8);
    buf.extend_from_slice(&length.to_be_bytes());
}

fn write_f64(buf: &mut Vec<u8>, v: f64, big_endian: bool) {
    if big_endian {
        buf.extend_from_slice(&v.to_be_bytes());
    } else {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

fn read_f64(bytes: &[u8], big_endian: bool) -> f64 {
    let mut arr = [0u8; 8];
    arr.copy_from_slice(bytes);
    if big_endian {
        f64::from_be_bytes(arr)
    } else {
        f64::from_le_bytes(arr)
    }
}

/// Encode a [`Value`] into a self-describing buffer, host-endian.
pub fn encode(value: &Value) -> Vec<u8> {
    let tag = TypeTag::of(value);
    let mut buf = Vec::with_capacity(HEADER_LEN + 16);
    let big_endian = host_is_big_endian();
    match value {
        Value::Double(v) => {
            write_header(&mut buf, tag, 1);
            write_f64(&mut buf, *v, big_endian);
        }
        Value::Int(v) => {
            write_header(&mut buf, tag, 1);
            let bytes = if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
            buf.extend_from_slice(&bytes);
        }
        Value::Complex(re, im) => {
            write_header(&mut buf, tag, 1);
            write_f64(&mut buf, *re, big_endian);
            write_f64(&mut buf, *im, big_endian);
        }
        Value::String(s) => {
            write_header(&mut buf, tag, s.len() as u32);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Vector(v) => {
            write_header(&mut buf, tag, v.len() as u32);
            for x in v {
                write_f64(&mut buf, *x, big_endian);
            }
        }
        Value::ComplexVector(v) => {
            write_header(&mut buf, tag, v.len() as u32);
            for (re, im) in v {
                write_f64(&mut buf, *re, big_endian);
                write_f64(&mut buf, *im, big_endian);
            }
        }
        Value::NamedPoint(np) => {
            write_header(&mut buf, tag, np.name.len() as u32);
            write_f64(&mut buf, np.value, big_endian);
            buf.extend_from_slice(np.name.as_bytes());
        }
        Value::Bool(b) => {
            write_header(&mut buf, TypeTag::Bool, 1);
            buf.push(if *b { b'1' } else { b'0' });
        }
        Value::Raw(bytes) => {
            write_header(&mut buf, TypeTag::Custom, bytes.len() as u32);
            buf.extend_from_slice(bytes);
        }
    }
    buf
}

/// Decode a buffer produced by [`encode`] (or a peer's own encoder) back into
/// a [`Value`], respecting the wire endian flag regardless of host endianness.
pub fn decode(buf: &[u8]) -> Result<Value> {
    if buf.len() < HEADER_LEN {
        return Err(Error::FunctionExecutionFailure(
            "value buffer shorter than the 8-byte header".into(),
        ));
    }
    let tag = TypeTag::from_code(buf[0]);
    let big_endian = buf[3] != 0;
    let length = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
    let body = &buf[HEADER_LEN..];

    let need = |n: usize| -> Result<()> {
        if body.len() < n {
            Err(Error::FunctionExecutionFailure(format!(
                "value body too short: need {n} bytes, have {}",
                body.len()
            )))
        } else {
            Ok(())
        }
    };

    match tag {
        TypeTag::Double => {
            need(8)?;
            Ok(Value::Double(read_f64(&body[0..8], big_endian)))
        }
        TypeTag::Int => {
            need(8)?;
            let mut arr = [0u8; 8];
            arr.copy_from_slice(&body[0..8]);
            let v = if big_endian {
                i64::from_be_bytes(arr)
            } else {
                i64::from_le_bytes(arr)
            };
            Ok(Value::Int(v))
        }
        TypeTag::Complex => {
            need(16)?;
            let re = read_f64(&body[0..8], big_endian);
            let im = read_f64(&body[8..16], big_endian);
            Ok(Value::Complex(re, im))
        }
        TypeTag::String => {
            need(length)?;
            let s = String::from_utf8_lossy(&body[..length]).into_owned();
            Ok(Value::String(s))
        }
        TypeTag::Vector => {
            need(length * 8)?;
            let v = (0..length)
                .map(|i| read_f64(&body[i * 8..i * 8 + 8], big_endian))
                .collect();
            Ok(Value::Vector(v))
        }
        TypeTag::ComplexVector => {
            need(length * 16)?;
            let v = (0..length)
                .map(|i| {
                    let off = i * 16;
                    (
                        read_f64(&body[off..off + 8], big_endian),
                        read_f64(&body[off + 8..off + 16], big_endian),
                    )
                })
                .collect();
            Ok(Value::ComplexVector(v))
        }
        TypeTag::NamedPoint => {
            need(8 + length)?;
            let value = read_f64(&body[0..8], big_endian);
            let name = String::from_utf8_lossy(&body[8..8 + length]).into_owned();
            Ok(Value::NamedPoint(NamedPoint { name, value }))
        }
        TypeTag::Bool => {
            need(1)?;
            Ok(Value::Bool(body[0] == b'1'))
        }
        TypeTag::Custom => Ok(Value::Raw(body[..length.min(body.len())].to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_roundtrip() {
        let v = Value::Double(3.5);
        let buf = encode(&v);
        assert_eq!(buf[0], TypeTag::Double.code());
        assert_eq!(decode(&buf).unwrap(), v);
    }

    #[test]
    fn test_vector_roundtrip() {
        let v = Value::Vector(vec![1.0, 2.5, -3.0]);
        let buf = encode(&v);
        assert_eq!(decode(&buf).unwrap(), v);
    }

    #[test]
    fn test_named_point_roundtrip() {
        let v = Value::NamedPoint(NamedPoint::new("temp", 98.6));
        let buf = encode(&v);
        assert_eq!(decode(&buf).unwrap(), v);
    }

    #[test]
    fn test_bool_wire_bytes() {
        let buf = encode(&Value::Bool(true));
        assert_eq!(buf[HEADER_LEN], b'1');
        assert_eq!(decode(&buf).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_short_buffer_is_error() {
        assert!(decode(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_unknown_tag_is_custom() {
        assert_eq!(TypeTag::from_code(0x99), TypeTag::Custom);
    }
}
