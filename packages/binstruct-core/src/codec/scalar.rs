//! Element-level encoding of primitive wire tags.

use std::fmt;

use crate::types::{Value, WireTag};

/// Why a value could not be written as an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EncodeFault {
    Mismatch { expected: &'static str },
    OutOfRange(String),
}

/// Why bytes could not be read as an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DecodeFault {
    /// A bool byte other than 0 or 1
    InvalidBool(u8),
}

impl fmt::Display for DecodeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFault::InvalidBool(byte) => write!(f, "bool byte {:#04x} is not 0 or 1", byte),
        }
    }
}

/// Decodes `bytes` as consecutive elements of `tag`.
///
/// `bytes.len()` must be a multiple of the element width; the caller has
/// already sliced exactly that much.
pub(crate) fn decode_elements(
    tag: WireTag,
    bytes: &[u8],
    little: bool,
) -> Result<Vec<Value>, DecodeFault> {
    bytes
        .chunks_exact(tag.element_width())
        .map(|chunk| decode_element(tag, chunk, little))
        .collect()
}

/// Decodes one element. Only bytes that pack back unchanged are accepted.
pub(crate) fn decode_element(tag: WireTag, chunk: &[u8], little: bool) -> Result<Value, DecodeFault> {
    Ok(match tag {
        WireTag::Pad => Value::None,
        WireTag::Char | WireTag::CharArray | WireTag::PascalString => Value::Bytes(chunk.to_vec()),
        WireTag::Bool => match chunk {
            [0] => Value::Bool(false),
            [1] => Value::Bool(true),
            _ => return Err(DecodeFault::InvalidBool(chunk.first().copied().unwrap_or(0))),
        },
        WireTag::Float => Value::Float32(f32::from_bits(read_uint(chunk, little) as u32)),
        WireTag::Double => Value::Float(f64::from_bits(read_uint(chunk, little))),
        t if t.is_signed() => Value::Int(read_int(chunk, little)),
        _ => Value::UInt(read_uint(chunk, little)),
    })
}

/// Appends one element of `tag` holding `value`.
pub(crate) fn encode_element(
    tag: WireTag,
    value: &Value,
    little: bool,
    out: &mut Vec<u8>,
) -> Result<(), EncodeFault> {
    let width = tag.width();
    match tag {
        WireTag::Pad => out.resize(out.len() + width, 0),
        WireTag::Char | WireTag::CharArray | WireTag::PascalString => match value {
            Value::Bytes(bytes) => out.extend_from_slice(bytes),
            _ => return Err(EncodeFault::Mismatch { expected: "bytes" }),
        },
        WireTag::Bool => match value {
            Value::Bool(b) => out.push(u8::from(*b)),
            _ => return Err(EncodeFault::Mismatch { expected: "bool" }),
        },
        WireTag::Float => {
            let v = match value {
                Value::Float32(v) => *v,
                Value::Float(v) => *v as f32,
                Value::Int(v) => *v as f32,
                Value::UInt(v) => *v as f32,
                _ => return Err(EncodeFault::Mismatch { expected: "float" }),
            };
            write_uint(u64::from(v.to_bits()), width, little, out);
        }
        WireTag::Double => {
            let v = match value {
                Value::Float(v) => *v,
                Value::Float32(v) => f64::from(*v),
                Value::Int(v) => *v as f64,
                Value::UInt(v) => *v as f64,
                _ => return Err(EncodeFault::Mismatch { expected: "float" }),
            };
            write_uint(v.to_bits(), width, little, out);
        }
        t if t.is_signed() => {
            if !matches!(value, Value::Int(_) | Value::UInt(_)) {
                return Err(EncodeFault::Mismatch { expected: "integer" });
            }
            let v = value
                .as_i64()
                .filter(|v| fits_signed(*v, width))
                .ok_or_else(|| EncodeFault::OutOfRange(display_int(value)))?;
            write_uint(v as u64, width, little, out);
        }
        _ => {
            if !matches!(value, Value::Int(_) | Value::UInt(_)) {
                return Err(EncodeFault::Mismatch { expected: "integer" });
            }
            let v = value
                .as_u64()
                .filter(|v| fits_unsigned(*v, width))
                .ok_or_else(|| EncodeFault::OutOfRange(display_int(value)))?;
            write_uint(v, width, little, out);
        }
    }
    Ok(())
}

fn read_uint(chunk: &[u8], little: bool) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    if little {
        chunk.iter().rev().fold(0, fold)
    } else {
        chunk.iter().fold(0, fold)
    }
}

fn read_int(chunk: &[u8], little: bool) -> i64 {
    let raw = read_uint(chunk, little);
    let bits = chunk.len() * 8;
    if bits >= 64 {
        raw as i64
    } else {
        let shift = 64 - bits;
        ((raw << shift) as i64) >> shift
    }
}

fn write_uint(v: u64, width: usize, little: bool, out: &mut Vec<u8>) {
    let bytes = v.to_be_bytes();
    let tail = &bytes[8 - width..];
    if little {
        out.extend(tail.iter().rev());
    } else {
        out.extend_from_slice(tail);
    }
}

fn fits_signed(v: i64, width: usize) -> bool {
    if width >= 8 {
        return true;
    }
    let half = 1i64 << (width * 8 - 1);
    (-half..half).contains(&v)
}

fn fits_unsigned(v: u64, width: usize) -> bool {
    width >= 8 || v < (1u64 << (width * 8))
}

fn display_int(value: &Value) -> String {
    match value {
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        other => other.kind_name().to_string(),
    }
}
