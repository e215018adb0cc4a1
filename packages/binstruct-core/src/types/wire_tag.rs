//! The closed catalog of primitive wire kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic category of a decoded field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Integer,
    Float,
    Boolean,
    /// Raw bytes, or text when an encoding is configured
    Bytes,
    /// Padding; decodes to nothing
    None,
    NestedStruct,
    Sequence,
}

/// Primitive wire encodings supported by the codec.
///
/// Each variant has a struct-format code, a fixed byte width (0 for the
/// variable-length byte strings, whose count is their length) and a
/// semantic [`ValueType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireTag {
    /// Padding byte
    Pad,
    /// Single raw byte
    Char,
    /// 8-bit signed integer
    SignedChar,
    /// 8-bit unsigned integer
    UnsignedChar,
    /// One-byte boolean
    Bool,
    /// 16-bit signed integer
    Short,
    /// 16-bit unsigned integer
    UnsignedShort,
    /// 32-bit signed integer
    Int,
    /// 32-bit unsigned integer
    UnsignedInt,
    /// 32-bit signed integer (standard-size `long`)
    Long,
    /// 32-bit unsigned integer (standard-size `unsigned long`)
    UnsignedLong,
    /// 64-bit signed integer
    LongLong,
    /// 64-bit unsigned integer
    UnsignedLongLong,
    /// 64-bit signed size
    SSize,
    /// 64-bit unsigned size
    Size,
    /// IEEE 754 single precision
    Float,
    /// IEEE 754 double precision
    Double,
    /// Fixed-length byte string; count is the byte length
    CharArray,
    /// Byte string with a one-byte length prefix inside its fixed count
    PascalString,
    /// Raw pointer-sized word
    Pointer,
}

impl WireTag {
    /// Returns the struct-format code for this tag.
    pub fn code(&self) -> char {
        match self {
            WireTag::Pad => 'x',
            WireTag::Char => 'c',
            WireTag::SignedChar => 'b',
            WireTag::UnsignedChar => 'B',
            WireTag::Bool => '?',
            WireTag::Short => 'h',
            WireTag::UnsignedShort => 'H',
            WireTag::Int => 'i',
            WireTag::UnsignedInt => 'I',
            WireTag::Long => 'l',
            WireTag::UnsignedLong => 'L',
            WireTag::LongLong => 'q',
            WireTag::UnsignedLongLong => 'Q',
            WireTag::SSize => 'n',
            WireTag::Size => 'N',
            WireTag::Float => 'f',
            WireTag::Double => 'd',
            WireTag::CharArray => 's',
            WireTag::PascalString => 'p',
            WireTag::Pointer => 'P',
        }
    }

    /// Returns the byte width of one element of this tag.
    ///
    /// Byte strings report 0: their width comes from the field count or a
    /// length function.
    pub fn width(&self) -> usize {
        match self {
            WireTag::Pad
            | WireTag::Char
            | WireTag::SignedChar
            | WireTag::UnsignedChar
            | WireTag::Bool => 1,
            WireTag::Short | WireTag::UnsignedShort => 2,
            WireTag::Int
            | WireTag::UnsignedInt
            | WireTag::Long
            | WireTag::UnsignedLong
            | WireTag::Float => 4,
            WireTag::LongLong
            | WireTag::UnsignedLongLong
            | WireTag::SSize
            | WireTag::Size
            | WireTag::Double => 8,
            WireTag::CharArray | WireTag::PascalString => 0,
            WireTag::Pointer => std::mem::size_of::<usize>(),
        }
    }

    /// Width used when dividing a byte length into elements. Never zero.
    pub fn element_width(&self) -> usize {
        self.width().max(1)
    }

    /// Returns the semantic value type produced by decoding this tag.
    pub fn value_type(&self) -> ValueType {
        match self {
            WireTag::Pad => ValueType::None,
            WireTag::Char | WireTag::CharArray | WireTag::PascalString => ValueType::Bytes,
            WireTag::Bool => ValueType::Boolean,
            WireTag::Float | WireTag::Double => ValueType::Float,
            _ => ValueType::Integer,
        }
    }

    /// Returns the C type name this tag corresponds to.
    pub fn ctype(&self) -> &'static str {
        match self {
            WireTag::Pad => "pad byte",
            WireTag::Char => "char",
            WireTag::SignedChar => "signed char",
            WireTag::UnsignedChar => "unsigned char",
            WireTag::Bool => "_Bool",
            WireTag::Short => "short",
            WireTag::UnsignedShort => "unsigned short",
            WireTag::Int => "int",
            WireTag::UnsignedInt => "unsigned int",
            WireTag::Long => "long",
            WireTag::UnsignedLong => "unsigned long",
            WireTag::LongLong => "long long",
            WireTag::UnsignedLongLong => "unsigned long long",
            WireTag::SSize => "ssize_t",
            WireTag::Size => "size_t",
            WireTag::Float => "float",
            WireTag::Double => "double",
            WireTag::CharArray | WireTag::PascalString => "char[]",
            WireTag::Pointer => "void *",
        }
    }

    /// Returns `true` for signed integer tags.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            WireTag::SignedChar
                | WireTag::Short
                | WireTag::Int
                | WireTag::Long
                | WireTag::LongLong
                | WireTag::SSize
        )
    }

    /// Returns `true` if this tag decodes to bytes (and may carry text).
    pub fn is_bytes(&self) -> bool {
        self.value_type() == ValueType::Bytes
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ctype())
    }
}
