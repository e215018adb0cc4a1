//! Byte-order selection for schemas and individual fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Byte ordering used when encoding multi-byte scalars.
///
/// The five variants mirror the classic struct-format tokens. `Native` and
/// `StandardNative` both follow the host endianness; neither inserts
/// alignment padding, so every tag keeps its standard width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Host order (`@`)
    Native,
    /// Host order with standard sizes (`=`)
    StandardNative,
    /// Little-endian (`<`)
    LittleEndian,
    /// Big-endian (`>`)
    BigEndian,
    /// Network order, big-endian (`!`)
    #[default]
    Network,
}

impl ByteOrder {
    /// Returns the struct-format token for this byte order.
    pub fn token(&self) -> char {
        match self {
            ByteOrder::Native => '@',
            ByteOrder::StandardNative => '=',
            ByteOrder::LittleEndian => '<',
            ByteOrder::BigEndian => '>',
            ByteOrder::Network => '!',
        }
    }

    /// Returns `true` if scalars are laid out least-significant byte first.
    pub fn is_little_endian(&self) -> bool {
        match self {
            ByteOrder::Native | ByteOrder::StandardNative => cfg!(target_endian = "little"),
            ByteOrder::LittleEndian => true,
            ByteOrder::BigEndian | ByteOrder::Network => false,
        }
    }
}

impl FromStr for ByteOrder {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@" | "native" => Ok(ByteOrder::Native),
            "=" | "standard_native" => Ok(ByteOrder::StandardNative),
            "<" | "little_endian" => Ok(ByteOrder::LittleEndian),
            ">" | "big_endian" => Ok(ByteOrder::BigEndian),
            "!" | "network" => Ok(ByteOrder::Network),
            other => Err(SchemaError::UnknownByteOrder(other.to_string())),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
