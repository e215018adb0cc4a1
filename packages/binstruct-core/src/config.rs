//! Codec configuration.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum depth of nested structs (default: 32)
    pub max_depth: usize,
    /// Largest byte length or element count one field may declare
    /// (default: 64 MiB)
    pub max_field_len: usize,
    /// Fail a top-level unpack that leaves input unread (default: false)
    pub reject_trailing_bytes: bool,
    /// Encoding for text values on fields without one (default: "utf-8")
    pub default_encoding: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_field_len: 64 * 1024 * 1024,
            reject_trailing_bytes: false,
            default_encoding: "utf-8".to_string(),
        }
    }
}

impl CodecConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidConfig(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration and resolves the default encoding.
    pub fn validate(&self) -> Result<&'static Encoding, CodecError> {
        if self.max_depth == 0 {
            return Err(CodecError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_field_len == 0 {
            return Err(CodecError::InvalidConfig(
                "max_field_len must be at least 1".to_string(),
            ));
        }
        Encoding::for_label(self.default_encoding.as_bytes()).ok_or_else(|| {
            CodecError::InvalidConfig(format!(
                "unknown default encoding '{}'",
                self.default_encoding
            ))
        })
    }
}
