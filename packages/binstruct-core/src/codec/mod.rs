//! Codec engine: walks a schema against a byte cursor to unpack and pack.

mod pack;
mod scalar;
mod text;
mod unpack;

use encoding_rs::Encoding;

use crate::config::CodecConfig;
use crate::cursor::ByteCursor;
use crate::error::{CodecError, CursorError};
use crate::instance::StructInstance;
use crate::schema::Schema;
use crate::types::WireTag;
use scalar::EncodeFault;

/// Packs and unpacks struct instances under one configuration.
///
/// A codec holds no per-call state; one value can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Codec {
    config: CodecConfig,
    default_encoding: &'static Encoding,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            config: CodecConfig::default(),
            default_encoding: encoding_rs::UTF_8,
        }
    }
}

impl Codec {
    /// Creates a codec, validating `config`.
    pub fn new(config: CodecConfig) -> Result<Self, CodecError> {
        let default_encoding = config.validate()?;
        Ok(Self {
            config,
            default_encoding,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Unpacks `data` from its start.
    ///
    /// Returns the populated instance and the cursor advanced past it.
    pub fn unpack<'a>(
        &self,
        schema: &Schema,
        data: &'a [u8],
    ) -> Result<(StructInstance, ByteCursor<'a>), CodecError> {
        let (instance, cursor) = self.unpack_from(schema, ByteCursor::new(data))?;
        if self.config.reject_trailing_bytes && !cursor.is_exhausted() {
            return Err(CodecError::TrailingBytes {
                schema: schema.name().to_string(),
                offset: cursor.offset(),
                remaining: cursor.remaining(),
            });
        }
        Ok((instance, cursor))
    }

    /// Unpacks starting at `cursor`'s position, for decoding several structs
    /// from one buffer.
    pub fn unpack_from<'a>(
        &self,
        schema: &Schema,
        mut cursor: ByteCursor<'a>,
    ) -> Result<(StructInstance, ByteCursor<'a>), CodecError> {
        let start = cursor.offset();
        let instance = self.unpack_struct(schema, &mut cursor, schema.byte_order(), 0)?;
        tracing::debug!(
            "Unpacked {} from offset {} ({} bytes)",
            schema.name(),
            start,
            cursor.offset() - start
        );
        Ok((instance, cursor))
    }

    /// Encodes `instance` in schema order.
    pub fn pack(&self, instance: &StructInstance) -> Result<Vec<u8>, CodecError> {
        let schema = instance.schema();
        let capacity = schema.nominal_size().min(self.config.max_field_len);
        let mut out = Vec::with_capacity(capacity);
        self.pack_struct(instance, &mut out, schema.byte_order(), 0)?;
        tracing::debug!("Packed {} ({} bytes)", schema.name(), out.len());
        Ok(out)
    }

    /// Rejects a declared length or count above `max_field_len`.
    fn check_len(&self, site: &Site<'_>, length: usize) -> Result<usize, CodecError> {
        if length > self.config.max_field_len {
            return Err(CodecError::LengthLimit {
                schema: site.schema.to_string(),
                field: site.field.to_string(),
                offset: site.offset,
                length,
                limit: self.config.max_field_len,
            });
        }
        Ok(length)
    }

    fn check_depth(&self, schema: &Schema, depth: usize) -> Result<(), CodecError> {
        if depth > self.config.max_depth {
            return Err(CodecError::NestingTooDeep {
                schema: schema.name().to_string(),
                depth,
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }
}

/// Unpacks `data` with the default configuration.
pub fn unpack<'a>(
    schema: &Schema,
    data: &'a [u8],
) -> Result<(StructInstance, ByteCursor<'a>), CodecError> {
    Codec::default().unpack(schema, data)
}

/// Unpacks from `cursor` with the default configuration.
pub fn unpack_from<'a>(
    schema: &Schema,
    cursor: ByteCursor<'a>,
) -> Result<(StructInstance, ByteCursor<'a>), CodecError> {
    Codec::default().unpack_from(schema, cursor)
}

/// Packs `instance` with the default configuration.
pub fn pack(instance: &StructInstance) -> Result<Vec<u8>, CodecError> {
    Codec::default().pack(instance)
}

/// Where an error happened: schema, field and byte offset.
struct Site<'s> {
    schema: &'s str,
    field: &'s str,
    offset: usize,
}

impl Site<'_> {
    fn underflow(&self, source: CursorError) -> CodecError {
        CodecError::underflow(self.schema, self.field, source)
    }

    fn format(&self, length: usize, divisor: usize) -> CodecError {
        CodecError::Format {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
            offset: self.offset,
            length,
            divisor,
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> CodecError {
        CodecError::Malformed {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn mismatch(&self, expected: impl Into<String>, got: impl Into<String>) -> CodecError {
        CodecError::TypeMismatch {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
            offset: self.offset,
            expected: expected.into(),
            got: got.into(),
        }
    }

    fn missing(&self) -> CodecError {
        CodecError::MissingValue {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
        }
    }

    fn text_encode(&self, encoding: &'static Encoding) -> CodecError {
        CodecError::TextEncode {
            schema: self.schema.to_string(),
            field: self.field.to_string(),
            encoding: encoding.name().to_string(),
        }
    }

    fn fault(&self, tag: WireTag, got: &str, fault: EncodeFault) -> CodecError {
        match fault {
            EncodeFault::Mismatch { expected } => self.mismatch(expected, got),
            EncodeFault::OutOfRange(value) => CodecError::ValueOutOfRange {
                schema: self.schema.to_string(),
                field: self.field.to_string(),
                offset: self.offset,
                value,
                tag,
            },
        }
    }
}
