//! Codec and schema error types.

use thiserror::Error;

use crate::types::WireTag;

/// Errors raised by [`ByteCursor`](crate::cursor::ByteCursor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// Slice requested past the end of the buffer
    #[error("Underflow at offset {offset}: requested {requested} bytes, {remaining} remaining")]
    Underflow {
        offset: usize,
        requested: usize,
        remaining: usize,
    },
}

/// Errors raised while packing or unpacking a struct.
///
/// Every variant names the schema and field involved so a failure deep in a
/// nested layout can be traced back to its declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer ended before the field could be read
    #[error("Underflow in '{schema}.{field}' at offset {offset}: requested {requested} bytes, {remaining} remaining")]
    Underflow {
        schema: String,
        field: String,
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    /// Dynamic length does not divide into whole elements
    #[error("Format error in '{schema}.{field}' at offset {offset}: {length} bytes not divisible by {divisor}")]
    Format {
        schema: String,
        field: String,
        offset: usize,
        length: usize,
        divisor: usize,
    },

    /// Bytes that would not pack back unchanged
    #[error("Malformed '{schema}.{field}' at offset {offset}: {reason}")]
    Malformed {
        schema: String,
        field: String,
        offset: usize,
        reason: String,
    },

    /// Declared length or count exceeds the configured limit
    #[error("Length {length} of '{schema}.{field}' at offset {offset} exceeds limit {limit}")]
    LengthLimit {
        schema: String,
        field: String,
        offset: usize,
        length: usize,
        limit: usize,
    },

    /// Length or count function read a field that is not populated yet
    #[error("Field '{schema}.{field}' depends on '{dependency}', which is not populated")]
    DependencyOrder {
        schema: String,
        field: String,
        dependency: String,
    },

    /// Stored value does not match the field's declared shape
    #[error("Type mismatch in '{schema}.{field}' at offset {offset}: expected {expected}, got {got}")]
    TypeMismatch {
        schema: String,
        field: String,
        offset: usize,
        expected: String,
        got: String,
    },

    /// Numeric value does not fit the wire tag
    #[error("Value {value} out of range for {tag} in '{schema}.{field}' at offset {offset}")]
    ValueOutOfRange {
        schema: String,
        field: String,
        offset: usize,
        value: String,
        tag: WireTag,
    },

    /// Field has no value at pack time
    #[error("Field '{schema}.{field}' has no value to pack")]
    MissingValue { schema: String, field: String },

    /// Field name not declared in the schema
    #[error("Field '{field}' not found in schema '{schema}'")]
    UnknownField { schema: String, field: String },

    /// Text cannot be represented in the field's encoding
    #[error("Cannot encode text of '{schema}.{field}' as {encoding}")]
    TextEncode {
        schema: String,
        field: String,
        encoding: String,
    },

    /// Nested structs exceed the configured depth
    #[error("Nesting depth {depth} exceeds limit {limit} in '{schema}'")]
    NestingTooDeep {
        schema: String,
        depth: usize,
        limit: usize,
    },

    /// Input left over after a top-level unpack
    #[error("{remaining} trailing bytes after '{schema}' at offset {offset}")]
    TrailingBytes {
        schema: String,
        offset: usize,
        remaining: usize,
    },

    /// Codec configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Underflow,
    Format,
    Malformed,
    LengthLimit,
    DependencyOrder,
    TypeMismatch,
    ValueOutOfRange,
    MissingValue,
    UnknownField,
    TextEncode,
    NestingTooDeep,
    TrailingBytes,
    InvalidConfig,
}

impl CodecError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Underflow { .. } => ErrorKind::Underflow,
            CodecError::Format { .. } => ErrorKind::Format,
            CodecError::Malformed { .. } => ErrorKind::Malformed,
            CodecError::LengthLimit { .. } => ErrorKind::LengthLimit,
            CodecError::DependencyOrder { .. } => ErrorKind::DependencyOrder,
            CodecError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CodecError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
            CodecError::MissingValue { .. } => ErrorKind::MissingValue,
            CodecError::UnknownField { .. } => ErrorKind::UnknownField,
            CodecError::TextEncode { .. } => ErrorKind::TextEncode,
            CodecError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            CodecError::TrailingBytes { .. } => ErrorKind::TrailingBytes,
            CodecError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// Attaches a requesting field name to errors raised without one.
    ///
    /// Errors produced inside a user length or count function only know the
    /// field they tried to read; the codec fills in the field being decoded.
    pub(crate) fn in_field(mut self, name: &str) -> Self {
        match &mut self {
            CodecError::DependencyOrder { field, .. } | CodecError::TypeMismatch { field, .. }
                if field.is_empty() =>
            {
                *field = name.to_string();
            }
            _ => {}
        }
        self
    }

    pub(crate) fn underflow(schema: &str, field: &str, source: CursorError) -> Self {
        let CursorError::Underflow {
            offset,
            requested,
            remaining,
        } = source;
        CodecError::Underflow {
            schema: schema.to_string(),
            field: field.to_string(),
            offset,
            requested,
            remaining,
        }
    }
}

/// Errors raised while building a [`Schema`](crate::schema::Schema).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two own fields share a name
    #[error("Field '{field}' already exists in schema '{schema}'")]
    DuplicateField { schema: String, field: String },

    /// Length or count function references a field the schema lacks
    #[error("Field '{field}' in schema '{schema}' depends on unknown field '{dependency}'")]
    UnknownDependency {
        schema: String,
        field: String,
        dependency: String,
    },

    /// Length or count function references a later field
    #[error("Field '{field}' in schema '{schema}' depends on '{dependency}', which is declared after it")]
    ForwardDependency {
        schema: String,
        field: String,
        dependency: String,
    },

    /// Field configuration is contradictory
    #[error("Field '{field}' in schema '{schema}' is invalid: {reason}")]
    InvalidField {
        schema: String,
        field: String,
        reason: String,
    },

    /// Encoding label not recognised
    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),

    /// Byte-order token not recognised
    #[error("Unknown byte order '{0}'")]
    UnknownByteOrder(String),
}
