//! Field descriptors.

use std::fmt;

use encoding_rs::Encoding;

use super::array::ArrayField;
use super::dependent::{Count, Dependent};
use super::Schema;
use crate::error::SchemaError;
use crate::types::{ByteOrder, ValueType, WireTag};

/// What a field holds on the wire.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// One or more elements of a primitive tag
    Scalar(WireTag),
    /// A dynamically counted run of elements
    Array(ArrayField),
    /// A nested struct
    Nested(Schema),
}

/// Shape of a field's value, fixed when the schema is built.
///
/// Packing dispatches on the shape instead of inspecting the runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// Padding; no value
    Absent,
    /// A single scalar
    Scalar,
    /// A sequence of scalars; length-dependent fields unwrap a single element
    Sequence,
    /// Raw bytes
    Bytes,
    /// Text, with raw bytes as the decode fallback
    Text,
    /// A nested struct instance
    Nested,
    /// A flattened array
    Array,
}

impl ValueShape {
    /// Derives the shape from a field declaration.
    pub fn of(field: &Field) -> Self {
        match &field.kind {
            FieldKind::Nested(_) => ValueShape::Nested,
            FieldKind::Array(_) => ValueShape::Array,
            FieldKind::Scalar(WireTag::Pad) => ValueShape::Absent,
            FieldKind::Scalar(tag) if tag.is_bytes() => {
                if field.encoding.is_some() {
                    ValueShape::Text
                } else {
                    ValueShape::Bytes
                }
            }
            FieldKind::Scalar(_) => match (&field.count, &field.length) {
                (Count::Static(1), None) => ValueShape::Scalar,
                _ => ValueShape::Sequence,
            },
        }
    }
}

/// Immutable description of one wire element.
///
/// Descriptors carry no values; decoded values live in a
/// [`StructInstance`](crate::instance::StructInstance), so one schema can
/// back any number of live instances.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    count: Count,
    length: Option<Dependent>,
    byte_order: Option<ByteOrder>,
    encoding: Option<&'static Encoding>,
}

macro_rules! scalar_constructors {
    ($($(#[$doc:meta])* $fn_name:ident => $tag:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(name: impl Into<String>) -> Self {
                Self::new(name, WireTag::$tag)
            }
        )*
    };
}

impl Field {
    /// Creates a field of `tag` with a count of one.
    pub fn new(name: impl Into<String>, tag: WireTag) -> Self {
        Self::with_kind(name, FieldKind::Scalar(tag))
    }

    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            count: Count::default(),
            length: None,
            byte_order: None,
            encoding: None,
        }
    }

    scalar_constructors! {
        /// Padding; decodes to nothing and encodes as zeros.
        pad => Pad,
        /// A single raw byte.
        char => Char,
        signed_char => SignedChar,
        unsigned_char => UnsignedChar,
        bool => Bool,
        short => Short,
        unsigned_short => UnsignedShort,
        int => Int,
        unsigned_int => UnsignedInt,
        long => Long,
        unsigned_long => UnsignedLong,
        long_long => LongLong,
        unsigned_long_long => UnsignedLongLong,
        ssize => SSize,
        size => Size,
        float => Float,
        double => Double,
        /// Byte string; the count is its length in bytes.
        char_array => CharArray,
        /// Byte string with a one-byte length prefix inside its count.
        pascal_string => PascalString,
        pointer => Pointer,
    }

    /// Creates a field holding a nested struct.
    pub fn nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::with_kind(name, FieldKind::Nested(schema))
    }

    /// Creates an array field; pair with [`count_fn`](Self::count_fn) and
    /// optionally [`length`](Self::length).
    pub fn array(name: impl Into<String>, array: impl Into<ArrayField>) -> Self {
        Self::with_kind(name, FieldKind::Array(array.into()))
    }

    /// Sets a fixed repetition count.
    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = Count::Static(count);
        self
    }

    /// Reads the repetition count from earlier fields.
    #[must_use]
    pub fn count_fn(mut self, count: Dependent) -> Self {
        self.count = Count::Dynamic(count);
        self
    }

    /// Shorthand for counting by the integer value of `field`.
    #[must_use]
    pub fn count_of(self, field: &str) -> Self {
        self.count_fn(Dependent::field(field))
    }

    /// Reads the total byte length from earlier fields.
    #[must_use]
    pub fn length(mut self, length: Dependent) -> Self {
        self.length = Some(length);
        self
    }

    /// Shorthand for a byte length equal to the integer value of `field`.
    #[must_use]
    pub fn length_of(self, field: &str) -> Self {
        self.length(Dependent::field(field))
    }

    /// Overrides the schema byte order for this field.
    #[must_use]
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    /// Decodes bytes as text in `encoding`. On arrays the encoding is
    /// forwarded to the elements.
    #[must_use]
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        match &mut self.kind {
            FieldKind::Array(array) => array.set_encoding(encoding),
            _ => self.encoding = Some(encoding),
        }
        self
    }

    /// Like [`encoding`](Self::encoding), resolving a WHATWG label such as
    /// `"utf-8"` or `"shift_jis"`.
    pub fn encoding_label(self, label: &str) -> Result<Self, SchemaError> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| SchemaError::UnknownEncoding(label.to_string()))?;
        Ok(self.encoding(encoding))
    }

    /// Returns a copy of this descriptor with a different fixed count.
    #[must_use]
    pub fn repeat(&self, count: usize) -> Self {
        self.clone().count(count)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the wire tag; arrays alias their element, nested structs
    /// have none.
    pub fn wire_tag(&self) -> Option<WireTag> {
        match &self.kind {
            FieldKind::Scalar(tag) => Some(*tag),
            FieldKind::Array(array) => Some(array.element()),
            FieldKind::Nested(_) => None,
        }
    }

    /// Byte width of one element (nominal size for nested structs).
    pub fn width(&self) -> usize {
        match &self.kind {
            FieldKind::Scalar(tag) => tag.width(),
            FieldKind::Array(array) => array.element_width(),
            FieldKind::Nested(schema) => schema.nominal_size(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            FieldKind::Scalar(tag) => tag.value_type(),
            FieldKind::Array(_) => ValueType::Sequence,
            FieldKind::Nested(_) => ValueType::NestedStruct,
        }
    }

    pub fn repeat_count(&self) -> &Count {
        &self.count
    }

    pub fn length_fn(&self) -> Option<&Dependent> {
        self.length.as_ref()
    }

    pub fn byte_order_override(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// Returns the text encoding, looking through arrays to their elements.
    pub fn text_encoding(&self) -> Option<&'static Encoding> {
        match &self.kind {
            FieldKind::Array(array) => array.encoding(),
            _ => self.encoding,
        }
    }

    /// Returns `true` for padding fields.
    pub fn is_padding(&self) -> bool {
        matches!(self.kind, FieldKind::Scalar(WireTag::Pad))
    }

    /// Returns `true` if the encoded size depends on earlier values.
    pub fn is_dynamic(&self) -> bool {
        self.length.is_some() || matches!(self.count, Count::Dynamic(_))
    }

    /// Names of the fields this field's length and count read.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps = Vec::new();
        if let Count::Dynamic(count) = &self.count {
            deps.extend(count.dependencies());
        }
        if let Some(length) = &self.length {
            deps.extend(length.dependencies());
        }
        deps
    }

    /// Best-effort static size; dynamic fields count as one byte.
    pub fn nominal_size(&self) -> usize {
        if let FieldKind::Nested(schema) = &self.kind {
            return schema.nominal_size();
        }
        match (&self.count, self.is_dynamic()) {
            (Count::Static(n), false) => n.saturating_mul(self.element_width()),
            _ => 1,
        }
    }

    /// Exact encoded size, if it does not depend on values.
    pub fn static_size(&self) -> Option<usize> {
        if let FieldKind::Nested(schema) = &self.kind {
            return schema.actual_size();
        }
        if self.is_dynamic() {
            return None;
        }
        self.count
            .as_static()
            .map(|n| n.saturating_mul(self.element_width()))
    }

    /// Struct-format fragment, e.g. `2H` or `6s`.
    pub fn format(&self) -> String {
        match &self.kind {
            FieldKind::Nested(schema) => schema.field_formats(),
            _ => {
                let count = match (&self.count, self.is_dynamic()) {
                    (Count::Static(n), false) => *n,
                    _ => 1,
                };
                let code = self.wire_tag().map(|t| t.code()).unwrap_or('?');
                format!("{}{}", count, code)
            }
        }
    }

    /// C type name, or the schema name for nested structs.
    pub fn ctype(&self) -> &str {
        match &self.kind {
            FieldKind::Scalar(tag) => tag.ctype(),
            FieldKind::Array(array) => array.element().ctype(),
            FieldKind::Nested(schema) => schema.name(),
        }
    }

    fn element_width(&self) -> usize {
        match &self.kind {
            FieldKind::Scalar(tag) => tag.element_width(),
            FieldKind::Array(array) => array.element_width(),
            FieldKind::Nested(schema) => schema.nominal_size(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.ctype(), self.nominal_size())
    }
}
