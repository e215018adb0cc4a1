//! Schema model: ordered field descriptors defining a struct's wire layout.

mod array;
mod dependent;
mod field;
pub(crate) mod validation;

use std::collections::HashMap;
use std::sync::Arc;

pub use array::ArrayField;
pub use dependent::{Count, Dependent, DependentFn};
pub use field::{Field, FieldKind, ValueShape};

use crate::codec;
use crate::cursor::ByteCursor;
use crate::error::{CodecError, SchemaError};
use crate::instance::StructInstance;
use crate::types::ByteOrder;

/// An immutable, shareable struct layout.
///
/// Cloning is cheap: all clones share one field list. Wire order is
/// declaration order, with inherited fields after the schema's own.
#[derive(Debug, Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

#[derive(Debug)]
struct SchemaInner {
    name: String,
    byte_order: ByteOrder,
    fields: Vec<Field>,
    /// Per-field value shapes, parallel to `fields`
    shapes: Vec<ValueShape>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Starts building a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Default byte order for fields without an override.
    pub fn byte_order(&self) -> ByteOrder {
        self.inner.byte_order
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[Field] {
        &self.inner.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.inner.fields[i])
    }

    /// Position of `name` in wire order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.index.get(name).copied()
    }

    /// Value shape of the field at `index`.
    pub fn shape(&self, index: usize) -> ValueShape {
        self.inner.shapes[index]
    }

    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Byte order for `field`: its override, else the schema default.
    pub fn resolve_byte_order(&self, field: &Field) -> ByteOrder {
        field.byte_order_override().unwrap_or(self.inner.byte_order)
    }

    /// Sum of static field widths.
    ///
    /// Dynamic fields contribute one byte, so this is an estimate and must
    /// not be used to size a decode. Saturates at `usize::MAX`.
    pub fn nominal_size(&self) -> usize {
        self.inner
            .fields
            .iter()
            .map(Field::nominal_size)
            .fold(0, usize::saturating_add)
    }

    /// Exact encoded size, when no field depends on decoded values.
    ///
    /// Saturates at `usize::MAX`; such a schema can never be packed.
    pub fn actual_size(&self) -> Option<usize> {
        self.inner
            .fields
            .iter()
            .map(Field::static_size)
            .try_fold(0usize, |acc, size| size.map(|s| acc.saturating_add(s)))
    }

    /// Struct-format string, e.g. `!2hl`.
    pub fn format(&self) -> String {
        format!("{}{}", self.inner.byte_order.token(), self.field_formats())
    }

    pub(crate) fn field_formats(&self) -> String {
        self.inner.fields.iter().map(Field::format).collect()
    }

    /// Creates an empty instance for building values to pack.
    pub fn instance(&self) -> StructInstance {
        StructInstance::new(self.clone())
    }

    /// Unpacks `data` with the default codec configuration.
    pub fn unpack<'a>(
        &self,
        data: &'a [u8],
    ) -> Result<(StructInstance, ByteCursor<'a>), CodecError> {
        codec::unpack(self, data)
    }

    /// Returns `true` if both handles share the same layout.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Append-only builder for [`Schema`].
///
/// # Example
/// ```
/// use binstruct_core::schema::{Field, Schema};
///
/// let schema = Schema::builder("VariableLengthString")
///     .field(Field::int("length"))
///     .field(Field::char_array("data").length_of("length").encoding(encoding_rs::UTF_8))
///     .build()
///     .unwrap();
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    byte_order: Option<ByteOrder>,
    fields: Vec<Field>,
    parent: Option<Schema>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_order: None,
            fields: Vec::new(),
            parent: None,
        }
    }

    /// Sets the default byte order. Unset, the parent's order is used, then
    /// network order.
    #[must_use]
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields in order.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Inherits `parent`'s fields, placed after this schema's own fields.
    /// Own fields replace parent fields of the same name.
    #[must_use]
    pub fn extends(mut self, parent: &Schema) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Validates the declaration and freezes it.
    pub fn build(self) -> Result<Schema, SchemaError> {
        validation::validate_unique_names(&self.name, &self.fields)?;
        for field in &self.fields {
            validation::validate_field_options(&self.name, field)?;
        }

        let byte_order = self
            .byte_order
            .or(self.parent.as_ref().map(Schema::byte_order))
            .unwrap_or_default();

        let mut fields = self.fields;
        if let Some(parent) = &self.parent {
            let own: Vec<String> = fields.iter().map(|f| f.name().to_string()).collect();
            fields.extend(
                parent
                    .fields()
                    .iter()
                    .filter(|f| !own.iter().any(|name| name == f.name()))
                    .cloned(),
            );
        }

        validation::validate_dependencies(&self.name, &fields)?;

        let shapes = fields.iter().map(ValueShape::of).collect();
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();

        tracing::debug!(
            "Built schema {} with {} fields ({})",
            self.name,
            fields.len(),
            byte_order
        );

        Ok(Schema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                byte_order,
                fields,
                shapes,
                index,
            }),
        })
    }
}
