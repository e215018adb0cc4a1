//! Struct instances: per-instance value storage for one schema.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::codec;
use crate::error::CodecError;
use crate::schema::Schema;
use crate::types::Value;

/// Values decoded from, or destined for, one schema's layout.
///
/// Values are stored by field position and owned by the instance; the
/// shared [`Schema`] is never written to.
#[derive(Debug, Clone)]
pub struct StructInstance {
    schema: Schema,
    values: Vec<Option<Value>>,
}

impl StructInstance {
    /// Creates an instance with every field unset.
    pub fn new(schema: Schema) -> Self {
        let values = vec![None; schema.len()];
        Self { schema, values }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .index_of(name)
            .and_then(|i| self.values[i].as_ref())
    }

    /// Returns the value of `name`, failing if it is not populated yet.
    ///
    /// Meant for length and count functions, which run while the instance
    /// is only partly decoded.
    pub fn require(&self, name: &str) -> Result<&Value, CodecError> {
        self.get(name).ok_or_else(|| CodecError::DependencyOrder {
            schema: self.schema.name().to_string(),
            field: String::new(),
            dependency: name.to_string(),
        })
    }

    /// Returns the value of `name` as a non-negative length or count.
    pub fn usize_of(&self, name: &str) -> Result<usize, CodecError> {
        let value = self.require(name)?;
        value.as_usize().ok_or_else(|| CodecError::TypeMismatch {
            schema: self.schema.name().to_string(),
            field: String::new(),
            offset: 0,
            expected: format!("non-negative integer in '{}'", name),
            got: value.kind_name().to_string(),
        })
    }

    /// Stores `value` for `name`, returning the previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>, CodecError> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| CodecError::UnknownField {
                schema: self.schema.name().to_string(),
                field: name.to_string(),
            })?;
        Ok(self.values[index].replace(value.into()))
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, CodecError> {
        self.set(name, value)?;
        Ok(self)
    }

    pub(crate) fn set_at(&mut self, index: usize, value: Value) {
        self.values[index] = Some(value);
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&Value> {
        self.values[index].as_ref()
    }

    /// Iterates populated fields in wire order, skipping padding.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(field, _)| !field.is_padding())
            .filter_map(|(field, value)| value.as_ref().map(|v| (field.name(), v)))
    }

    /// Encodes this instance with the default codec configuration.
    pub fn pack(&self) -> Result<Vec<u8>, CodecError> {
        codec::pack(self)
    }

    /// Length of the encoded form, computed from the current values.
    pub fn encoded_len(&self) -> Result<usize, CodecError> {
        self.pack().map(|bytes| bytes.len())
    }

    /// Renders populated fields as JSON, for inspection and logging.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl PartialEq for StructInstance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl Serialize for StructInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
