//! Unpack: schema walk over a byte cursor.

use super::scalar::decode_elements;
use super::text::decode_text;
use super::{Codec, Site};
use crate::cursor::ByteCursor;
use crate::error::CodecError;
use crate::instance::StructInstance;
use crate::schema::{ArrayField, Count, Field, FieldKind, Schema, ValueShape};
use crate::types::{ByteOrder, Value, WireTag};

impl Codec {
    /// Decodes one struct; `default_order` applies to fields without an
    /// override.
    pub(super) fn unpack_struct(
        &self,
        schema: &Schema,
        cursor: &mut ByteCursor<'_>,
        default_order: ByteOrder,
        depth: usize,
    ) -> Result<StructInstance, CodecError> {
        self.check_depth(schema, depth)?;

        let mut instance = schema.instance();
        for (index, field) in schema.fields().iter().enumerate() {
            let start = cursor.offset();
            let order = field.byte_order_override().unwrap_or(default_order);
            let value = match field.kind() {
                FieldKind::Nested(inner) => {
                    let inner_order = field.byte_order_override().unwrap_or(inner.byte_order());
                    Value::Nested(self.unpack_struct(inner, cursor, inner_order, depth + 1)?)
                }
                FieldKind::Array(array) => {
                    self.unpack_array(&instance, field, *array, cursor, order)?
                }
                FieldKind::Scalar(tag) => self.unpack_scalar(
                    &instance,
                    schema.shape(index),
                    field,
                    *tag,
                    cursor,
                    order,
                )?,
            };
            tracing::trace!(
                "Decoded {}.{} at offset {} ({} bytes)",
                schema.name(),
                field.name(),
                start,
                cursor.offset() - start
            );
            instance.set_at(index, value);
        }
        Ok(instance)
    }

    /// Decodes a primitive field: fixed, counted, or length-dependent.
    fn unpack_scalar(
        &self,
        instance: &StructInstance,
        shape: ValueShape,
        field: &Field,
        tag: WireTag,
        cursor: &mut ByteCursor<'_>,
        order: ByteOrder,
    ) -> Result<Value, CodecError> {
        let site = Site {
            schema: instance.schema().name(),
            field: field.name(),
            offset: cursor.offset(),
        };
        let width = tag.element_width();

        // Byte length to consume, and whether a lone element unwraps to a scalar.
        let (byte_len, unwrap_single) = match (field.length_fn(), field.repeat_count()) {
            (Some(length), _) => {
                let total = length
                    .evaluate(instance)
                    .map_err(|e| e.in_field(field.name()))?;
                if total % width != 0 {
                    return Err(site.format(total, width));
                }
                (total, true)
            }
            (None, Count::Static(n)) => (n.saturating_mul(width), *n == 1),
            (None, Count::Dynamic(count)) => {
                let n = count
                    .evaluate(instance)
                    .map_err(|e| e.in_field(field.name()))?;
                (n.saturating_mul(width), false)
            }
        };
        self.check_len(&site, byte_len)?;

        let bytes = cursor.slice(byte_len).map_err(|e| site.underflow(e))?;

        Ok(match shape {
            ValueShape::Absent => {
                if bytes.iter().any(|b| *b != 0) {
                    return Err(site.malformed("padding holds non-zero bytes"));
                }
                Value::None
            }
            ValueShape::Bytes | ValueShape::Text => {
                let payload = if tag == WireTag::PascalString {
                    pascal_payload(bytes).map_err(|reason| site.malformed(reason))?
                } else {
                    bytes
                };
                match field.text_encoding() {
                    Some(encoding) => decode_text(payload, encoding),
                    None => Value::Bytes(payload.to_vec()),
                }
            }
            _ => {
                let mut items = decode_elements(tag, bytes, order.is_little_endian())
                    .map_err(|fault| site.malformed(fault.to_string()))?;
                if unwrap_single && items.len() == 1 {
                    items.remove(0)
                } else {
                    Value::Sequence(items)
                }
            }
        })
    }

    /// Decodes an array field into one flattened sequence.
    fn unpack_array(
        &self,
        instance: &StructInstance,
        field: &Field,
        array: ArrayField,
        cursor: &mut ByteCursor<'_>,
        order: ByteOrder,
    ) -> Result<Value, CodecError> {
        let site = Site {
            schema: instance.schema().name(),
            field: field.name(),
            offset: cursor.offset(),
        };
        let count = match field.repeat_count() {
            Count::Static(n) => *n,
            Count::Dynamic(count) => count
                .evaluate(instance)
                .map_err(|e| e.in_field(field.name()))?,
        };
        self.check_len(&site, count)?;
        let element_width = array.element_width();
        let total = match field.length_fn() {
            Some(length) => length
                .evaluate(instance)
                .map_err(|e| e.in_field(field.name()))?,
            None => count.saturating_mul(element_width),
        };
        self.check_len(&site, total)?;

        if count == 0 {
            return if total == 0 {
                Ok(Value::Sequence(Vec::new()))
            } else {
                Err(site.format(total, 0))
            };
        }
        if total % count != 0 {
            return Err(site.format(total, count));
        }
        let per_element = total / count;
        if per_element % element_width != 0 {
            return Err(site.format(per_element, element_width));
        }

        let element = array.element();
        let little = order.is_little_endian();
        let mut items = Vec::new();
        for _ in 0..count {
            let bytes = cursor.slice(per_element).map_err(|e| site.underflow(e))?;
            if element.is_bytes() {
                items.push(match array.encoding() {
                    Some(encoding) => decode_text(bytes, encoding),
                    None => Value::Bytes(bytes.to_vec()),
                });
            } else {
                items.extend(
                    decode_elements(element, bytes, little)
                        .map_err(|fault| site.malformed(fault.to_string()))?,
                );
            }
        }
        Ok(Value::Sequence(items))
    }
}

/// Strips the length prefix of a pascal string.
///
/// Only slots that pack back unchanged are accepted: the prefix must fit the
/// slot and every byte after the payload must be zero.
fn pascal_payload(slot: &[u8]) -> Result<&[u8], String> {
    let Some((&prefix, rest)) = slot.split_first() else {
        return Ok(slot);
    };
    let len = usize::from(prefix);
    if len > rest.len() {
        return Err(format!(
            "pascal prefix {} exceeds the {} bytes of its slot",
            len,
            rest.len()
        ));
    }
    let (payload, tail) = rest.split_at(len);
    if tail.iter().any(|b| *b != 0) {
        return Err("pascal string has non-zero bytes after its payload".to_string());
    }
    Ok(payload)
}
