//! Pack: encodes an instance's values in schema order.

use std::borrow::Cow;

use encoding_rs::Encoding;

use super::scalar::encode_element;
use super::text::encode_text;
use super::{Codec, Site};
use crate::error::CodecError;
use crate::instance::StructInstance;
use crate::schema::{ArrayField, Count, Field, FieldKind, ValueShape};
use crate::types::{ByteOrder, Value, WireTag};

impl Codec {
    pub(super) fn pack_struct(
        &self,
        instance: &StructInstance,
        out: &mut Vec<u8>,
        default_order: ByteOrder,
        depth: usize,
    ) -> Result<(), CodecError> {
        let schema = instance.schema();
        self.check_depth(schema, depth)?;

        for (index, field) in schema.fields().iter().enumerate() {
            let start = out.len();
            let site = Site {
                schema: schema.name(),
                field: field.name(),
                offset: start,
            };
            let shape = schema.shape(index);

            if shape == ValueShape::Absent {
                let len = self.check_len(&site, declared_count(instance, field, &site)?)?;
                out.resize(start + len, 0);
                continue;
            }

            let value = instance.value_at(index).ok_or_else(|| site.missing())?;
            let little = field
                .byte_order_override()
                .unwrap_or(default_order)
                .is_little_endian();

            match (field.kind(), shape) {
                (FieldKind::Nested(inner), _) => {
                    let nested = match value {
                        Value::Nested(nested) => nested,
                        other => return Err(site.mismatch(inner.name(), other.kind_name())),
                    };
                    if nested.schema().name() != inner.name() {
                        return Err(site.mismatch(inner.name(), nested.schema().name()));
                    }
                    let inner_order = field.byte_order_override().unwrap_or(inner.byte_order());
                    self.pack_struct(nested, out, inner_order, depth + 1)?;
                }
                (FieldKind::Array(array), _) => {
                    self.pack_array(instance, field, *array, value, little, out, &site)?;
                }
                (FieldKind::Scalar(tag), ValueShape::Bytes | ValueShape::Text) => {
                    let raw = self.raw_bytes(value, field.text_encoding(), &site)?;
                    let len = self.check_len(&site, declared_count(instance, field, &site)?)?;
                    write_byte_string(*tag, &raw, len, out);
                }
                (FieldKind::Scalar(tag), _) => {
                    let items = match value {
                        Value::Sequence(items) => items.as_slice(),
                        single => std::slice::from_ref(single),
                    };
                    let expected = declared_count(instance, field, &site)?;
                    if items.len() != expected {
                        return Err(site.mismatch(
                            format!("{} elements", expected),
                            format!("{} elements", items.len()),
                        ));
                    }
                    for item in items {
                        encode_element(*tag, item, little, out)
                            .map_err(|fault| site.fault(*tag, item.kind_name(), fault))?;
                    }
                }
            }

            tracing::trace!(
                "Encoded {}.{} at offset {} ({} bytes)",
                schema.name(),
                field.name(),
                start,
                out.len() - start
            );
        }
        Ok(())
    }

    /// Writes an array from the sequence it holds; the count is re-derived
    /// from the sequence length.
    #[allow(clippy::too_many_arguments)]
    fn pack_array(
        &self,
        instance: &StructInstance,
        field: &Field,
        array: ArrayField,
        value: &Value,
        little: bool,
        out: &mut Vec<u8>,
        site: &Site<'_>,
    ) -> Result<(), CodecError> {
        let items = match value {
            Value::Sequence(items) => items,
            other => return Err(site.mismatch("sequence", other.kind_name())),
        };
        let element = array.element();

        if !element.is_bytes() {
            for item in items {
                encode_element(element, item, little, out)
                    .map_err(|fault| site.fault(element, item.kind_name(), fault))?;
            }
            return Ok(());
        }

        // Byte-string elements share the declared length evenly, if any.
        let per_element = match field.length_fn() {
            Some(length) if !items.is_empty() => {
                let total = length
                    .evaluate(instance)
                    .map_err(|e| e.in_field(field.name()))?;
                if total % items.len() != 0 {
                    return Err(site.format(total, items.len()));
                }
                Some(self.check_len(site, total)? / items.len())
            }
            _ => None,
        };
        for item in items {
            let raw = self.raw_bytes(item, array.encoding(), site)?;
            let len = per_element.unwrap_or(raw.len());
            write_byte_string(element, &raw, len, out);
        }
        Ok(())
    }

    /// Bytes for a byte-string value, encoding text when needed.
    fn raw_bytes<'v>(
        &self,
        value: &'v Value,
        encoding: Option<&'static Encoding>,
        site: &Site<'_>,
    ) -> Result<Cow<'v, [u8]>, CodecError> {
        match value {
            Value::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Value::Text(text) => {
                let encoding = encoding.unwrap_or(self.default_encoding);
                encode_text(text, encoding)
                    .map(Cow::Owned)
                    .ok_or_else(|| site.text_encode(encoding))
            }
            other => Err(site.mismatch("bytes or text", other.kind_name())),
        }
    }
}

/// Number of elements a primitive field occupies, evaluated against the
/// values being packed.
fn declared_count(
    instance: &StructInstance,
    field: &Field,
    site: &Site<'_>,
) -> Result<usize, CodecError> {
    if let Some(length) = field.length_fn() {
        let total = length
            .evaluate(instance)
            .map_err(|e| e.in_field(field.name()))?;
        let width = field.wire_tag().map_or(1, |tag| tag.element_width());
        if total % width != 0 {
            return Err(site.format(total, width));
        }
        return Ok(total / width);
    }
    match field.repeat_count() {
        Count::Static(n) => Ok(*n),
        Count::Dynamic(count) => count
            .evaluate(instance)
            .map_err(|e| e.in_field(field.name())),
    }
}

/// Writes `raw` into exactly `len` bytes, zero-padding or truncating.
///
/// Pascal strings spend the first byte on the length prefix.
fn write_byte_string(tag: WireTag, raw: &[u8], len: usize, out: &mut Vec<u8>) {
    let end = out.len() + len;
    if tag == WireTag::PascalString {
        if len == 0 {
            return;
        }
        let n = raw.len().min(len - 1).min(usize::from(u8::MAX));
        out.push(n as u8);
        out.extend_from_slice(&raw[..n]);
    } else {
        out.extend_from_slice(&raw[..raw.len().min(len)]);
    }
    out.resize(end, 0);
}
