//! Build-time checks for schema declarations.

use std::collections::{HashMap, HashSet};

use super::dependent::{Count, Dependent};
use super::field::{Field, FieldKind};
use crate::error::SchemaError;
use crate::types::{ValueType, WireTag};

/// Validates that own field names are unique.
pub(crate) fn validate_unique_names(schema: &str, fields: &[Field]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name()) {
            return Err(SchemaError::DuplicateField {
                schema: schema.to_string(),
                field: field.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Validates that a field's options do not contradict each other.
pub(crate) fn validate_field_options(schema: &str, field: &Field) -> Result<(), SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidField {
        schema: schema.to_string(),
        field: field.name().to_string(),
        reason: reason.to_string(),
    };

    match field.kind() {
        FieldKind::Nested(_) => {
            if field.is_dynamic() || field.repeat_count().as_static() != Some(1) {
                return Err(invalid("nested structs cannot be repeated or length-dependent"));
            }
        }
        FieldKind::Array(array) => {
            if array.element() == WireTag::Pad {
                return Err(invalid("array elements cannot be padding"));
            }
            if array.element() == WireTag::PascalString {
                return Err(invalid("array elements cannot be pascal strings"));
            }
            if array.encoding().is_some() && !array.element().is_bytes() {
                return Err(invalid("text encoding requires a bytes element"));
            }
        }
        FieldKind::Scalar(tag) => {
            if matches!(field.repeat_count(), Count::Dynamic(_)) && field.length_fn().is_some() {
                return Err(invalid("count function and length function are exclusive"));
            }
            if field.text_encoding().is_some() && !tag.is_bytes() {
                return Err(invalid("text encoding requires a bytes field"));
            }
        }
    }
    Ok(())
}

/// Validates that every length and count source reads an earlier integer
/// field.
///
/// `fields` is the full wire-ordered list, inherited fields included.
pub(crate) fn validate_dependencies(schema: &str, fields: &[Field]) -> Result<(), SchemaError> {
    let positions: HashMap<&str, usize> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name(), i))
        .collect();

    for (index, field) in fields.iter().enumerate() {
        for dependency in field.dependencies() {
            let Some(&target) = positions.get(dependency) else {
                return Err(SchemaError::UnknownDependency {
                    schema: schema.to_string(),
                    field: field.name().to_string(),
                    dependency: dependency.to_string(),
                });
            };
            if target >= index {
                return Err(SchemaError::ForwardDependency {
                    schema: schema.to_string(),
                    field: field.name().to_string(),
                    dependency: dependency.to_string(),
                });
            }
        }

        // A direct field reference must point at a single integer.
        let direct = [
            match field.repeat_count() {
                Count::Dynamic(Dependent::Field(name)) => Some(name),
                _ => None,
            },
            match field.length_fn() {
                Some(Dependent::Field(name)) => Some(name),
                _ => None,
            },
        ];
        for name in direct.into_iter().flatten() {
            let target = &fields[positions[name.as_str()]];
            let single = !target.is_dynamic() && target.repeat_count().as_static() == Some(1);
            if target.value_type() != ValueType::Integer || !single {
                return Err(SchemaError::InvalidField {
                    schema: schema.to_string(),
                    field: field.name().to_string(),
                    reason: format!("'{}' is not a single integer field", name),
                });
            }
        }
    }
    Ok(())
}
