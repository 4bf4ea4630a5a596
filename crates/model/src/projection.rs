//! Document projection.
//!
//! Turns a container's fields into directory and file entries: embedded
//! documents and arrays stay as opaque containers under their field name,
//! every other value is rendered into file content named
//! `<field>.<type label>`.

use bytes::Bytes;

use crate::codec::decode_elements;
use crate::error::DecodeError;
use crate::render::render_scalar;
use crate::value::{NamedValue, TypedValue};

/// A single projected field.
#[derive(Debug, Clone, PartialEq)]
pub enum Projected {
    /// Nested document or array; decoded later, on demand.
    Container { name: String, value: TypedValue },
    /// Rendered scalar.
    Scalar { name: String, content: Bytes },
}

impl Projected {
    /// The exposed entry name.
    pub fn name(&self) -> &str {
        match self {
            Projected::Container { name, .. } | Projected::Scalar { name, .. } => name,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Projected::Container { .. })
    }
}

/// Project one field.
pub fn project_field(field: &NamedValue) -> Result<Projected, DecodeError> {
    if field.value.is_container() {
        return Ok(Projected::Container {
            name: field.name.clone(),
            value: field.value.clone(),
        });
    }

    let content: Vec<u8> = render_scalar(&field.name, &field.value)?;
    Ok(Projected::Scalar {
        name: format!("{}.{}", field.name, field.value.kind().label()),
        content: Bytes::from(content),
    })
}

/// Project a field list, keeping document order and duplicate names.
///
/// # Returns
/// One entry per field, or the first error hit.
pub fn project_fields(fields: &[NamedValue]) -> Result<Vec<Projected>, DecodeError> {
    fields.iter().map(project_field).collect()
}

/// Decode one level of a container and project its fields.
///
/// # Arguments
/// * `container` - Embedded document or array value
///
/// # Returns
/// The decoded fields together with their projections.
pub fn project_container(
    container: &TypedValue,
) -> Result<(Vec<NamedValue>, Vec<Projected>), DecodeError> {
    if !container.is_container() {
        return Err(DecodeError::malformed(
            0,
            format!("{:?} value is not a container", container.kind()),
        ));
    }
    let fields: Vec<NamedValue> = decode_elements(container.raw())?;
    let projected: Vec<Projected> = project_fields(&fields)?;
    Ok((fields, projected))
}
