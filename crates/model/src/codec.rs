//! One-level element codec.
//!
//! Walks the elements of a single document or array with the `bson` raw
//! iterator and hands back each element's name, type and raw value span.
//! Scalars are decoded as they are walked; nested containers are returned
//! as opaque spans and nothing below the first level is inspected.

use bson::raw::{RawBsonRef, RawDocument, RawElement};
use bson::Bson;
use bytes::Bytes;

use crate::error::DecodeError;
use crate::render::decode_scalar;
use crate::value::{ElementType, NamedValue, TypedValue};

/// Decode the top level of a document or array.
///
/// # Arguments
/// * `raw` - Complete container bytes, length prefix through terminator
///
/// # Returns
/// The container's elements in encoded order, duplicates included.
pub fn decode_elements(raw: &Bytes) -> Result<Vec<NamedValue>, DecodeError> {
    let doc: &RawDocument = RawDocument::from_bytes(raw.as_ref())
        .map_err(|e| DecodeError::malformed(0, e.to_string()))?;

    let mut fields: Vec<NamedValue> = Vec::new();
    // Offset of the next element's type tag.
    let mut pos: usize = 4;
    for element in doc.iter_elements() {
        let element: RawElement<'_> = element.map_err(|e| element_error(raw, pos, e))?;
        let name: &str = element.key();
        let tag: u8 = element.element_type() as u8;
        let kind: ElementType = ElementType::from_tag(tag).ok_or_else(|| {
            DecodeError::UnsupportedType {
                field: name.to_string(),
                tag,
            }
        })?;

        let value_start: usize = pos + 1 + name.len() + 1;
        let value_end: usize = value_start + element.len();
        let span: Bytes = raw.slice(value_start..value_end);

        let value: TypedValue = if kind.is_container() {
            TypedValue::new(kind, span)
        } else {
            let value_ref: RawBsonRef<'_> =
                element.value().map_err(|source| DecodeError::Scalar {
                    field: name.to_string(),
                    source,
                })?;
            let decoded: Bson = decode_scalar(name, value_ref)?;
            TypedValue::scalar(kind, span, decoded)
        };

        fields.push(NamedValue::new(name, value));
        pos = value_end;
    }

    Ok(fields)
}

/// Classify an iteration failure for the element whose tag sits at `pos`.
///
/// Tags outside the known set become [`DecodeError::UnsupportedType`];
/// everything else is a structural problem with the container.
fn element_error(raw: &[u8], pos: usize, err: bson::raw::Error) -> DecodeError {
    match raw.get(pos).copied() {
        Some(tag) if tag != 0 && ElementType::from_tag(tag).is_none() => {
            DecodeError::UnsupportedType {
                field: err.key().unwrap_or_default().to_string(),
                tag,
            }
        }
        _ => DecodeError::malformed(pos, err.to_string()),
    }
}
