//! Typed value model.
//!
//! A [`TypedValue`] pairs a BSON element type with the raw bytes of the
//! element's value. The bytes are a [`Bytes`] slice of the buffer the value
//! was decoded from, so nested containers share storage with the root
//! buffer and are only walked when someone asks for their fields. Scalars
//! also carry their decoded [`Bson`] form.

use bson::Bson;
use bytes::Bytes;

/// BSON element type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Double,
    String,
    Document,
    Array,
    Binary,
    Undefined,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    RegularExpression,
    DbPointer,
    JavaScriptCode,
    Symbol,
    JavaScriptCodeWithScope,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
}

impl ElementType {
    /// Map a wire tag to an element type.
    ///
    /// # Returns
    /// `None` for tags this codec has no rule for.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let kind: ElementType = match tag {
            0x01 => ElementType::Double,
            0x02 => ElementType::String,
            0x03 => ElementType::Document,
            0x04 => ElementType::Array,
            0x05 => ElementType::Binary,
            0x06 => ElementType::Undefined,
            0x07 => ElementType::ObjectId,
            0x08 => ElementType::Boolean,
            0x09 => ElementType::DateTime,
            0x0A => ElementType::Null,
            0x0B => ElementType::RegularExpression,
            0x0C => ElementType::DbPointer,
            0x0D => ElementType::JavaScriptCode,
            0x0E => ElementType::Symbol,
            0x0F => ElementType::JavaScriptCodeWithScope,
            0x10 => ElementType::Int32,
            0x11 => ElementType::Timestamp,
            0x12 => ElementType::Int64,
            0x13 => ElementType::Decimal128,
            0xFF => ElementType::MinKey,
            0x7F => ElementType::MaxKey,
            _ => return None,
        };
        Some(kind)
    }

    /// The wire tag for this element type.
    pub fn tag(self) -> u8 {
        match self {
            ElementType::Double => 0x01,
            ElementType::String => 0x02,
            ElementType::Document => 0x03,
            ElementType::Array => 0x04,
            ElementType::Binary => 0x05,
            ElementType::Undefined => 0x06,
            ElementType::ObjectId => 0x07,
            ElementType::Boolean => 0x08,
            ElementType::DateTime => 0x09,
            ElementType::Null => 0x0A,
            ElementType::RegularExpression => 0x0B,
            ElementType::DbPointer => 0x0C,
            ElementType::JavaScriptCode => 0x0D,
            ElementType::Symbol => 0x0E,
            ElementType::JavaScriptCodeWithScope => 0x0F,
            ElementType::Int32 => 0x10,
            ElementType::Timestamp => 0x11,
            ElementType::Int64 => 0x12,
            ElementType::Decimal128 => 0x13,
            ElementType::MinKey => 0xFF,
            ElementType::MaxKey => 0x7F,
        }
    }

    /// Short label appended to scalar file names (`<field>.<label>`).
    pub fn label(self) -> &'static str {
        match self {
            ElementType::Double => "float64",
            ElementType::String => "utf8",
            ElementType::Document => "document",
            ElementType::Array => "array",
            ElementType::Binary => "binary",
            ElementType::ObjectId => "oid",
            ElementType::Boolean => "bool",
            ElementType::DateTime => "datetime",
            ElementType::Null => "null",
            ElementType::RegularExpression => "regex",
            ElementType::DbPointer => "dbpointer",
            ElementType::JavaScriptCode => "js",
            ElementType::Int32 => "int32",
            ElementType::Timestamp => "timestamp",
            ElementType::Int64 => "int64",
            ElementType::Decimal128 => "decimal128",
            ElementType::MinKey => "minkey",
            ElementType::MaxKey => "maxkey",
            ElementType::Undefined
            | ElementType::Symbol
            | ElementType::JavaScriptCodeWithScope => "deprecated",
        }
    }

    /// Embedded documents and arrays project to directories.
    pub fn is_container(self) -> bool {
        matches!(self, ElementType::Document | ElementType::Array)
    }
}

/// A single BSON value: its element type plus the raw value bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    kind: ElementType,
    raw: Bytes,
    /// Decoded form; `None` for containers.
    scalar: Option<Bson>,
}

impl TypedValue {
    /// Wrap raw value bytes.
    ///
    /// # Arguments
    /// * `kind` - Element type the bytes are encoded as
    /// * `raw` - Value bytes, without the tag or field name
    pub fn new(kind: ElementType, raw: Bytes) -> Self {
        Self {
            kind,
            raw,
            scalar: None,
        }
    }

    /// Wrap a scalar's raw bytes together with its decoded value.
    ///
    /// # Arguments
    /// * `kind` - Element type the bytes are encoded as
    /// * `raw` - Value bytes, without the tag or field name
    /// * `decoded` - The value as decoded by the codec
    pub fn scalar(kind: ElementType, raw: Bytes, decoded: Bson) -> Self {
        Self {
            kind,
            raw,
            scalar: Some(decoded),
        }
    }

    /// Wrap a complete embedded document.
    pub fn document(raw: Bytes) -> Self {
        Self::new(ElementType::Document, raw)
    }

    pub fn kind(&self) -> ElementType {
        self.kind
    }

    /// The raw value bytes.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// The decoded scalar, if this value is one.
    pub fn decoded(&self) -> Option<&Bson> {
        self.scalar.as_ref()
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }
}

/// A field name paired with its value.
///
/// Names are not unique within a document; duplicates are kept as separate
/// entries in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: TypedValue,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: TypedValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_for_known_tags() {
        for tag in 0u8..=0xFF {
            if let Some(kind) = ElementType::from_tag(tag) {
                assert_eq!(kind.tag(), tag);
            }
        }
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(ElementType::from_tag(0x00), None);
        assert_eq!(ElementType::from_tag(0x14), None);
        assert_eq!(ElementType::from_tag(0x80), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ElementType::Int32.label(), "int32");
        assert_eq!(ElementType::String.label(), "utf8");
        assert_eq!(ElementType::ObjectId.label(), "oid");
        assert_eq!(ElementType::Symbol.label(), "deprecated");
        assert_eq!(ElementType::MinKey.label(), "minkey");
    }

    #[test]
    fn test_container_classification() {
        assert!(ElementType::Document.is_container());
        assert!(ElementType::Array.is_container());
        assert!(!ElementType::Binary.is_container());
        assert!(!ElementType::JavaScriptCodeWithScope.is_container());
    }
}
