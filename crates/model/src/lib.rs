//! BSON document model for befuddle.
//!
//! This crate splits raw BSON bytes into documents and projects a single
//! document level into named entries:
//! - `stream` - length-prefixed framing of mongodump-style buffers
//! - `codec` - one-level element walk yielding raw value spans
//! - `render` - scalar decoding and text rendering
//! - `projection` - container/scalar classification and file naming
//!
//! Values are [`bytes::Bytes`] slices of the buffer they were read from;
//! nothing is copied until a scalar is decoded.

pub mod codec;
pub mod error;
pub mod projection;
pub mod render;
pub mod stream;
pub mod value;

pub use codec::decode_elements;
pub use error::DecodeError;
pub use projection::{project_container, project_field, project_fields, Projected};
pub use render::{render_bson, render_scalar};
pub use stream::{decode_single, decode_stream};
pub use value::{ElementType, NamedValue, TypedValue};
