//! Scalar decoding and text rendering.

use bson::raw::RawBsonRef;
use bson::Bson;

use crate::error::DecodeError;
use crate::value::TypedValue;

/// Decode a scalar from the codec's borrowed view into a generic [`Bson`].
///
/// # Arguments
/// * `field` - Field name, used for error reporting
/// * `value` - Borrowed value as yielded by the raw element walk
pub fn decode_scalar(field: &str, value: RawBsonRef<'_>) -> Result<Bson, DecodeError> {
    Bson::try_from(value.to_raw_bson()).map_err(|source| DecodeError::Scalar {
        field: field.to_string(),
        source,
    })
}

/// Render a decoded scalar as human-readable text.
pub fn render_bson(value: &Bson) -> String {
    match value {
        Bson::Double(f) => f.to_string(),
        Bson::String(s) => s.clone(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => "null".to_string(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        Bson::Binary(bin) => hex::encode(&bin.bytes),
        Bson::RegularExpression(re) => format!("/{}/{}", re.pattern, re.options),
        Bson::Timestamp(ts) => format!("Timestamp({}, {})", ts.time, ts.increment),
        Bson::JavaScriptCode(code) => code.clone(),
        other => other.to_string(),
    }
}

/// Render a scalar value to file content: its text form plus a newline.
///
/// # Arguments
/// * `field` - Field name, used for error reporting
/// * `value` - Scalar value to render
///
/// # Returns
/// The file content bytes.
pub fn render_scalar(field: &str, value: &TypedValue) -> Result<Vec<u8>, DecodeError> {
    let decoded: &Bson = value.decoded().ok_or_else(|| {
        DecodeError::malformed(0, format!("field '{}' holds no scalar value", field))
    })?;
    let mut content: Vec<u8> = render_bson(decoded).into_bytes();
    content.push(b'\n');
    Ok(content)
}
