//! Top-level document framing.
//!
//! A mongodump-style buffer is a concatenation of BSON documents, each
//! starting with a little-endian `i32` that counts the whole document
//! including the four length bytes.

use bytes::Bytes;

use crate::error::DecodeError;
use crate::value::{NamedValue, TypedValue};

/// Split a buffer into its top-level documents.
///
/// Documents are named by their zero-based position (`"0"`, `"1"`, ...).
/// Any framing error aborts the whole decode. Only the length prefixes are
/// checked here; a document whose body is malformed still frames and fails
/// later, when its own directory is expanded.
///
/// # Arguments
/// * `buf` - Buffer holding zero or more concatenated documents
///
/// # Returns
/// One embedded-document value per top-level document, in stream order.
pub fn decode_stream(buf: &Bytes) -> Result<Vec<NamedValue>, DecodeError> {
    let len: usize = buf.len();
    let mut offset: usize = 0;
    let mut docs: Vec<NamedValue> = Vec::new();

    while offset < len {
        let doc_len: usize = frame_at(buf, offset)?;
        let span: Bytes = buf.slice(offset..offset + doc_len);
        docs.push(NamedValue::new(docs.len().to_string(), TypedValue::document(span)));
        offset += doc_len;
    }
    debug_assert_eq!(offset, len);

    tracing::debug!(documents = docs.len(), bytes = len, "Decoded document stream");
    Ok(docs)
}

/// Treat the whole buffer as exactly one document.
///
/// The declared length must cover the buffer exactly; the body is left for
/// the expansion of the root directory to decode.
///
/// # Returns
/// The document as an embedded-document value.
pub fn decode_single(buf: &Bytes) -> Result<TypedValue, DecodeError> {
    let doc_len: usize = frame_at(buf, 0)?;
    if doc_len != buf.len() {
        return Err(DecodeError::MisalignedStream {
            offset: doc_len,
            len: buf.len(),
        });
    }
    Ok(TypedValue::document(buf.clone()))
}

/// Read a little-endian `i32` at `offset`.
///
/// # Returns
/// `None` if fewer than four bytes remain.
fn read_i32_le(buf: &[u8], offset: usize) -> Option<i32> {
    let end: usize = offset.checked_add(4)?;
    let bytes: &[u8] = buf.get(offset..end)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Validate the frame of the document starting at `offset`.
///
/// # Returns
/// The declared document length (including the prefix).
fn frame_at(buf: &[u8], offset: usize) -> Result<usize, DecodeError> {
    let remaining: usize = buf.len() - offset;
    let declared: i32 = read_i32_le(buf, offset).ok_or(DecodeError::TruncatedLength {
        offset,
        remaining,
    })?;

    let truncated = DecodeError::TruncatedDocument {
        offset,
        declared,
        available: remaining,
    };
    match usize::try_from(declared) {
        Ok(n) if (4..=remaining).contains(&n) => Ok(n),
        _ => Err(truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    use crate::codec::decode_elements;

    fn encode(doc: &bson::Document) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        doc.to_writer(&mut out).unwrap();
        out
    }

    #[test]
    fn test_decode_stream_splits_documents() {
        let docs: Vec<Vec<u8>> = vec![
            encode(&doc! { "a": 1 }),
            encode(&doc! { "name": "a much longer string value", "n": 2_i64 }),
            encode(&doc! {}),
        ];
        let buf: Bytes = Bytes::from(docs.concat());

        let decoded: Vec<NamedValue> = decode_stream(&buf).unwrap();
        assert_eq!(decoded.len(), 3);

        let names: Vec<&str> = decoded.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["0", "1", "2"]);

        for (value, original) in decoded.iter().zip(docs.iter()) {
            assert!(value.value.is_container());
            assert_eq!(value.value.raw().as_ref(), original.as_slice());
        }

        let rebuilt: Vec<u8> = decoded
            .iter()
            .flat_map(|d| d.value.raw().iter().copied())
            .collect();
        assert_eq!(rebuilt, buf.to_vec());
    }

    #[test]
    fn test_decode_stream_empty_buffer() {
        let decoded: Vec<NamedValue> = decode_stream(&Bytes::new()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_stream_advances_by_full_length() {
        // Two documents of different sizes; advancing by `len - 4` would
        // land inside the first document's body.
        let first: Vec<u8> = encode(&doc! { "k": "0123456789" });
        let second: Vec<u8> = encode(&doc! { "z": true });
        let buf: Bytes = Bytes::from([first.clone(), second.clone()].concat());

        let decoded: Vec<NamedValue> = decode_stream(&buf).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].value.raw().as_ref(), second.as_slice());
    }

    #[test]
    fn test_truncated_length() {
        let mut bytes: Vec<u8> = encode(&doc! { "a": 1 });
        bytes.extend_from_slice(&[0x05, 0x00]);
        let result = decode_stream(&Bytes::from(bytes));
        assert!(matches!(
            result,
            Err(DecodeError::TruncatedLength { remaining: 2, .. })
        ));
    }

    #[test]
    fn test_truncated_document() {
        let mut bytes: Vec<u8> = encode(&doc! { "a": 1 });
        let last: Vec<u8> = encode(&doc! { "b": "text" });
        bytes.extend_from_slice(&last[..last.len() - 3]);

        let result = decode_stream(&Bytes::from(bytes));
        assert!(matches!(result, Err(DecodeError::TruncatedDocument { .. })));
    }

    #[test]
    fn test_declared_length_below_prefix() {
        let bytes: Vec<u8> = vec![0x02, 0x00, 0x00, 0x00, 0x00];
        let result = decode_stream(&Bytes::from(bytes));
        assert!(matches!(
            result,
            Err(DecodeError::TruncatedDocument { declared: 2, .. })
        ));

        let negative: Vec<u8> = (-1_i32).to_le_bytes().to_vec();
        let result = decode_stream(&Bytes::from(negative));
        assert!(matches!(result, Err(DecodeError::TruncatedDocument { .. })));
    }

    #[test]
    fn test_prefix_only_document_frames() {
        let bytes: Vec<u8> = vec![0x04, 0x00, 0x00, 0x00];
        let decoded: Vec<NamedValue> = decode_stream(&Bytes::from(bytes)).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].value.raw().len(), 4);
    }

    #[test]
    fn test_bad_body_frames_and_fails_on_decode() {
        // First document declares six bytes but does not end in a
        // terminator; the second is an empty document.
        let bytes: Vec<u8> = vec![
            0x06, 0x00, 0x00, 0x00, 0x00, 0x01, // bad body
            0x05, 0x00, 0x00, 0x00, 0x00, // {}
        ];
        let decoded: Vec<NamedValue> = decode_stream(&Bytes::from(bytes)).unwrap();
        assert_eq!(decoded.len(), 2);

        let first = decode_elements(decoded[0].value.raw());
        assert!(matches!(first, Err(DecodeError::MalformedContainer { .. })));
        assert!(decode_elements(decoded[1].value.raw()).unwrap().is_empty());
    }

    #[test]
    fn test_decode_single() {
        let bytes: Bytes = Bytes::from(encode(&doc! { "age": 42 }));
        let value: TypedValue = decode_single(&bytes).unwrap();
        assert_eq!(value.raw(), &bytes);
    }

    #[test]
    fn test_decode_single_checks_only_length() {
        let bytes: Bytes = Bytes::from(vec![0x06, 0x00, 0x00, 0x00, 0x00, 0x01]);
        let value: TypedValue = decode_single(&bytes).unwrap();
        assert_eq!(value.raw().len(), 6);
    }

    #[test]
    fn test_decode_single_rejects_trailing_bytes() {
        let mut bytes: Vec<u8> = encode(&doc! { "age": 42 });
        bytes.extend(encode(&doc! { "age": 43 }));
        let result = decode_single(&Bytes::from(bytes));
        assert!(matches!(result, Err(DecodeError::MisalignedStream { .. })));
    }
}
