//! JSON codec for query and response batches.

use bytes::Bytes;

use crate::{MAX_MESSAGE_SIZE, QueryBatch, ResponseBatch};

/// Error type for query codec operations.
#[derive(Debug, thiserror::Error)]
pub enum QueryCodecError {
    /// Malformed JSON or unexpected payload type.
    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),
    /// Message exceeds [`MAX_MESSAGE_SIZE`].
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge {
        /// Size of the rejected message.
        size: usize,
        /// Configured limit.
        max: usize,
    },
}

fn check_size(size: usize) -> Result<(), QueryCodecError> {
    if size > MAX_MESSAGE_SIZE {
        return Err(QueryCodecError::MessageTooLarge {
            size,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(())
}

/// Encode a query batch.
pub fn encode_query(query: &QueryBatch) -> Result<Bytes, QueryCodecError> {
    let buf = serde_json::to_vec(query)?;
    check_size(buf.len())?;
    Ok(Bytes::from(buf))
}

/// Decode a query batch, ignoring unrecognized keys.
pub fn decode_query(buf: &[u8]) -> Result<QueryBatch, QueryCodecError> {
    check_size(buf.len())?;
    Ok(serde_json::from_slice(buf)?)
}

/// Encode a response batch.
pub fn encode_response(response: &ResponseBatch) -> Result<Bytes, QueryCodecError> {
    let buf = serde_json::to_vec(response)?;
    check_size(buf.len())?;
    Ok(Bytes::from(buf))
}

/// Decode a response batch.
pub fn decode_response(buf: &[u8]) -> Result<ResponseBatch, QueryCodecError> {
    check_size(buf.len())?;
    Ok(serde_json::from_slice(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncomingBlob, ResponseError};
    use assert_matches::assert_matches;
    use vertex_blob_primitives::{BlobHash, NegotiationOutcome, PaymentRate};

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let raw = br#"{"requested_blobs": ["a", "b"], "blob_data_payment_rate": 0.5, "wallet_info": 7}"#;
        let query = decode_query(raw).unwrap();
        assert_eq!(
            query.requested_blobs,
            Some(vec![BlobHash::from("a"), BlobHash::from("b")])
        );
        assert_eq!(query.payment_rate, Some(0.5));
        assert_eq!(query.requested_blob, None);
    }

    #[test]
    fn test_decode_rejects_wrong_payload_type() {
        let raw = br#"{"requested_blob": ["a"]}"#;
        assert_matches!(decode_query(raw), Err(QueryCodecError::Json(_)));
    }

    #[test]
    fn test_decode_rejects_oversize() {
        let raw = vec![b' '; MAX_MESSAGE_SIZE + 1];
        assert_matches!(
            decode_query(&raw),
            Err(QueryCodecError::MessageTooLarge { size, .. }) if size == MAX_MESSAGE_SIZE + 1
        );
    }

    #[test]
    fn test_response_wire_shape() {
        let response = ResponseBatch {
            available_blobs: Some(vec![BlobHash::from("x")]),
            negotiation: Some(NegotiationOutcome::accept(PaymentRate::new(0.5)).to_reply()),
            incoming_blob: Some(IncomingBlob {
                blob_hash: BlobHash::from("x"),
                length: 1_048_576,
            }),
            error: None,
        };

        let json: serde_json::Value =
            serde_json::from_slice(&encode_response(&response).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "available_blobs": ["x"],
                "blob_data_payment_rate": "RATE_ACCEPTED",
                "payment_rate": 0.5,
                "incoming_blob": {"blob_hash": "x", "length": 1_048_576},
            })
        );
    }

    #[test]
    fn test_error_only_response() {
        let response = ResponseBatch {
            error: Some(ResponseError::RateUnset),
            ..Default::default()
        };
        let encoded = encode_response(&response).unwrap();
        assert_eq!(&encoded[..], br#"{"error":"RATE_UNSET"}"#);

        let decoded = decode_response(&encoded).unwrap();
        assert_eq!(decoded, response);
        assert!(decoded.negotiation.is_none());
    }
}
