//! Wire schema for the blob exchange query protocol.
//!
//! One round-trip carries a [`QueryBatch`] from the downloader and a
//! [`ResponseBatch`] back from the uploader. Both are JSON objects; keys the
//! receiver does not recognize are ignored.
//!
//! # Query keys
//!
//! | key | payload |
//! |---|---|
//! | `requested_blobs` | list of blob hashes (availability) |
//! | `blob_data_payment_rate` | offered rate per megabyte |
//! | `requested_blob` | single blob hash (download) |

mod codec;
mod query;
mod response;

pub use codec::{QueryCodecError, decode_query, decode_response, encode_query, encode_response};
pub use query::{QueryBatch, QueryKey};
pub use response::{IncomingBlob, ResponseBatch, ResponseError};

/// Maximum size of an encoded query or response.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;
