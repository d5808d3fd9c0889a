//! Default values for upload configuration.

/// Bytes read and written per chunk when streaming a blob (2^14).
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 14;

/// Largest accepted chunk size.
pub const MAX_CHUNK_SIZE: usize = 1 << 20;

/// Wire key identifying the upload protocol.
pub const PRIMARY_QUERY_IDENTIFIER: &str = "requested_blob";

/// Human-readable name of the upload protocol.
pub const DESCRIPTION: &str = "Blob Uploader - uploads blobs";
