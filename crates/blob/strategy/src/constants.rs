//! Default constants for rate negotiation.

/// Default minimum accepted rate, in currency per megabyte.
pub const DEFAULT_MIN_BLOB_DATA_PAYMENT_RATE: f64 = 0.0001;
