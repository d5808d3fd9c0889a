//! Payment rates.

use serde::{Deserialize, Serialize};

/// Number of bytes in the unit a [`PaymentRate`] is quoted in.
pub const BYTES_PER_MB: u64 = 1 << 20;

/// Payment rate in currency units per megabyte (2^20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct PaymentRate(f64);

impl PaymentRate {
    /// Create a rate from a per-megabyte price.
    pub const fn new(per_mb: f64) -> Self {
        Self(per_mb)
    }

    /// The per-megabyte price.
    pub const fn per_mb(&self) -> f64 {
        self.0
    }

    /// Payment owed for `bytes` transferred at this rate.
    ///
    /// ```text
    /// payment = bytes * rate / 2^20
    /// ```
    pub fn expected_payment(&self, bytes: u64) -> f64 {
        bytes as f64 * self.0 / BYTES_PER_MB as f64
    }
}

impl From<f64> for PaymentRate {
    fn from(per_mb: f64) -> Self {
        Self(per_mb)
    }
}
