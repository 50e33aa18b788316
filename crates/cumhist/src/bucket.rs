//! Bucket assignment for input values.
//!
//! The value range `[0, V]` is split into `B` equal-width buckets of width
//! `W = ceil(V / B)`. Positive values are shifted down by one before dividing
//! so that every multiple of `W` closes its bucket instead of opening the next
//! one:
//!
//! ```text
//! V = 120, B = 4, W = 30
//!
//!   bucket 0: [0   -  30]
//!   bucket 1: [31  -  60]
//!   bucket 2: [61  -  90]
//!   bucket 3: [91  - 120]
//! ```
//!
//! A side effect is that `0` and `1` both land in bucket 0. The final index is
//! clamped to `B - 1`, so values above `V` still produce a valid bucket.
//!
//! `V` itself reaches the last bucket only when `W * (B - 1) < V`. Otherwise
//! the ceiling leaves trailing buckets that no value can reach:
//!
//! ```text
//! V = 10, B = 7, W = 2
//!
//!   classify(10) = 9 / 2 = 4; buckets 5 and 6 stay empty
//! ```

use crate::error::ConfigError;

/// Input values are non-negative integers.
pub type Value = u32;

/// Validated bucket geometry: bucket count, maximum value and derived width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketLayout {
    n_buckets: usize,
    max_value: Value,
    width: u64,
}

impl BucketLayout {
    /// Create a layout for `n_buckets` buckets over `[0, max_value]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBuckets`] if `n_buckets == 0` and
    /// [`ConfigError::ZeroMaxValue`] if `max_value == 0`.
    pub fn new(n_buckets: usize, max_value: Value) -> Result<Self, ConfigError> {
        if n_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if max_value == 0 {
            return Err(ConfigError::ZeroMaxValue);
        }
        let width = u64::from(max_value).div_ceil(n_buckets as u64);
        Ok(Self {
            n_buckets,
            max_value,
            width,
        })
    }

    /// Number of buckets `B`.
    #[inline]
    pub fn n_buckets(&self) -> usize {
        self.n_buckets
    }

    /// Maximum expected value `V`.
    #[inline]
    pub fn max_value(&self) -> Value {
        self.max_value
    }

    /// Bucket width `W = ceil(V / B)`. Always at least 1.
    #[inline]
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Bucket index of `value`, always in `[0, B)`.
    ///
    /// `classify(max_value) == n_buckets - 1` holds only when
    /// `width * (n_buckets - 1) < max_value`.
    #[inline]
    pub fn classify(&self, value: Value) -> usize {
        let shifted = u64::from(value.saturating_sub(1));
        let last = (self.n_buckets - 1) as u64;
        (shifted / self.width).min(last) as usize
    }

    /// Whether `value` lies in the expected domain `[0, V]`.
    #[inline]
    pub fn contains(&self, value: Value) -> bool {
        value <= self.max_value
    }

    /// Inclusive display bounds `(low, high)` of `bucket`.
    ///
    /// Bounds are computed from the top of the range downwards, so when `W`
    /// does not divide `V` the lower bound of the first buckets may disagree
    /// with [`classify`](Self::classify) (or go negative). They are labels only.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= n_buckets`.
    pub fn bounds(&self, bucket: usize) -> (i64, i64) {
        assert!(
            bucket < self.n_buckets,
            "bucket {} out of range for {} buckets",
            bucket,
            self.n_buckets
        );
        let max = i64::from(self.max_value);
        let width = self.width as i64;
        let b = self.n_buckets as i64;
        let i = bucket as i64;

        let high = max - (b - 1 - i) * width;
        let low = if bucket == 0 { 0 } else { max - (b - i) * width + 1 };
        (low, high)
    }

    /// Display bounds of every bucket, in bucket order.
    pub fn all_bounds(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (0..self.n_buckets).map(|bucket| self.bounds(bucket))
    }
}
