//! Histogram value types and the element-wise combine operators.
//!
//! - [`Histogram`]: per-bucket counts, produced by the reduce stage
//! - [`CumulativeHistogram`]: inclusive prefix sum of a histogram, produced by the scan stage
//!
//! The free functions operate on raw count slices so the reduce stage can fold
//! into task-private buffers without wrapping them first. Element-wise addition
//! with the zero vector as identity is associative and commutative, so partial
//! histograms can be merged in any order and grouping.

use std::fmt;
use std::ops::Index;

use serde::Serialize;

/// Bucket counts are unsigned 64-bit integers.
pub type Count = u64;

/// Merge histograms: dst += src
#[inline]
pub fn merge_histogram(dst: &mut [Count], src: &[Count]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += *s;
    }
}

/// Sum all bins in a histogram.
#[inline]
pub fn sum_histogram(counts: &[Count]) -> Count {
    counts.iter().sum()
}

/// Write counts as `[ a; b; c; ]`.
pub(crate) fn write_bracketed<T: fmt::Display>(
    f: &mut impl fmt::Write,
    values: impl IntoIterator<Item = T>,
) -> fmt::Result {
    f.write_str("[ ")?;
    for value in values {
        write!(f, "{}; ", value)?;
    }
    f.write_str("]")
}

// =============================================================================
// Histogram
// =============================================================================

/// Per-bucket counts. Entries sum to the number of classified inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: Vec<Count>,
}

impl Histogram {
    /// All-zero histogram with `n_buckets` entries.
    pub fn zeros(n_buckets: usize) -> Self {
        Self {
            counts: vec![0; n_buckets],
        }
    }

    pub fn from_counts(counts: Vec<Count>) -> Self {
        Self { counts }
    }

    #[inline]
    pub fn n_buckets(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    #[inline]
    pub fn counts_mut(&mut self) -> &mut [Count] {
        &mut self.counts
    }

    /// Record one value in `bucket`.
    #[inline]
    pub fn increment(&mut self, bucket: usize) {
        self.counts[bucket] += 1;
    }

    /// Element-wise sum, consuming both operands.
    ///
    /// This is the reduce-stage combine operator.
    pub fn combine(mut self, other: Self) -> Self {
        merge_histogram(&mut self.counts, &other.counts);
        self
    }

    /// Total number of values counted.
    pub fn total(&self) -> Count {
        sum_histogram(&self.counts)
    }

    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

impl Index<usize> for Histogram {
    type Output = Count;

    fn index(&self, bucket: usize) -> &Count {
        &self.counts[bucket]
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, &self.counts)
    }
}

// =============================================================================
// CumulativeHistogram
// =============================================================================

/// Inclusive prefix sum of a [`Histogram`].
///
/// Non-decreasing; the last entry equals the number of classified inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CumulativeHistogram {
    counts: Vec<Count>,
}

impl CumulativeHistogram {
    pub(crate) fn from_counts(counts: Vec<Count>) -> Self {
        debug_assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        Self { counts }
    }

    #[inline]
    pub fn n_buckets(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    /// Last entry, or 0 for an empty layout.
    pub fn total(&self) -> Count {
        self.counts.last().copied().unwrap_or(0)
    }

    /// Recover the per-bucket histogram by differencing adjacent entries.
    pub fn to_histogram(&self) -> Histogram {
        let mut prev = 0;
        let counts = self
            .counts
            .iter()
            .map(|&c| {
                let diff = c - prev;
                prev = c;
                diff
            })
            .collect();
        Histogram::from_counts(counts)
    }
}

impl Index<usize> for CumulativeHistogram {
    type Output = Count;

    fn index(&self, bucket: usize) -> &Count {
        &self.counts[bucket]
    }
}

impl fmt::Display for CumulativeHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, &self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_elementwise() {
        let mut dst = vec![1, 2, 3, 4];
        merge_histogram(&mut dst, &[4, 3, 2, 1]);
        assert_eq!(dst, vec![5, 5, 5, 5]);
    }

    #[test]
    fn sum_counts_every_bin() {
        assert_eq!(sum_histogram(&[3, 0, 7]), 10);
        assert_eq!(sum_histogram(&[]), 0);
    }

    #[test]
    fn combine_with_zero_is_identity() {
        let h = Histogram::from_counts(vec![2, 0, 5, 1]);
        assert_eq!(h.clone().combine(Histogram::zeros(4)), h);
        assert_eq!(Histogram::zeros(4).combine(h.clone()), h);
    }

    #[test]
    fn combine_is_order_independent() {
        let a = Histogram::from_counts(vec![1, 0, 2, 0]);
        let b = Histogram::from_counts(vec![0, 3, 0, 4]);
        let c = Histogram::from_counts(vec![5, 5, 0, 0]);

        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = c.combine(a.combine(b));
        assert_eq!(left, right);
        assert_eq!(left.counts(), &[6, 8, 2, 4]);
    }

    #[test]
    fn increment_and_total() {
        let mut h = Histogram::zeros(3);
        h.increment(0);
        h.increment(2);
        h.increment(2);
        assert_eq!(h.counts(), &[1, 0, 2]);
        assert_eq!(h.total(), 3);
        assert!(!h.is_zero());
        assert!(Histogram::zeros(3).is_zero());
    }

    #[test]
    fn display_uses_semicolon_brackets() {
        let h = Histogram::from_counts(vec![3, 3, 2, 2]);
        assert_eq!(h.to_string(), "[ 3; 3; 2; 2; ]");
        assert_eq!(Histogram::zeros(0).to_string(), "[ ]");
    }

    #[test]
    fn cumulative_total_and_difference() {
        let cum = CumulativeHistogram::from_counts(vec![3, 6, 8, 10]);
        assert_eq!(cum.total(), 10);
        assert_eq!(cum[1], 6);
        assert_eq!(cum.to_histogram().counts(), &[3, 3, 2, 2]);
        assert_eq!(CumulativeHistogram::default().total(), 0);
    }

    #[test]
    fn serializes_as_plain_array() {
        let h = Histogram::from_counts(vec![1, 2]);
        assert_eq!(serde_json::to_string(&h).unwrap(), "[1,2]");
    }
}
