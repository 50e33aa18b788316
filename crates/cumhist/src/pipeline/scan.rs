//! Scan stage: inclusive prefix sum of the histogram.
//!
//! # Two-pass protocol
//!
//! [`two_pass_scan`] splits the output range into contiguous chunks and may
//! call the body twice per chunk:
//!
//! ```text
//! pass 1 (any order):  body(range_k, identity, None)     -> partial_k
//!                      carry_k = partial_0 + .. + partial_{k-1}
//! pass 2 (final):      body(range_k, carry_k, Some(out)) -> writes out[range_k]
//! ```
//!
//! Only the final pass writes. Each chunk is written exactly once, seeded with
//! the combined result of every chunk to its left, so the output is the same
//! as a serial left-to-right scan even though partial sums are computed in
//! any order.
//!
//! A histogram has few buckets, so [`cumulative`] uses a grain of
//! [`SCAN_GRAIN`] buckets and any layout up to that size runs as a single
//! serial final pass.

use std::ops::Range;

use crate::histogram::{Count, CumulativeHistogram, Histogram};
use crate::parallel::Parallelism;

/// Buckets per scan chunk.
pub const SCAN_GRAIN: usize = 64;

/// Prefix scan over `out` following the two-pass protocol.
///
/// `body(range, carry, out)` must fold the inputs of `range` onto `carry` and
/// return the result. When `out` is `Some`, it is the slice of the output
/// covering `range` (index `k` of the slice is position `range.start + k`)
/// and the body must write its running values there. `combine` merges the
/// partial results of adjacent chunks and must be associative with
/// `identity` as its neutral element.
///
/// Returns the fold of the whole range.
pub fn two_pass_scan<T, B, C>(
    parallelism: Parallelism,
    out: &mut [T],
    grain: usize,
    identity: T,
    body: B,
    combine: C,
) -> T
where
    T: Copy + Send + Sync,
    B: Fn(Range<usize>, T, Option<&mut [T]>) -> T + Sync + Send,
    C: Fn(T, T) -> T,
{
    let len = out.len();
    let grain = grain.max(1);
    if !parallelism.is_parallel() || len <= grain {
        return body(0..len, identity, Some(out));
    }

    let ranges: Vec<Range<usize>> = (0..len)
        .step_by(grain)
        .map(|start| start..(start + grain).min(len))
        .collect();

    // Pass 1: per-chunk partials, nothing written.
    let partials = parallelism.maybe_par_map(&ranges, |range| body(range.clone(), identity, None));

    // Exclusive prefix of the partials seeds each chunk.
    let mut carries = Vec::with_capacity(partials.len());
    let mut total = identity;
    for &partial in &partials {
        carries.push(total);
        total = combine(total, partial);
    }

    // Pass 2: seeded final pass writes each chunk.
    parallelism.maybe_par_chunks_mut_for_each(out, grain, |k, chunk| {
        body(ranges[k].clone(), carries[k], Some(chunk));
    });

    total
}

/// Cumulative histogram: `cumulative[j] = histogram[0] + .. + histogram[j]`.
pub fn cumulative(parallelism: Parallelism, histogram: &Histogram) -> CumulativeHistogram {
    cumulative_with_grain(parallelism, histogram, SCAN_GRAIN)
}

/// [`cumulative`] with an explicit chunk size.
pub fn cumulative_with_grain(
    parallelism: Parallelism,
    histogram: &Histogram,
    grain: usize,
) -> CumulativeHistogram {
    let counts = histogram.counts();
    let mut out: Vec<Count> = vec![0; counts.len()];

    two_pass_scan(
        parallelism,
        &mut out,
        grain,
        0,
        |range, mut sum, mut out| {
            for (k, j) in range.enumerate() {
                sum += counts[j];
                if let Some(out) = out.as_deref_mut() {
                    out[k] = sum;
                }
            }
            sum
        },
        |a, b| a + b,
    );

    CumulativeHistogram::from_counts(out)
}
