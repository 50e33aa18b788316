//! Reduce stage: sum bucket memberships into a histogram.
//!
//! Two entry points produce the same histogram:
//!
//! - [`from_trace`] sums the rows of a materialised [`OneHotTrace`]
//! - [`fused`] classifies values directly into task-private histograms,
//!   skipping the `N x B` trace entirely
//!
//! Both split the input range into contiguous chunks, fold each chunk into a
//! private partial histogram and merge partials with [`Histogram::combine`].
//! Addition is associative and commutative, so the result does not depend on
//! how the scheduler splits or orders the chunks.

use ndarray::Axis;

use crate::bucket::{BucketLayout, Value};
use crate::histogram::{Count, Histogram};
use crate::parallel::Parallelism;
use crate::trace::OneHotTrace;

/// Sum the one-hot rows of `trace` element-wise.
pub fn from_trace(parallelism: Parallelism, trace: &OneHotTrace, min_len: usize) -> Histogram {
    let n_buckets = trace.n_buckets();
    let rows = trace.view();

    parallelism.maybe_par_bridge_reduce(
        rows.axis_chunks_iter(Axis(0), min_len.max(1)),
        || Histogram::zeros(n_buckets),
        |mut partial, block| {
            for row in block.axis_iter(Axis(0)) {
                for (count, &hot) in partial.counts_mut().iter_mut().zip(row.iter()) {
                    *count += Count::from(hot);
                }
            }
            partial
        },
        Histogram::combine,
    )
}

/// Classify and count `values` without materialising one-hot rows.
pub fn fused(
    parallelism: Parallelism,
    layout: &BucketLayout,
    values: &[Value],
    min_len: usize,
) -> Histogram {
    let n_buckets = layout.n_buckets();

    parallelism.maybe_par_chunks_reduce(
        values,
        min_len,
        || Histogram::zeros(n_buckets),
        |mut partial, chunk| {
            for &value in chunk {
                partial.increment(layout.classify(value));
            }
            partial
        },
        Histogram::combine,
    )
}
