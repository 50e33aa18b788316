//! Map stage: one one-hot row per input value.

use ndarray::Axis;

use crate::bucket::{BucketLayout, Value};
use crate::parallel::Parallelism;
use crate::trace::OneHotTrace;

/// Classify every value into a one-hot row.
///
/// Input chunks of `min_len` values map to disjoint row blocks of the trace,
/// so each task writes only its own rows.
pub fn one_hot(
    parallelism: Parallelism,
    layout: &BucketLayout,
    values: &[Value],
    min_len: usize,
) -> OneHotTrace {
    let min_len = min_len.max(1);
    let mut trace = OneHotTrace::zeros(values.len(), layout.n_buckets());

    let row_blocks = trace
        .as_array_mut()
        .axis_chunks_iter_mut(Axis(0), min_len)
        .zip(values.chunks(min_len));

    parallelism.maybe_par_bridge_for_each(row_blocks, |(mut rows, chunk)| {
        for (mut row, &value) in rows.axis_iter_mut(Axis(0)).zip(chunk) {
            row[layout.classify(value)] = 1;
        }
    });

    trace
}
