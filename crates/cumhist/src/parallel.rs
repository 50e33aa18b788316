//! Backend selection for the pipeline stages.
//!
//! Every stage is written once against [`Parallelism`]. The `maybe_par_*`
//! helpers run the same closures either as a plain loop in index order or on
//! rayon's work-stealing pool, so the stage code never branches on the backend
//! itself.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::HistogramError;

// =============================================================================
// Parallelism
// =============================================================================

/// Execution backend for a pipeline run.
///
/// When `Parallel`, stages split their index range into contiguous chunks and
/// submit them to the current rayon pool. When `Sequential`, stages iterate in
/// index order on the calling thread. Both produce identical results.
///
/// The thread pool itself is chosen by the caller, typically through
/// [`run_with_threads`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Threads available to this backend in the current pool.
    #[inline]
    pub fn n_threads(self) -> usize {
        match self {
            Parallelism::Sequential => 1,
            Parallelism::Parallel => rayon::current_num_threads(),
        }
    }

    /// Reduce a slice chunk by chunk.
    ///
    /// `items` is split into contiguous chunks of at least `min_len` items
    /// (the last chunk may be shorter). Each chunk is folded into an
    /// accumulator created by `identity`, and accumulators are merged with
    /// `combine`. Sequentially there is exactly one accumulator and chunks are
    /// folded in index order.
    ///
    /// `combine` must be associative and `identity()` its neutral element;
    /// the parallel backend may group chunks arbitrarily.
    #[inline]
    pub fn maybe_par_chunks_reduce<T, A, ID, F, C>(
        self,
        items: &[T],
        min_len: usize,
        identity: ID,
        fold: F,
        combine: C,
    ) -> A
    where
        T: Sync,
        A: Send,
        ID: Fn() -> A + Sync + Send,
        F: Fn(A, &[T]) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send,
    {
        let min_len = min_len.max(1);
        if self.is_parallel() && items.len() > min_len {
            items
                .par_chunks(min_len)
                .fold(&identity, &fold)
                .reduce(&identity, &combine)
        } else {
            items.chunks(min_len).fold(identity(), fold)
        }
    }

    /// Visit disjoint chunks of `out`, passing each chunk's index.
    ///
    /// Chunk `k` covers `out[k * chunk_len..]` up to `chunk_len` items.
    #[inline]
    pub fn maybe_par_chunks_mut_for_each<T, F>(self, out: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let chunk_len = chunk_len.max(1);
        if self.is_parallel() {
            out.par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(k, chunk)| f(k, chunk));
        } else {
            out.chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(k, chunk)| f(k, chunk));
        }
    }

    #[inline]
    pub fn maybe_par_bridge_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: Iterator<Item = T> + Send,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.par_bridge().for_each(f);
        } else {
            iter.for_each(f);
        }
    }

    /// Fold an iterator that doesn't implement `IntoParallelIterator`.
    ///
    /// Like [`maybe_par_chunks_reduce`](Self::maybe_par_chunks_reduce) but for
    /// iterators such as ndarray's `axis_chunks_iter`. Items may be folded in
    /// any order on the parallel backend, so `combine` must also be commutative.
    #[inline]
    pub fn maybe_par_bridge_reduce<T, A, I, ID, F, C>(
        self,
        iter: I,
        identity: ID,
        fold: F,
        combine: C,
    ) -> A
    where
        T: Send,
        A: Send,
        I: Iterator<Item = T> + Send,
        ID: Fn() -> A + Sync + Send,
        F: Fn(A, T) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send,
    {
        if self.is_parallel() {
            iter.par_bridge()
                .fold(&identity, &fold)
                .reduce(&identity, &combine)
        } else {
            iter.fold(identity(), fold)
        }
    }

    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

impl fmt::Display for Parallelism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parallelism::Sequential => f.write_str("sequential"),
            Parallelism::Parallel => f.write_str("parallel"),
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use the current rayon pool)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads in a local pool
///
/// # Example
///
/// ```
/// use cumhist::{run, run_with_threads, PipelineConfig};
///
/// let config = PipelineConfig::builder().build().unwrap();
/// let values = [10, 40, 70, 100, 120, 0, 30, 60, 90, 115];
///
/// let output = run_with_threads(4, |parallelism| run(&values, &config, parallelism))
///     .unwrap()
///     .unwrap();
/// assert_eq!(output.cumulative.counts(), &[3, 5, 7, 10]);
/// ```
///
/// # Errors
///
/// Returns [`HistogramError::ThreadPool`] if the local pool cannot be built.
#[inline]
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, HistogramError> {
    let parallelism = Parallelism::from_threads(n_threads);

    match (parallelism, n_threads) {
        (Parallelism::Sequential, _) => Ok(f(Parallelism::Sequential)),
        (Parallelism::Parallel, 0) => Ok(f(Parallelism::Parallel)),
        (Parallelism::Parallel, n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(|| f(Parallelism::Parallel)))
        }
    }
}
