//! Error types for histogram configuration and pipeline runs.

use std::io;

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Bucket count must be at least 1.
    #[error("n_buckets must be at least 1")]
    ZeroBuckets,

    /// Maximum value must be at least 1, otherwise the bucket width is zero.
    #[error("max_value must be at least 1 (bucket width would be zero)")]
    ZeroMaxValue,

    /// Chunk length handed to a single task must be at least 1.
    #[error("min_chunk_len must be at least 1")]
    ZeroChunkLength,
}

/// Errors returned by [`run`](crate::pipeline::run) and friends.
///
/// A run that fails produces no partial output.
#[derive(Debug, thiserror::Error)]
pub enum HistogramError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// Only reported when strict input checking is enabled.
    #[error("input value {value} at index {index} is outside [0, {max_value}]")]
    InvalidInput {
        index: usize,
        value: u32,
        max_value: u32,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("diagnostic sink error: {0}")]
    Sink(#[from] io::Error),
}
