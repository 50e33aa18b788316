//! cumhist: cumulative histograms on a data-parallel pipeline.
//!
//! Integer inputs in `[0, V]` are classified into `B` equal-width buckets,
//! counted, and prefix-summed in three stages (map, reduce, scan). Each stage
//! runs either sequentially or on rayon's work-stealing pool and both
//! backends produce bit-identical results.
//!
//! # Key Types
//!
//! - [`PipelineConfig`] - Bucket geometry and run options (builder)
//! - [`BucketLayout`] - The classifier and display bounds of a configuration
//! - [`Histogram`] / [`CumulativeHistogram`] - Stage outputs
//! - [`Parallelism`] - Execution backend
//!
//! # Running
//!
//! Build a config with `PipelineConfig::builder()`, then call [`run`].
//! Use [`run_with_sink`] to capture the per-phase diagnostics, and
//! [`run_with_threads`] to pin the thread count.
//! See the [`pipeline`] module for details.

pub mod bucket;
pub mod config;
pub mod error;
pub mod histogram;
pub mod logger;
pub mod parallel;
pub mod pipeline;
pub mod sink;
pub mod testing;
pub mod trace;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Configuration and geometry
pub use bucket::{BucketLayout, Value};
pub use config::PipelineConfig;

// Errors
pub use error::{ConfigError, HistogramError};

// Pipeline entry points and outputs
pub use histogram::{Count, CumulativeHistogram, Histogram};
pub use pipeline::{PhaseTimings, PipelineOutput, run, run_with_sink};
pub use trace::OneHotTrace;

// Diagnostics
pub use logger::Verbosity;
pub use sink::{ConsoleSink, Phase, PhaseSink};

// Shared utilities
pub use parallel::{Parallelism, run_with_threads};
