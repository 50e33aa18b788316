//! Verbosity-gated progress logging for pipeline runs.
//!
//! Output goes to stderr so it never interleaves with the diagnostic sink,
//! which writes to stdout by default.

use std::time::Duration;

use serde::Serialize;

use crate::bucket::BucketLayout;
use crate::parallel::Parallelism;

/// Verbosity level for pipeline output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Start and finish of each run.
    Info,
    /// Per-phase timings.
    Debug,
}

/// Stage of the pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Map,
    Reduce,
    Scan,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Map => "map",
            Stage::Reduce => "reduce",
            Stage::Scan => "scan",
        }
    }
}

/// Logger for a single pipeline run.
#[derive(Debug)]
pub struct PipelineLogger {
    verbosity: Verbosity,
}

impl PipelineLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_run(&self, n_values: usize, layout: &BucketLayout, parallelism: Parallelism) {
        if self.enabled(Verbosity::Info) {
            eprintln!(
                "[cumhist] run: n={} buckets={} max_value={} width={} backend={} threads={}",
                n_values,
                layout.n_buckets(),
                layout.max_value(),
                layout.width(),
                parallelism,
                parallelism.n_threads(),
            );
        }
    }

    /// `fused` marks a reduce stage that absorbed the map stage.
    pub fn log_stage(&self, stage: Stage, elapsed: Duration, fused: bool) {
        if self.enabled(Verbosity::Debug) {
            let suffix = if fused { " (fused map)" } else { "" };
            eprintln!(
                "[cumhist]   {:<6} {:.3?}{}",
                stage.name(),
                elapsed,
                suffix
            );
        }
    }

    pub fn finish_run(&self, elapsed: Duration, total: u64) {
        if self.enabled(Verbosity::Info) {
            eprintln!("[cumhist] done in {:.3?}: {} values counted", elapsed, total);
        }
    }
}
