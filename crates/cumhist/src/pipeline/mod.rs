//! Map → reduce → scan driver.
//!
//! # Stages
//!
//! - [`map`]: one-hot row per input value (only when tracing)
//! - [`reduce`]: element-wise sum into a [`Histogram`]
//! - [`scan`]: inclusive prefix sum into a [`CumulativeHistogram`]
//!
//! Stages run strictly one after another; each consumes the previous stage's
//! output and never mutates its input. The backend only changes how a stage
//! splits its range across tasks, never what it computes, so the sequential
//! and parallel backends return identical histograms.
//!
//! # Fused mode
//!
//! Without tracing the map stage is folded into the reduce stage: every task
//! classifies its values straight into a private histogram, so memory is
//! `O(tasks * B)` instead of `O(N * B)`.
//!
//! # Example
//!
//! ```
//! use cumhist::{run, Parallelism, PipelineConfig};
//!
//! let config = PipelineConfig::builder().build().unwrap();
//! let values = [1, 30, 31, 60, 61, 90, 91, 120];
//!
//! let output = run(&values, &config, Parallelism::Parallel).unwrap();
//! assert_eq!(output.histogram.counts(), &[2, 2, 2, 2]);
//! assert_eq!(output.cumulative.counts(), &[2, 4, 6, 8]);
//! ```

pub mod map;
pub mod reduce;
pub mod scan;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::bucket::{BucketLayout, Value};
use crate::config::PipelineConfig;
use crate::error::HistogramError;
use crate::histogram::{CumulativeHistogram, Histogram};
use crate::logger::{PipelineLogger, Stage};
use crate::parallel::Parallelism;
use crate::sink::{ConsoleSink, Phase, PhaseSink};
use crate::trace::OneHotTrace;

/// Wall-clock time spent in each stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTimings {
    /// `None` when the map stage was fused into the reduce stage.
    pub map: Option<Duration>,
    pub reduce: Duration,
    pub scan: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.map.unwrap_or_default() + self.reduce + self.scan
    }
}

/// Result of a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Cumulative histogram; the final result.
    pub cumulative: CumulativeHistogram,
    /// Per-bucket counts the cumulative histogram was scanned from.
    pub histogram: Histogram,
    /// One-hot rows of the map stage, present only for traced runs.
    pub trace: Option<OneHotTrace>,
    pub timings: PhaseTimings,
}

/// Compute the cumulative histogram of `values`.
///
/// When `config.trace` is set, the one-hot trace is materialised, returned,
/// and every phase is written to stdout in the console format.
///
/// # Errors
///
/// - [`HistogramError::InvalidConfiguration`] if `config` does not validate
/// - [`HistogramError::InvalidInput`] if `config.strict` is set and a value exceeds `max_value`
/// - [`HistogramError::Sink`] if writing a traced phase to stdout fails
///
/// All checks on the configuration and input happen before any stage runs.
pub fn run(
    values: &[Value],
    config: &PipelineConfig,
    parallelism: Parallelism,
) -> Result<PipelineOutput, HistogramError> {
    if config.trace {
        let mut stdout = ConsoleSink::stdout();
        execute(values, config, parallelism, Some(&mut stdout))
    } else {
        execute(values, config, parallelism, None)
    }
}

/// Like [`run`], but always traced, sending every phase to `sink`.
///
/// `config.trace` is ignored.
pub fn run_with_sink(
    values: &[Value],
    config: &PipelineConfig,
    parallelism: Parallelism,
    sink: &mut dyn PhaseSink,
) -> Result<PipelineOutput, HistogramError> {
    execute(values, config, parallelism, Some(sink))
}

fn execute(
    values: &[Value],
    config: &PipelineConfig,
    parallelism: Parallelism,
    mut sink: Option<&mut dyn PhaseSink>,
) -> Result<PipelineOutput, HistogramError> {
    config.validate()?;
    let layout = config.layout()?;
    if config.strict {
        check_domain(values, &layout)?;
    }

    let logger = PipelineLogger::new(config.verbosity);
    logger.start_run(values.len(), &layout, parallelism);
    let min_len = config.min_chunk_len;
    let mut timings = PhaseTimings::default();

    // Map
    let trace = match sink.as_deref_mut() {
        Some(sink) => {
            let started = Instant::now();
            let trace = map::one_hot(parallelism, &layout, values, min_len);
            let elapsed = started.elapsed();
            timings.map = Some(elapsed);
            logger.log_stage(Stage::Map, elapsed, false);
            sink.emit(Phase::Map(&trace))?;
            Some(trace)
        }
        None => None,
    };

    // Reduce
    let started = Instant::now();
    let histogram = match &trace {
        Some(trace) => reduce::from_trace(parallelism, trace, min_len),
        None => reduce::fused(parallelism, &layout, values, min_len),
    };
    timings.reduce = started.elapsed();
    logger.log_stage(Stage::Reduce, timings.reduce, trace.is_none());
    if let Some(sink) = sink.as_deref_mut() {
        sink.emit(Phase::Reduce(&histogram))?;
    }

    // Scan
    let started = Instant::now();
    let cumulative = scan::cumulative(parallelism, &histogram);
    timings.scan = started.elapsed();
    logger.log_stage(Stage::Scan, timings.scan, false);
    if let Some(sink) = sink.as_deref_mut() {
        sink.emit(Phase::Scan(&cumulative))?;
    }

    debug_assert_eq!(histogram.total(), values.len() as u64);
    debug_assert_eq!(cumulative.total(), histogram.total());
    logger.finish_run(timings.total(), cumulative.total());

    Ok(PipelineOutput {
        cumulative,
        histogram,
        trace,
        timings,
    })
}

/// First value outside `[0, max_value]`, as an error.
fn check_domain(values: &[Value], layout: &BucketLayout) -> Result<(), HistogramError> {
    match values.iter().position(|&v| !layout.contains(v)) {
        Some(index) => Err(HistogramError::InvalidInput {
            index,
            value: values[index],
            max_value: layout.max_value(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::logger::Verbosity;

    const S6: [Value; 10] = [10, 40, 70, 100, 120, 0, 30, 60, 90, 115];

    #[test]
    fn fused_run_has_no_trace() {
        let config = PipelineConfig::default();
        let out = run(&S6, &config, Parallelism::Sequential).unwrap();
        assert!(out.trace.is_none());
        assert!(out.timings.map.is_none());
        assert_eq!(out.histogram.counts(), &[3, 2, 2, 3]);
        assert_eq!(out.cumulative.counts(), &[3, 5, 7, 10]);
    }

    #[test]
    fn traced_run_emits_all_phases_in_order() {
        let config = PipelineConfig::default();
        let mut titles = Vec::new();
        let mut sink = |phase: Phase<'_>| -> std::io::Result<()> {
            titles.push(phase.title());
            Ok(())
        };

        let out = run_with_sink(&S6, &config, Parallelism::Parallel, &mut sink).unwrap();

        assert_eq!(
            titles,
            vec!["Fase 1 - Mapeo", "Fase 2 - Reduccion", "Fase 3 - Escaneo"]
        );
        let trace = out.trace.expect("traced run keeps the trace");
        assert_eq!(trace.n_values(), S6.len());
        assert!(trace.is_one_hot());
        assert!(out.timings.map.is_some());
        assert_eq!(out.cumulative.counts(), &[3, 5, 7, 10]);
    }

    #[test]
    fn sink_failure_aborts_run() {
        let config = PipelineConfig::default();
        let mut sink = |phase: Phase<'_>| -> std::io::Result<()> {
            match phase {
                Phase::Reduce(_) => Err(std::io::Error::other("closed")),
                _ => Ok(()),
            }
        };
        let err = run_with_sink(&S6, &config, Parallelism::Sequential, &mut sink).unwrap_err();
        assert!(matches!(err, HistogramError::Sink(_)));
    }

    #[test]
    fn invalid_config_fails_before_any_stage() {
        let mut config = PipelineConfig::default();
        config.max_value = 0;

        let mut emitted = 0;
        let mut sink = |_: Phase<'_>| -> std::io::Result<()> {
            emitted += 1;
            Ok(())
        };
        let err = run_with_sink(&S6, &config, Parallelism::Parallel, &mut sink).unwrap_err();
        assert!(matches!(
            err,
            HistogramError::InvalidConfiguration(ConfigError::ZeroMaxValue)
        ));
        assert_eq!(emitted, 0);
    }

    #[test]
    fn strict_mode_reports_first_out_of_range_value() {
        let config = PipelineConfig::builder().strict(true).build().unwrap();
        let err = run(&[5, 121, 500], &config, Parallelism::Sequential).unwrap_err();
        assert!(matches!(
            err,
            HistogramError::InvalidInput {
                index: 1,
                value: 121,
                max_value: 120
            }
        ));
    }

    #[test]
    fn lenient_mode_clamps_out_of_range_values() {
        let config = PipelineConfig::default();
        let out = run(&[5, 121, 500], &config, Parallelism::Sequential).unwrap();
        assert_eq!(out.histogram.counts(), &[1, 0, 0, 2]);
    }

    #[test]
    fn backends_agree_with_small_chunks() {
        let values: Vec<Value> = (0..5000).map(|i| (i * 7 + i / 3) % 121).collect();
        let config = PipelineConfig::builder()
            .min_chunk_len(17)
            .verbosity(Verbosity::Silent)
            .build()
            .unwrap();

        let seq = run(&values, &config, Parallelism::Sequential).unwrap();
        let par = run(&values, &config, Parallelism::Parallel).unwrap();
        assert_eq!(seq.cumulative, par.cumulative);
        assert_eq!(seq.histogram, par.histogram);
        assert_eq!(par.cumulative.total(), 5000);
    }

    #[test]
    fn timings_total_sums_phases() {
        let timings = PhaseTimings {
            map: Some(Duration::from_millis(1)),
            reduce: Duration::from_millis(2),
            scan: Duration::from_millis(3),
        };
        assert_eq!(timings.total(), Duration::from_millis(6));
        assert_eq!(PhaseTimings::default().total(), Duration::ZERO);
    }
}
