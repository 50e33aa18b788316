//! Diagnostic output of per-phase artifacts.
//!
//! When tracing is enabled the driver hands each phase's artifact to a
//! [`PhaseSink`] as soon as the phase completes. [`ConsoleSink`] renders the
//! console format:
//!
//! ```text
//! >>> Fase 1 - Mapeo:
//! [ 1; 0; 0; 0; ]
//! [ 0; 1; 0; 0; ]
//!
//! >>> Fase 2 - Reduccion:
//! [ 1; 1; 0; 0; ]
//!
//! >>> Fase 3 - Escaneo:
//! ```

use std::io::{self, Write};

use crate::histogram::{CumulativeHistogram, Histogram};
use crate::trace::OneHotTrace;

/// Artifact produced by one pipeline phase.
#[derive(Clone, Copy, Debug)]
pub enum Phase<'a> {
    Map(&'a OneHotTrace),
    Reduce(&'a Histogram),
    Scan(&'a CumulativeHistogram),
}

impl Phase<'_> {
    /// Console heading of this phase.
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Map(_) => "Fase 1 - Mapeo",
            Phase::Reduce(_) => "Fase 2 - Reduccion",
            Phase::Scan(_) => "Fase 3 - Escaneo",
        }
    }
}

/// Receiver of per-phase artifacts.
pub trait PhaseSink {
    fn emit(&mut self, phase: Phase<'_>) -> io::Result<()>;
}

impl<F> PhaseSink for F
where
    F: FnMut(Phase<'_>) -> io::Result<()>,
{
    fn emit(&mut self, phase: Phase<'_>) -> io::Result<()> {
        self(phase)
    }
}

/// Writes phases in the console format to any [`Write`].
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PhaseSink for ConsoleSink<W> {
    fn emit(&mut self, phase: Phase<'_>) -> io::Result<()> {
        // Map opens the report; later phases are separated by a blank line.
        if !matches!(phase, Phase::Map(_)) {
            writeln!(self.out)?;
        }
        writeln!(self.out, ">>> {}:", phase.title())?;
        match phase {
            Phase::Map(trace) => {
                if trace.n_values() > 0 {
                    writeln!(self.out, "{}", trace)?;
                }
            }
            Phase::Reduce(histogram) => writeln!(self.out, "{}", histogram)?,
            Phase::Scan(_) => {}
        }
        self.out.flush()
    }
}
