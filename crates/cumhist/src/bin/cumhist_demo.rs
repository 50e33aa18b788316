//! Cumulative histogram demo.
//!
//! Generates exponentially distributed input, sorts it, and computes the
//! cumulative histogram on the parallel and then the sequential backend,
//! printing every phase along the way.
//!
//! Usage:
//!   cargo run --bin cumhist_demo --release -- \[options\]
//!
//! Options:
//!   --n N            Number of input values (default: 10)
//!   --max V          Maximum value (default: 120)
//!   --buckets B      Number of buckets (default: 4)
//!   --seed S         Input seed (default: 42)
//!   --threads T      Threads for the parallel run, 0 = auto (default: 0)
//!   --quiet          Skip the per-phase diagnostics
//!   --verbose        Log per-phase timings to stderr
//!   --json           Print a JSON report instead of the console text
//!
//! Examples:
//!   cargo run --bin cumhist_demo
//!   cargo run --bin cumhist_demo --release -- --n 1000000 --buckets 16 --quiet

use std::error::Error;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use serde::Serialize;

use cumhist::testing::data::{DEFAULT_RATE, exponential_values};
use cumhist::{
    BucketLayout, CumulativeHistogram, Histogram, HistogramError, PhaseTimings, PipelineConfig,
    PipelineOutput, Value, Verbosity, run, run_with_threads,
};

const RULE: &str = "========================================";

const HELP: &str = "cumhist_demo\n\n  --n <n>          Number of input values (default: 10)\n  --max <v>        Maximum value (default: 120)\n  --buckets <b>    Number of buckets (default: 4)\n  --seed <s>       Input seed (default: 42)\n  --threads <t>    Threads for the parallel run, 0 = auto (default: 0)\n  --quiet          Skip the per-phase diagnostics\n  --verbose        Log per-phase timings to stderr\n  --json           Print a JSON report instead of the console text";

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone)]
struct Args {
    n: usize,
    max_value: Value,
    n_buckets: usize,
    seed: u64,
    threads: usize,
    quiet: bool,
    verbose: bool,
    json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            n: 10,
            max_value: 120,
            n_buckets: 4,
            seed: 42,
            threads: 0,
            quiet: false,
            verbose: false,
            json: false,
        }
    }
}

enum Parsed {
    Run(Args),
    Help,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Parsed, String> {
    fn value<T: std::str::FromStr>(
        it: &mut impl Iterator<Item = String>,
        flag: &str,
    ) -> Result<T, String> {
        let raw = it.next().ok_or_else(|| format!("{flag} expects a value"))?;
        raw.parse()
            .map_err(|_| format!("invalid value for {flag}: {raw}"))
    }

    let mut args = Args::default();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--n" => args.n = value(&mut it, "--n")?,
            "--max" => args.max_value = value(&mut it, "--max")?,
            "--buckets" => args.n_buckets = value(&mut it, "--buckets")?,
            "--seed" => args.seed = value(&mut it, "--seed")?,
            "--threads" => args.threads = value(&mut it, "--threads")?,
            "--quiet" => args.quiet = true,
            "--verbose" => args.verbose = true,
            "--json" => args.json = true,
            "--help" | "-h" => return Ok(Parsed::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(Parsed::Run(args))
}

// =============================================================================
// Report
// =============================================================================

#[derive(Serialize)]
struct BackendReport {
    backend: &'static str,
    histogram: Histogram,
    cumulative: CumulativeHistogram,
    timings: PhaseTimings,
    elapsed_secs: f64,
}

impl BackendReport {
    fn new(backend: &'static str, output: PipelineOutput, elapsed: Duration) -> Self {
        Self {
            backend,
            histogram: output.histogram,
            cumulative: output.cumulative,
            timings: output.timings,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

#[derive(Serialize)]
struct Report {
    n_buckets: usize,
    max_value: Value,
    width: u64,
    ranges: Vec<(i64, i64)>,
    seed: u64,
    input: Vec<Value>,
    parallel: BackendReport,
    sequential: BackendReport,
    matches: bool,
}

// =============================================================================
// Console output
// =============================================================================

fn banner(title: &str) {
    println!("{RULE}");
    println!("   {title}");
    println!("{RULE}");
}

fn print_ranges(layout: &BucketLayout) {
    println!();
    banner("CONFIGURACION DE RANGOS");
    println!("Numero de rangos: {}", layout.n_buckets());
    println!();
    for (i, (low, high)) in layout.all_bounds().enumerate() {
        println!("  Rango {}: [{} - {}]", i + 1, low, high);
    }
    println!();
}

fn print_input(values: &[Value]) {
    let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    println!("Datos de entrada: {{ {} }}", joined.join(", "));
    println!();
}

fn print_result(output: &PipelineOutput, elapsed: Duration) {
    println!("Resultado: {}", output.cumulative);
    println!();
    println!("Tiempo transcurrido: {} seg", elapsed.as_secs_f64());
    println!("{RULE}");
    println!();
}

// =============================================================================
// Main
// =============================================================================

/// Run on a pool of `n_threads`, timing only the pipeline inside the pool.
fn timed_run(
    n_threads: usize,
    values: &[Value],
    config: &PipelineConfig,
) -> Result<(PipelineOutput, Duration), HistogramError> {
    run_with_threads(n_threads, |parallelism| {
        let started = Instant::now();
        let output = run(values, config, parallelism)?;
        Ok::<_, HistogramError>((output, started.elapsed()))
    })?
}

fn execute(args: &Args) -> Result<(), Box<dyn Error>> {
    let verbosity = if args.verbose {
        Verbosity::Debug
    } else {
        Verbosity::Silent
    };
    let config = PipelineConfig::builder()
        .n_buckets(args.n_buckets)
        .max_value(args.max_value)
        .trace(!args.quiet && !args.json)
        .verbosity(verbosity)
        .build()?;
    let layout = config.layout()?;

    let mut values = exponential_values(args.n, args.max_value, DEFAULT_RATE, args.seed)?;
    values.sort_unstable();

    if !args.json {
        print_ranges(&layout);
        if config.trace {
            print_input(&values);
        }
        banner("EJECUCION PARALELA");
    }
    let (parallel, parallel_elapsed) = timed_run(args.threads, &values, &config)?;
    if !args.json {
        print_result(&parallel, parallel_elapsed);
        banner("EJECUCION SECUENCIAL");
    }

    let (sequential, sequential_elapsed) = timed_run(1, &values, &config)?;
    if !args.json {
        print_result(&sequential, sequential_elapsed);
    }

    let matches = parallel.cumulative == sequential.cumulative;
    if args.json {
        let report = Report {
            n_buckets: layout.n_buckets(),
            max_value: layout.max_value(),
            width: layout.width(),
            ranges: layout.all_bounds().collect(),
            seed: args.seed,
            input: values,
            parallel: BackendReport::new("parallel", parallel, parallel_elapsed),
            sequential: BackendReport::new("sequential", sequential, sequential_elapsed),
            matches,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Resultados coinciden: {}",
            if matches { "si" } else { "no" }
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            eprintln!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {msg}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
