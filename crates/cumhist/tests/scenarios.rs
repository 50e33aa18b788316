//! Literal input scenarios over the reference layout (B = 4, V = 120, W = 30).
//!
//! Every scenario runs on both backends and in both the fused and the traced
//! mode; all four combinations must agree exactly.

use rstest::rstest;

use cumhist::{
    Count, Parallelism, Phase, PipelineConfig, PipelineOutput, Value, run, run_with_sink,
    run_with_threads,
};

fn execute(values: &[Value], parallelism: Parallelism, traced: bool) -> PipelineOutput {
    // Small chunks so the parallel backend actually splits the short inputs.
    let config = PipelineConfig::builder().min_chunk_len(2).build().unwrap();
    if traced {
        let mut discard = |_: Phase<'_>| -> std::io::Result<()> { Ok(()) };
        run_with_sink(values, &config, parallelism, &mut discard).unwrap()
    } else {
        run(values, &config, parallelism).unwrap()
    }
}

#[rstest]
#[case::empty(&[], [0, 0, 0, 0], [0, 0, 0, 0])]
#[case::zero(&[0], [1, 0, 0, 0], [1, 1, 1, 1])]
#[case::max_value(&[120], [0, 0, 0, 1], [0, 0, 0, 1])]
#[case::bucket_edges(&[1, 30, 31, 60, 61, 90, 91, 120], [2, 2, 2, 2], [2, 4, 6, 8])]
#[case::repeated(&[5, 5, 5, 5, 5], [5, 0, 0, 0], [5, 5, 5, 5])]
#[case::mixed(&[10, 40, 70, 100, 120, 0, 30, 60, 90, 115], [3, 2, 2, 3], [3, 5, 7, 10])]
fn scenario(
    #[case] values: &[Value],
    #[case] histogram: [Count; 4],
    #[case] cumulative: [Count; 4],
    #[values(Parallelism::Sequential, Parallelism::Parallel)] parallelism: Parallelism,
    #[values(false, true)] traced: bool,
) {
    let out = execute(values, parallelism, traced);

    assert_eq!(out.histogram.counts(), &histogram);
    assert_eq!(out.cumulative.counts(), &cumulative);
    assert_eq!(out.trace.is_some(), traced);
}

#[rstest]
#[case::sorted(&[0, 10, 30, 40, 60, 70, 90, 100, 115, 120])]
#[case::reversed(&[120, 115, 100, 90, 70, 60, 40, 30, 10, 0])]
fn input_order_does_not_matter(#[case] values: &[Value]) {
    let out = execute(values, Parallelism::Parallel, false);
    assert_eq!(out.cumulative.counts(), &[3, 5, 7, 10]);
}

#[test]
fn traced_rows_match_classifier() {
    let values = [1, 30, 31, 60, 61, 90, 91, 120];
    let out = execute(&values, Parallelism::Parallel, true);
    let trace = out.trace.unwrap();

    assert!(trace.is_one_hot());
    let buckets: Vec<_> = (0..values.len()).map(|i| trace.bucket_of(i).unwrap()).collect();
    assert_eq!(buckets, vec![0, 0, 1, 1, 2, 2, 3, 3]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn explicit_thread_pools(#[case] n_threads: usize) {
    let values = [10, 40, 70, 100, 120, 0, 30, 60, 90, 115];
    let config = PipelineConfig::builder().min_chunk_len(1).build().unwrap();

    let out = run_with_threads(n_threads, |parallelism| run(&values, &config, parallelism))
        .unwrap()
        .unwrap();
    assert_eq!(out.cumulative.counts(), &[3, 5, 7, 10]);
}

#[test]
fn console_sink_renders_reference_run() {
    let values = [10, 40, 70, 100, 120, 0, 30, 60, 90, 115];
    let config = PipelineConfig::default();
    let mut sink = cumhist::ConsoleSink::new(Vec::new());

    let out = run_with_sink(&values, &config, Parallelism::Sequential, &mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();

    assert!(text.starts_with(">>> Fase 1 - Mapeo:\n[ 1; 0; 0; 0; ]\n[ 0; 1; 0; 0; ]\n"));
    assert!(text.contains("\n>>> Fase 2 - Reduccion:\n[ 3; 2; 2; 3; ]\n"));
    assert!(text.ends_with("\n>>> Fase 3 - Escaneo:\n"));
    assert_eq!(format!("{}", out.cumulative), "[ 3; 5; 7; 10; ]");
}
