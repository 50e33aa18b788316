/// Input lengths shared by all suites.
pub const INPUT_SIZES: &[usize] = &[10_000, 1_000_000];

/// Bucket counts: the reference layout and one wider than a scan chunk.
pub const BUCKET_COUNTS: &[usize] = &[4, 256];

/// Thread counts for scaling benchmarks.
pub const THREAD_COUNTS: &[usize] = &[1, 2, 4, 8];

pub const MAX_VALUE: u32 = 120;
pub const SEED: u64 = 42;
