//! Deterministic input generators for tests, benchmarks and the demo.

pub mod data;
