use rand::prelude::*;
use rand_distr::{Exp, ExpError};

use crate::bucket::Value;

/// Rate of the exponential input used by the demo.
pub const DEFAULT_RATE: f64 = 0.05;

/// Generate `n` exponentially distributed values in `[0, max_value]`.
///
/// Samples of `Exp(rate)` are truncated toward zero and clamped to
/// `max_value`, so small values dominate and the last bucket collects the tail.
///
/// # Errors
///
/// Returns [`ExpError`] if `rate` is not positive.
pub fn exponential_values(
    n: usize,
    max_value: Value,
    rate: f64,
    seed: u64,
) -> Result<Vec<Value>, ExpError> {
    let exp = Exp::new(rate)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let max = f64::from(max_value);
    Ok((0..n)
        .map(|_| exp.sample(&mut rng).min(max) as Value)
        .collect())
}

/// Generate `n` values uniform in `[0, max_value]`.
pub fn uniform_values(n: usize, max_value: Value, seed: u64) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..=max_value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_is_deterministic_and_in_range() {
        let a = exponential_values(1000, 120, DEFAULT_RATE, 7).unwrap();
        let b = exponential_values(1000, 120, DEFAULT_RATE, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|&v| v <= 120));

        // Mean of Exp(0.05) is 20, so most mass sits in the first bucket.
        let low = a.iter().filter(|&&v| v <= 30).count();
        assert!(low > 700, "low={low}");
    }

    #[test]
    fn exponential_rejects_bad_rate() {
        assert!(exponential_values(10, 120, -1.0, 0).is_err());
    }

    #[test]
    fn uniform_covers_range() {
        let values = uniform_values(5000, 10, 3);
        assert_eq!(values, uniform_values(5000, 10, 3));
        assert!(values.iter().all(|&v| v <= 10));
        assert!(values.contains(&0));
        assert!(values.contains(&10));
    }

    #[test]
    fn empty() {
        assert!(uniform_values(0, 10, 1).is_empty());
        assert!(exponential_values(0, 10, 1.0, 1).unwrap().is_empty());
    }
}
