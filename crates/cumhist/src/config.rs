//! Pipeline configuration with builder pattern.
//!
//! [`PipelineConfig`] holds the bucket geometry (`n_buckets`, `max_value`)
//! together with the execution options of a run. The builder is generated by
//! `bon` and validates the record at build time.
//!
//! # Example
//!
//! ```
//! use cumhist::PipelineConfig;
//! use cumhist::logger::Verbosity;
//!
//! // Reference configuration: 4 buckets over [0, 120]
//! let config = PipelineConfig::builder().build().unwrap();
//! assert_eq!(config.layout().unwrap().width(), 30);
//!
//! // Diagnostic run with a custom range
//! let config = PipelineConfig::builder()
//!     .n_buckets(8)
//!     .max_value(1000)
//!     .trace(true)
//!     .verbosity(Verbosity::Debug)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::bucket::{BucketLayout, Value};
use crate::error::ConfigError;
use crate::logger::Verbosity;

/// Default minimum number of input values handed to a single task.
pub const DEFAULT_MIN_CHUNK_LEN: usize = 1024;

/// Configuration for a cumulative-histogram run.
///
/// Fields are public; [`run`](crate::pipeline::run) re-validates before any
/// stage executes, so a record edited after building still fails cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PipelineConfig {
    // === Bucket geometry ===
    /// Number of buckets `B`. Default: 4.
    #[builder(default = 4)]
    pub n_buckets: usize,

    /// Maximum expected value `V`. Default: 120.
    #[builder(default = 120)]
    pub max_value: Value,

    // === Diagnostics ===
    /// Materialise the one-hot trace and report every phase. Default: `false`.
    ///
    /// When off, the map stage is fused into the reduce stage and no
    /// `N x B` intermediate is allocated.
    #[builder(default)]
    pub trace: bool,

    /// Reject values above `max_value` instead of clamping them into the last
    /// bucket. Default: `false`.
    #[builder(default)]
    pub strict: bool,

    // === Scheduling ===
    /// Minimum number of input values per task. Default: 1024.
    #[builder(default = DEFAULT_MIN_CHUNK_LEN)]
    pub min_chunk_len: usize,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: pipeline_config_builder::IsComplete> PipelineConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - `n_buckets == 0`
    /// - `max_value == 0`
    /// - `min_chunk_len == 0`
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout()?;
        if self.min_chunk_len == 0 {
            return Err(ConfigError::ZeroChunkLength);
        }
        Ok(())
    }

    /// Bucket geometry derived from `n_buckets` and `max_value`.
    pub fn layout(&self) -> Result<BucketLayout, ConfigError> {
        BucketLayout::new(self.n_buckets, self.max_value)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}
