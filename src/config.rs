//! Kernel configuration
//!
//! Tunables for the host backend. Defaults work for
//! most graphs; `from_env` lets deployments override them without recompiling.

use crate::error::OffsetError;

/// Inputs shorter than this run their passes sequentially
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 14;

/// Elements per block in the host scan and histogram passes
pub const DEFAULT_SCAN_BLOCK: usize = 1 << 16;

/// Environment variable overriding `num_threads`
pub const ENV_NUM_THREADS: &str = "TRUENO_CSR_NUM_THREADS";

/// Environment variable overriding `parallel_threshold`
pub const ENV_PARALLEL_THRESHOLD: &str = "TRUENO_CSR_PARALLEL_THRESHOLD";

/// Environment variable overriding `scan_block_size`
pub const ENV_SCAN_BLOCK: &str = "TRUENO_CSR_SCAN_BLOCK";

/// Kernel tunables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Worker threads for a dedicated host stream (`None` = rayon global pool)
    pub num_threads: Option<usize>,

    /// Minimum input length before passes go parallel
    pub parallel_threshold: usize,

    /// Block length for blocked scan and histogram passes
    pub scan_block_size: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            scan_block_size: DEFAULT_SCAN_BLOCK,
        }
    }
}

impl KernelConfig {
    /// Build configuration from defaults overridden by environment variables
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::InvalidConfig` if a variable is set but is not a
    /// positive integer
    pub fn from_env() -> Result<Self, OffsetError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::InvalidConfig` on malformed values
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OffsetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(threads) = parse_positive(&lookup, ENV_NUM_THREADS)? {
            config.num_threads = Some(threads);
        }
        if let Some(threshold) = parse_positive(&lookup, ENV_PARALLEL_THRESHOLD)? {
            config.parallel_threshold = threshold;
        }
        if let Some(block) = parse_positive(&lookup, ENV_SCAN_BLOCK)? {
            config.scan_block_size = block;
        }

        Ok(config)
    }

    /// Set a dedicated thread count
    #[must_use]
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads.max(1));
        self
    }

    /// Set the parallel threshold
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the scan block length (clamped to at least 1)
    #[must_use]
    pub fn with_scan_block_size(mut self, block: usize) -> Self {
        self.scan_block_size = block.max(1);
        self
    }
}

fn parse_positive<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, OffsetError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(OffsetError::InvalidConfig { key, value: raw }),
        },
    }
}
