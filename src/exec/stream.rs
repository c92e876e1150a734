//! Host execution stream backed by a rayon thread pool
//!
//! A stream is an ordering token: every bulk pass issued through `install`
//! completes before `install` returns, so pass *k+1* always observes the full
//! result of pass *k*.

use crate::config::KernelConfig;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(0);

/// Host-side execution context
///
/// Cloning yields a handle to the same stream (same id, same pool).
///
/// # Example
///
/// ```
/// use trueno_csr::{HostStream, KernelConfig};
///
/// let stream = HostStream::new(KernelConfig::default().with_num_threads(2)).unwrap();
/// assert_eq!(stream.num_threads(), 2);
/// let sum: u32 = stream.install(|| (1..=4).sum());
/// assert_eq!(sum, 10);
/// ```
#[derive(Debug, Clone)]
pub struct HostStream {
    id: u64,
    pool: Option<Arc<rayon::ThreadPool>>,
    config: KernelConfig,
}

impl HostStream {
    /// Create a stream from configuration
    ///
    /// With `num_threads` set, the stream owns a dedicated pool; otherwise it
    /// issues work on rayon's global pool.
    ///
    /// # Errors
    ///
    /// Returns error if the dedicated thread pool cannot be built
    pub fn new(config: KernelConfig) -> Result<Self> {
        let id = NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed);

        let pool = match config.num_threads {
            Some(threads) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(move |i| format!("trueno-csr-{id}-{i}"))
                    .build()
                    .context("Failed to build stream thread pool")?,
            )),
            None => None,
        };

        Ok(Self { id, pool, config })
    }

    /// Stream on rayon's global pool with default configuration
    #[must_use]
    pub fn global() -> Self {
        Self {
            id: NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed),
            pool: None,
            config: KernelConfig::default(),
        }
    }

    /// Stream identifier (used in log output)
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Stream configuration
    #[must_use]
    pub const fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Number of worker threads available to passes on this stream
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |pool| pool.current_num_threads())
    }

    /// Whether an input of `len` elements is large enough to run in parallel
    #[must_use]
    pub const fn is_parallel(&self, len: usize) -> bool {
        len >= self.config.parallel_threshold
    }

    /// Run one bulk pass on this stream and wait for it
    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Wait for all work queued on this stream
    ///
    /// Passes complete inside `install`, so there is never outstanding work.
    pub fn synchronize(&self) {
        trace!(stream = self.id, "synchronize");
    }
}

impl Default for HostStream {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_stream_ids_are_unique() {
        let a = HostStream::global();
        let b = HostStream::global();
        assert_ne!(a.id(), b.id());

        let c = a.clone();
        assert_eq!(a.id(), c.id());
    }

    #[test]
    fn test_dedicated_pool_runs_passes() {
        let stream = HostStream::new(KernelConfig::default().with_num_threads(3)).unwrap();
        assert_eq!(stream.num_threads(), 3);

        let total: u64 = stream.install(|| (0..1000_u64).into_par_iter().sum());
        assert_eq!(total, 499_500);
        stream.synchronize();
    }

    #[test]
    fn test_parallel_threshold() {
        let stream =
            HostStream::new(KernelConfig::default().with_parallel_threshold(10)).unwrap();
        assert!(!stream.is_parallel(9));
        assert!(stream.is_parallel(10));
    }
}
