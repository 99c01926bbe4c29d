//! Utilities for parallelism
//!
//! A [`Device`] is the worker pool a parallel post-process is dispatched onto. Every launch
//! runs to completion inside [`Device::install`]; there is no partial progress to resume.
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::Result;

/// Worker pool the parallel post-process runs on.
#[derive(Debug, Default)]
pub struct Device {
    pool: Option<ThreadPool>,
}

impl Device {
    /// Runs launches on the global rayon pool
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Starts a dedicated pool of `num_threads` workers.
    ///
    /// `num_threads == 0` lets rayon pick the worker count.
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("halfspec-worker-{i}"))
            .build()?;
        debug!(threads = pool.current_num_threads(), "started worker pool");
        Ok(Self { pool: Some(pool) })
    }

    /// Workers available to a launch
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Runs `op` with this device's pool as the current rayon pool
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
