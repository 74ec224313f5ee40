//! Download scheduler.
//!
//! Runs a fixed number of OS worker threads over the manifest. Outcomes come
//! back on a channel in completion order, which is unspecified.

mod pool;

pub use pool::{run_pool, OutcomeStream, WORKER_THREAD_PREFIX};

/// Default worker count: available parallelism, capped at `cap` (and at least 1).
pub fn default_concurrency(cap: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    cpus.min(cap).max(1)
}
