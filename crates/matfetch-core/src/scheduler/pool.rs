//! Fixed-size worker pool over a shared work queue.

use std::any::Any;
use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::fetcher::FetchOutcome;
use crate::manifest::ManifestEntry;

/// Name prefix of pool threads (`matfetch-worker-<n>`).
pub const WORKER_THREAD_PREFIX: &str = "matfetch-worker-";

type WorkQueue = Arc<Mutex<VecDeque<ManifestEntry>>>;

/// Unordered outcomes of a pool run. Yields exactly one outcome per submitted
/// entry, then ends. Worker threads are joined when the stream is exhausted or
/// dropped; dropping early cancels entries not yet started.
pub struct OutcomeStream {
    rx: mpsc::Receiver<FetchOutcome>,
    queue: WorkQueue,
    workers: Vec<JoinHandle<()>>,
    total: usize,
}

impl OutcomeStream {
    /// Number of entries submitted (and outcomes to expect).
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of worker threads actually running.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("fetch worker exited abnormally");
            }
        }
    }
}

impl Iterator for OutcomeStream {
    type Item = FetchOutcome;

    fn next(&mut self) -> Option<FetchOutcome> {
        match self.rx.recv() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                // All senders gone: every worker has finished.
                self.join_workers();
                None
            }
        }
    }
}

impl Drop for OutcomeStream {
    fn drop(&mut self) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.join_workers();
    }
}

/// Runs `fetch` over `entries` with at most `concurrency` calls in flight.
///
/// `concurrency` is clamped to `1..=entries.len()`. Each entry is handed to
/// exactly one worker; a panic inside `fetch` becomes a `Failed` outcome for
/// that entry and the worker carries on with the next one.
///
/// Fails only if no worker thread could be started.
pub fn run_pool<F>(entries: Vec<ManifestEntry>, concurrency: usize, fetch: F) -> io::Result<OutcomeStream>
where
    F: Fn(&ManifestEntry) -> FetchOutcome + Send + Sync + 'static,
{
    let total = entries.len();
    let num_workers = concurrency.max(1).min(total.max(1));
    let queue: WorkQueue = Arc::new(Mutex::new(entries.into_iter().collect()));
    let fetch = Arc::new(fetch);
    let (tx, rx) = mpsc::channel();

    let mut workers = Vec::with_capacity(num_workers);
    for i in 0..num_workers {
        let queue = Arc::clone(&queue);
        let fetch = Arc::clone(&fetch);
        let tx = tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("{}{}", WORKER_THREAD_PREFIX, i))
            .spawn(move || worker_loop(&queue, fetch.as_ref(), &tx));
        match spawned {
            Ok(handle) => workers.push(handle),
            Err(e) if workers.is_empty() => return Err(e),
            Err(e) => {
                tracing::warn!(started = workers.len(), "could not start more workers: {}", e);
                break;
            }
        }
    }
    drop(tx);

    tracing::debug!(total, workers = workers.len(), "fetch pool started");
    Ok(OutcomeStream {
        rx,
        queue,
        workers,
        total,
    })
}

fn worker_loop<F>(queue: &Mutex<VecDeque<ManifestEntry>>, fetch: &F, tx: &mpsc::Sender<FetchOutcome>)
where
    F: Fn(&ManifestEntry) -> FetchOutcome,
{
    loop {
        // Lock is released before fetching.
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(entry) = next else {
            break;
        };
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| fetch(&entry))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let reason = format!("unexpected fault: {}", panic_message(payload.as_ref()));
                tracing::error!(name = %entry.name, "{}", reason);
                FetchOutcome::Failed {
                    name: entry.name.clone(),
                    reason,
                }
            }
        };
        if tx.send(outcome).is_err() {
            // Consumer went away; stop taking work.
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
