//! Run summary built from the outcome stream.

use std::time::Duration;

use crate::fetcher::FetchOutcome;

use super::progress::ProgressSnapshot;

/// One failed entry with its human-readable cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub name: String,
    pub reason: String,
}

/// How the run ended once every outcome is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No entry failed.
    Success,
    /// The run completed but at least one entry failed.
    PartialFailure,
}

impl Disposition {
    /// Process exit code: 0 for success, 2 for a run with failures.
    pub fn exit_code(self) -> i32 {
        match self {
            Disposition::Success => 0,
            Disposition::PartialFailure => 2,
        }
    }
}

/// Counters and failure detail for one run. Owned by the single consumer of
/// the outcome stream, so it needs no locking.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub downloaded: usize,
    pub skipped: usize,
    /// Failures in the order they were reported.
    pub failed: Vec<FailedItem>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            downloaded: 0,
            skipped: 0,
            failed: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Count one outcome. Each outcome must be recorded exactly once.
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded { .. } => self.downloaded += 1,
            FetchOutcome::Skipped { .. } => self.skipped += 1,
            FetchOutcome::Failed { name, reason } => self.failed.push(FailedItem { name, reason }),
        }
    }

    /// Outcomes recorded so far.
    pub fn done(&self) -> usize {
        self.downloaded + self.skipped + self.failed.len()
    }

    /// True once every entry has an outcome.
    pub fn is_complete(&self) -> bool {
        self.done() == self.total
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            done: self.done(),
            total: self.total,
            downloaded: self.downloaded,
            skipped: self.skipped,
            failed: self.failed.len(),
        }
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn disposition(&self) -> Disposition {
        if self.failed.is_empty() {
            Disposition::Success
        } else {
            Disposition::PartialFailure
        }
    }
}
