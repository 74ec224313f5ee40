//! End-to-end run: list → schedule → aggregate.
//!
//! Fatal problems (listing failure, nothing to do, target dir unusable) come
//! back as `InstallError` before any asset is fetched. Per-item failures only
//! show up in the returned `RunSummary`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

use crate::error::InstallError;
use crate::fetcher::{fetch_item, FetchOutcome, Transport};
use crate::listing::{list_manifest, ListingSource};
use crate::manifest::ManifestEntry;
use crate::report::{ProgressSnapshot, RunSummary};
use crate::scheduler::run_pool;

/// Parameters for one download run.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Directory receiving the assets (created if absent).
    pub target_dir: PathBuf,
    /// Re-download files that already exist.
    pub overwrite: bool,
    /// Maximum concurrent fetches; clamped to at least 1.
    pub concurrency: usize,
}

/// Lists `tag` and returns a non-empty manifest.
pub fn resolve_manifest<S: ListingSource + ?Sized>(
    source: &S,
    tag: &str,
    extension: &str,
) -> Result<Vec<ManifestEntry>, InstallError> {
    let manifest = list_manifest(source, tag, extension)?;
    if manifest.is_empty() {
        return Err(InstallError::EmptyManifest {
            tag: tag.to_string(),
        });
    }
    Ok(manifest)
}

/// Fetches every entry of `manifest` into `req.target_dir` and returns the
/// completed summary. Always runs to exhaustion; item failures never abort.
///
/// Blocks the calling thread. When `progress` is set, a snapshot is offered
/// after each outcome without waiting for the receiver; the final snapshot is
/// delivered with a blocking send, so call this from `spawn_blocking` (never
/// directly inside an async task).
pub fn run_downloads<T>(
    manifest: Vec<ManifestEntry>,
    transport: Arc<T>,
    req: &InstallRequest,
    progress: Option<Sender<ProgressSnapshot>>,
) -> Result<RunSummary, InstallError>
where
    T: Transport + 'static,
{
    std::fs::create_dir_all(&req.target_dir)?;

    let started = Instant::now();
    let expected: Vec<String> = manifest.iter().map(|e| e.name.clone()).collect();
    offer(&progress, RunSummary::new(expected.len()).snapshot());

    let dir = req.target_dir.clone();
    let overwrite = req.overwrite;
    let stream = run_pool(manifest, req.concurrency, move |entry| {
        fetch_item(transport.as_ref(), &dir, entry, overwrite)
    })?;
    tracing::info!(
        total = stream.total(),
        workers = stream.worker_count(),
        overwrite = req.overwrite,
        dir = %req.target_dir.display(),
        "starting downloads"
    );

    let mut summary = collect_outcomes(stream, &expected, &progress);
    summary.finish(started.elapsed());

    if let Some(tx) = progress {
        let _ = tx.blocking_send(summary.snapshot());
    }
    tracing::info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        elapsed_secs = summary.elapsed_secs(),
        "downloads finished"
    );
    Ok(summary)
}

/// Reason recorded for an entry the pool never reported on.
pub const NO_OUTCOME_REASON: &str = "no outcome reported";

/// Records outcomes for the `expected` names, offering a snapshot after each.
///
/// The result is always complete: an outcome for an unknown or already
/// reported name is logged and ignored, and names still pending when the
/// outcomes run out are recorded as failed with [`NO_OUTCOME_REASON`].
fn collect_outcomes<I>(
    outcomes: I,
    expected: &[String],
    progress: &Option<Sender<ProgressSnapshot>>,
) -> RunSummary
where
    I: IntoIterator<Item = FetchOutcome>,
{
    let mut summary = RunSummary::new(expected.len());
    let mut pending: HashMap<&str, usize> = HashMap::new();
    for name in expected {
        *pending.entry(name.as_str()).or_insert(0) += 1;
    }

    for outcome in outcomes {
        match pending.get_mut(outcome.name()) {
            Some(left) if *left > 0 => *left -= 1,
            _ => {
                tracing::error!(name = %outcome.name(), "ignoring unexpected outcome");
                continue;
            }
        }
        if let FetchOutcome::Failed { name, reason } = &outcome {
            tracing::debug!(%name, %reason, "fetch failed");
        }
        summary.record(outcome);
        offer(progress, summary.snapshot());
    }

    if !summary.is_complete() {
        tracing::error!(
            total = summary.total,
            done = summary.done(),
            "outcome stream ended early"
        );
        for name in expected {
            if let Some(left) = pending.get_mut(name.as_str()) {
                if *left > 0 {
                    *left -= 1;
                    summary.record(FetchOutcome::Failed {
                        name: name.clone(),
                        reason: NO_OUTCOME_REASON.to_string(),
                    });
                }
            }
        }
    }
    summary
}

fn offer(progress: &Option<Sender<ProgressSnapshot>>, snap: ProgressSnapshot) {
    if let Some(tx) = progress {
        if let Err(TrySendError::Closed(_)) = tx.try_send(snap) {
            tracing::debug!("progress receiver closed");
        }
    }
}
