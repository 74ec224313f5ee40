//! Result aggregation, progress snapshots and the final report.

mod progress;
mod summary;

pub use progress::{render_status_line, ProgressSnapshot, DEFAULT_BAR_WIDTH};
pub use summary::{Disposition, FailedItem, RunSummary};

/// Final report lines: totals, then up to `preview_limit` failures and a
/// remainder count when there are more.
pub fn render_report(summary: &RunSummary, preview_limit: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Done in {:.1}s: downloaded {}, skipped {}, errors {}.",
        summary.elapsed_secs(),
        summary.downloaded,
        summary.skipped,
        summary.failed.len()
    )];
    if summary.failed.is_empty() {
        return lines;
    }
    lines.push("Some files failed to download:".to_string());
    for item in summary.failed.iter().take(preview_limit) {
        lines.push(format!("  - {}: {}", item.name, item.reason));
    }
    if summary.failed.len() > preview_limit {
        lines.push(format!("  ... and {} more.", summary.failed.len() - preview_limit));
    }
    lines
}
