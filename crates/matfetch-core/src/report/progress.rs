//! Progress snapshots and the single-line status indicator.
//!
//! Snapshots carry cumulative counts, so a consumer that misses some still
//! renders the right numbers from the next one.

/// Counts after some number of outcomes (CLI-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    /// Entries with an outcome so far.
    pub done: usize,
    /// Entries in the manifest.
    pub total: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProgressSnapshot {
    /// Fraction complete in [0.0, 1.0]. An empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// Bar width used by the CLI.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// `[#####-----] done/total d:N s:N e:N` with a bar of `width` cells.
pub fn render_status_line(snap: &ProgressSnapshot, width: usize) -> String {
    let filled = ((snap.fraction() * width as f64) as usize).min(width);
    format!(
        "[{}{}] {}/{} d:{} s:{} e:{}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        snap.done,
        snap.total,
        snap.downloaded,
        snap.skipped,
        snap.failed
    )
}
