//! `matfetch install` – list, download missing assets, report.

use anyhow::Result;
use matfetch_core::config::MatfetchConfig;
use matfetch_core::fetcher::CurlTransport;
use matfetch_core::install::{resolve_manifest, run_downloads, InstallRequest};
use matfetch_core::listing::CurlListing;
use matfetch_core::report::{self, ProgressSnapshot, DEFAULT_BAR_WIDTH};
use matfetch_core::scheduler::default_concurrency;
use std::io::Write;
use std::sync::Arc;

use crate::cli::TargetArgs;

/// Runs one install and returns the exit code (0 success, 2 some items failed).
/// Listing failures and an empty manifest are returned as errors (exit 1).
pub async fn run_install(
    cfg: &MatfetchConfig,
    target: &TargetArgs,
    overwrite: bool,
    workers: Option<usize>,
) -> Result<i32> {
    let http = cfg.http();
    let target_dir = target.target_dir(cfg);
    let concurrency = workers.unwrap_or_else(|| default_concurrency(cfg.max_default_workers));

    println!("Listing matcaps at resolution {} ...", target.res);
    let listing = CurlListing::new(cfg.listing_url.clone(), http.clone());
    let tag = target.res.clone();
    let extension = cfg.asset_extension.clone();
    let manifest = tokio::task::spawn_blocking(move || resolve_manifest(&listing, &tag, &extension))
        .await
        .map_err(|e| anyhow::anyhow!("listing task join: {}", e))??;
    println!(
        "Found {} {} files.",
        manifest.len(),
        cfg.asset_extension.trim_start_matches('.').to_uppercase()
    );

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressSnapshot>(64);
    let progress_handle = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(snap) = progress_rx.recv().await {
            let line = report::render_status_line(&snap, DEFAULT_BAR_WIDTH);
            let _ = write!(stdout, "\r{}", line);
            let _ = stdout.flush();
        }
        println!();
    });

    let req = InstallRequest {
        target_dir,
        overwrite,
        concurrency,
    };
    let transport = Arc::new(CurlTransport::new(http));
    let result =
        tokio::task::spawn_blocking(move || run_downloads(manifest, transport, &req, Some(progress_tx)))
            .await
            .map_err(|e| anyhow::anyhow!("download task join: {}", e));

    // The sender is gone once the blocking task returns; wait for the last line.
    let _ = progress_handle.await;
    let summary = result??;

    for line in report::render_report(&summary, cfg.failure_preview) {
        println!("{}", line);
    }
    Ok(summary.disposition().exit_code())
}
