//! `matfetch list` – show what the listing offers.

use anyhow::Result;
use matfetch_core::config::MatfetchConfig;
use matfetch_core::install::resolve_manifest;
use matfetch_core::listing::CurlListing;

/// Print one `name  url` line per manifest entry.
pub async fn run_list(cfg: &MatfetchConfig, res: &str) -> Result<()> {
    let listing = CurlListing::new(cfg.listing_url.clone(), cfg.http());
    let extension = cfg.asset_extension.clone();
    let tag = res.to_string();
    let manifest = tokio::task::spawn_blocking(move || resolve_manifest(&listing, &tag, &extension))
        .await
        .map_err(|e| anyhow::anyhow!("listing task join: {}", e))??;

    for entry in &manifest {
        println!("{}  {}", entry.name, entry.source_url);
    }
    println!("{} file(s).", manifest.len());
    Ok(())
}
