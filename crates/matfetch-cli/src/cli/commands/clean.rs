//! `matfetch clean` – remove orphaned temp files.

use anyhow::{Context, Result};
use matfetch_core::config::MatfetchConfig;
use matfetch_core::storage;

use crate::cli::TargetArgs;

pub fn run_clean(cfg: &MatfetchConfig, target: &TargetArgs) -> Result<()> {
    let dir = target.target_dir(cfg);
    let removed = storage::sweep_part_files(&dir)
        .with_context(|| format!("failed to clean {}", dir.display()))?;
    for path in &removed {
        println!("removed {}", path.display());
    }
    println!("Removed {} orphaned part file(s) from {}.", removed.len(), dir.display());
    Ok(())
}
