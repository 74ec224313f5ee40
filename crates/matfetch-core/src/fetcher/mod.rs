//! Item fetcher: one idempotent download-or-skip per manifest entry.
//!
//! Existing destinations are skipped without touching the network unless
//! overwriting. Otherwise the body streams into a `.part` file that is renamed
//! into place only after a complete, error-free transfer.

mod error;
mod transport;

pub use error::FetchError;
pub use transport::{CurlTransport, Transport};

use std::path::Path;

use crate::manifest::ManifestEntry;
use crate::storage::PartFile;

/// Terminal result of attempting one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { name: String },
    Skipped { name: String },
    Failed { name: String, reason: String },
}

impl FetchOutcome {
    pub fn name(&self) -> &str {
        match self {
            FetchOutcome::Downloaded { name }
            | FetchOutcome::Skipped { name }
            | FetchOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}

/// Downloads `entry` into `dest_dir`, or skips it if already present and
/// `overwrite` is false. Never returns a partial success.
pub fn fetch_item<T: Transport + ?Sized>(
    transport: &T,
    dest_dir: &Path,
    entry: &ManifestEntry,
    overwrite: bool,
) -> FetchOutcome {
    let dest = dest_dir.join(&entry.name);
    if !overwrite && dest.exists() {
        tracing::debug!(name = %entry.name, "destination exists; skipping");
        return FetchOutcome::Skipped {
            name: entry.name.clone(),
        };
    }

    match download_to(transport, &dest, entry) {
        Ok(bytes) => {
            tracing::debug!(name = %entry.name, bytes, "downloaded");
            FetchOutcome::Downloaded {
                name: entry.name.clone(),
            }
        }
        Err(e) => FetchOutcome::Failed {
            name: entry.name.clone(),
            reason: e.to_string(),
        },
    }
}

fn download_to<T: Transport + ?Sized>(
    transport: &T,
    dest: &Path,
    entry: &ManifestEntry,
) -> Result<u64, FetchError> {
    // Dropped (and removed) on every early return below.
    let mut part = PartFile::create(dest)?;
    let bytes = transport.stream_to(&entry.source_url, &mut part)?;
    part.finalize()?;
    Ok(bytes)
}
