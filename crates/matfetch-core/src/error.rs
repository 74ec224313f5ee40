//! Fatal, run-level errors.
//!
//! Anything here aborts the run before a single asset is fetched. Per-item
//! failures live in [`crate::fetcher::FetchError`] and never surface as these.

use thiserror::Error;

/// The listing call could not produce a manifest.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Listing endpoint answered with a non-2xx status.
    #[error("listing request to {url} failed with HTTP {status}")]
    Http { status: u32, url: String },

    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("listing request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Body was not valid JSON.
    #[error("listing response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Body was JSON but not the expected shape.
    #[error("invalid listing response: {message}")]
    InvalidResponse { message: String },
}

/// Errors that stop `install` before or instead of downloading.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to list assets: {0}")]
    Listing(#[from] ListingError),

    /// Listing succeeded but nothing matched the filter.
    #[error("no assets found to download for tag '{tag}'")]
    EmptyManifest { tag: String },

    /// Target directory could not be prepared or workers could not start.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
