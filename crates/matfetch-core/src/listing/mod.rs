//! Manifest lister.
//!
//! Asks the listing endpoint for the contents of one resolution directory and
//! keeps only plain files with the asset extension and a direct download URL.
//! Any failure of the call itself is fatal; there is no partial manifest.

mod filter;
mod source;

pub use filter::filter_records;
pub use source::CurlListing;

use crate::error::ListingError;
use crate::manifest::ManifestEntry;

/// Something that can return the raw listing for a tag.
pub trait ListingSource {
    /// Returns the parsed JSON body of the listing for `tag`.
    fn fetch_listing(&self, tag: &str) -> Result<serde_json::Value, ListingError>;
}

/// Lists `tag` through `source` and filters it down to downloadable entries
/// whose name ends with `extension` (case-insensitive).
pub fn list_manifest<S: ListingSource + ?Sized>(
    source: &S,
    tag: &str,
    extension: &str,
) -> Result<Vec<ManifestEntry>, ListingError> {
    let listing = source.fetch_listing(tag)?;
    let entries = filter_records(&listing, extension)?;
    tracing::info!(tag, count = entries.len(), "listing filtered");
    Ok(entries)
}
