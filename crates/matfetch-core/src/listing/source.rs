//! Listing over HTTP with libcurl.

use crate::config::HttpConfig;
use crate::error::ListingError;
use crate::http::{easy_get, is_success};

use super::ListingSource;

/// Fetches the listing from a URL template such as
/// `https://api.github.com/repos/nidorx/matcaps/contents/{tag}`.
#[derive(Debug, Clone)]
pub struct CurlListing {
    url_template: String,
    http: HttpConfig,
}

impl CurlListing {
    pub fn new(url_template: impl Into<String>, http: HttpConfig) -> Self {
        Self {
            url_template: url_template.into(),
            http,
        }
    }

    /// The concrete listing URL for `tag`.
    pub fn url_for(&self, tag: &str) -> String {
        self.url_template.replace("{tag}", tag)
    }
}

impl ListingSource for CurlListing {
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    fn fetch_listing(&self, tag: &str) -> Result<serde_json::Value, ListingError> {
        let url = self.url_for(tag);
        let network = |source: curl::Error| ListingError::Network {
            url: url.clone(),
            source,
        };

        let mut easy = easy_get(
            &url,
            &self.http,
            self.http.listing_timeout(),
            &["Accept: application/vnd.github+json"],
        )
        .map_err(network)?;

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(network)?;
            transfer.perform().map_err(network)?;
        }

        let code = easy.response_code().map_err(network)?;
        if !is_success(code) {
            return Err(ListingError::Http { status: code, url });
        }
        tracing::debug!(%url, bytes = body.len(), "listing fetched");

        Ok(serde_json::from_slice(&body)?)
    }
}
