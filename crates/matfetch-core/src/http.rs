//! Shared libcurl handle setup for the listing call and asset GETs.

use crate::config::HttpConfig;
use std::time::Duration;

/// Creates an `Easy` handle for a GET of `url` with the client identifier,
/// redirects and both timeouts applied.
pub(crate) fn easy_get(
    url: &str,
    http: &HttpConfig,
    timeout: Duration,
    extra_headers: &[&str],
) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.useragent(&http.user_agent)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(http.connect_timeout())?;
    easy.timeout(timeout)?;

    if !extra_headers.is_empty() {
        let mut list = curl::easy::List::new();
        for h in extra_headers {
            list.append(h)?;
        }
        easy.http_headers(list)?;
    }
    Ok(easy)
}

pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
