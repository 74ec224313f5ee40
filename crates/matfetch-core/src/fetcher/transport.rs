//! Streamed GET of one asset body.

use std::io::{self, Write};

use crate::config::HttpConfig;
use crate::http::{easy_get, is_success};

use super::FetchError;

/// Moves the body at `url` into `sink` as it arrives.
///
/// Implementations must be shareable across worker threads.
pub trait Transport: Send + Sync {
    /// Returns the number of bytes written. A non-2xx status is an error even
    /// if a body was received.
    fn stream_to(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// libcurl transport. One `Easy` handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    http: HttpConfig,
}

impl CurlTransport {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl Transport for CurlTransport {
    fn stream_to(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = easy_get(url, &self.http, self.http.item_timeout(), &[])
            .map_err(FetchError::Network)?;
        // Stop on 4xx/5xx before the error page is written to the sink.
        easy.fail_on_error(true).map_err(FetchError::Network)?;

        let mut written = 0u64;
        let mut write_err: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match sink.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(FetchError::Network)?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Storage(e));
        }
        let code = easy.response_code().map_err(FetchError::Network)?;
        if let Err(e) = performed {
            if e.is_http_returned_error() && code != 0 {
                return Err(FetchError::Http(code));
            }
            return Err(FetchError::Network(e));
        }
        if !is_success(code) {
            return Err(FetchError::Http(code));
        }
        Ok(written)
    }
}
