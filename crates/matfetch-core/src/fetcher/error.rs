//! Per-item download error.

use thiserror::Error;

/// Why one asset could not be fetched. Recorded as the outcome's reason; never fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{}", describe_curl(.0))]
    Network(curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Disk/storage write failed (e.g. disk full, permission denied).
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

fn describe_curl(e: &curl::Error) -> String {
    if e.is_operation_timedout() {
        return format!("timed out: {}", e.description());
    }
    match e.extra_description() {
        Some(extra) => format!("{} ({})", e.description(), extra),
        None => e.description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_message() {
        assert_eq!(FetchError::Http(503).to_string(), "HTTP 503");
    }

    #[test]
    fn storage_message_has_prefix() {
        let e: FetchError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(e.to_string(), "storage: disk full");
    }

    #[test]
    fn timeout_is_labelled() {
        // CURLE_OPERATION_TIMEDOUT
        let e = FetchError::Network(curl::Error::new(28));
        assert!(e.to_string().starts_with("timed out"));
    }
}
