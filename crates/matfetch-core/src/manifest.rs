//! Manifest entries: one named remote asset and where to fetch it.

/// One asset selected for download. Immutable once built by the lister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// File name under the target directory. Always a plain file name.
    pub name: String,
    /// Absolute http/https URL of the raw asset.
    pub source_url: String,
}

impl ManifestEntry {
    /// Builds an entry, or `None` if `name` is not a plain file name or
    /// `source_url` is not an absolute http(s) URL.
    pub fn new(name: &str, source_url: &str) -> Option<Self> {
        if !is_plain_file_name(name) || !is_http_url(source_url) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            source_url: source_url.to_string(),
        })
    }
}

/// True if `name` can be joined onto a directory without escaping it.
///
/// Rejects empty names, `.` / `..`, path separators and NUL.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c| c == '/' || c == '\\' || c == '\0')
}

fn is_http_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_png() {
        let e = ManifestEntry::new(
            "00FF00_4D4D4D_00AA00_009C00-512px.png",
            "https://raw.githubusercontent.com/nidorx/matcaps/master/512/x.png",
        )
        .unwrap();
        assert_eq!(e.name, "00FF00_4D4D4D_00AA00_009C00-512px.png");
    }

    #[test]
    fn rejects_traversal_and_separators() {
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../evil.png"));
        assert!(!is_plain_file_name("sub/dir.png"));
        assert!(!is_plain_file_name("win\\dir.png"));
        assert!(is_plain_file_name(".hidden.png"));
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(ManifestEntry::new("a.png", "ftp://host/a.png").is_none());
        assert!(ManifestEntry::new("a.png", "/relative/a.png").is_none());
        assert!(ManifestEntry::new("a.png", "http://127.0.0.1:9/a.png").is_some());
    }
}
