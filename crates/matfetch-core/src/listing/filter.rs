//! Reduce raw listing records to manifest entries.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::ListingError;
use crate::manifest::ManifestEntry;

/// Keeps records that are plain files (`type == "file"`), whose `name` ends
/// with `extension` ignoring case, and that carry an http(s) `download_url`.
///
/// Records without a usable download URL, with unsafe names, or repeating an
/// earlier name are dropped with a warning. Listing order is preserved.
pub fn filter_records(listing: &Value, extension: &str) -> Result<Vec<ManifestEntry>, ListingError> {
    let records = listing
        .as_array()
        .ok_or_else(|| ListingError::InvalidResponse {
            message: format!("expected a JSON array, got {}", kind_of(listing)),
        })?;

    let extension = extension.to_lowercase();
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for record in records {
        if record.get("type").and_then(Value::as_str) != Some("file") {
            continue;
        }
        let Some(name) = record.get("name").and_then(Value::as_str) else {
            continue;
        };
        if !name.to_lowercase().ends_with(&extension) {
            continue;
        }
        let url = match record.get("download_url").and_then(Value::as_str) {
            Some(u) if u.starts_with("http") => u,
            _ => {
                tracing::warn!(name, "listing entry has no usable download_url; skipping");
                continue;
            }
        };
        let Some(entry) = ManifestEntry::new(name, url) else {
            tracing::warn!(name, url, "listing entry has an unsafe name or malformed URL; skipping");
            continue;
        };
        if !seen.insert(entry.name.clone()) {
            tracing::warn!(name, "duplicate name in listing; keeping the first");
            continue;
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
