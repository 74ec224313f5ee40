//! Destination files and their in-flight temporaries.
//!
//! Bytes are streamed into `<name>.part` next to the destination and moved
//! onto the final name with a single rename once complete, so a final name
//! never holds a partially written asset.

mod part;

pub use part::PartFile;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.png` → `a.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// True if `path` names an in-flight temp file.
pub fn is_temp_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > TEMP_SUFFIX.len() && n.ends_with(TEMP_SUFFIX))
}

/// Removes orphaned `.part` files left in `dir` by interrupted runs.
/// Returns the removed paths. A missing directory is not an error.
pub fn sweep_part_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut removed = Vec::new();
    for entry in read {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_temp_path(&path) {
            fs::remove_file(&path)?;
            tracing::debug!(path = %path.display(), "removed orphaned part file");
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}
