//! Sequential writer for one in-flight download.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Temp file for one destination. Dropping it without `finalize` removes the
/// temp file (best effort), including while unwinding from a panic.
pub struct PartFile {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl PartFile {
    /// Create `<final_path>.part`, truncating an orphan from an earlier run.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(Self {
            writer: Some(BufWriter::with_capacity(128 * 1024, file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, fsync and atomically rename the temp file onto the final path.
    /// On error the temp file is removed when `self` drops.
    pub fn finalize(mut self) -> io::Result<()> {
        let Some(writer) = self.writer.take() else {
            return Err(io::Error::new(io::ErrorKind::Other, "part file already closed"));
        };
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&self.temp_path, &self.final_path)?;
        // Renamed: nothing left for Drop to clean up.
        self.temp_path.clear();
        Ok(())
    }
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "part file already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        // Close before unlinking.
        drop(self.writer.take());
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.temp_path.display(), "could not remove part file: {}", e);
            }
        }
    }
}
