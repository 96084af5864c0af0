use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be created, written or flushed.
    #[error("Failed to write scene file {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub fn write_failure(path: &Path, source: impl Into<io::Error>) -> Self {
        ExportError::WriteFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
