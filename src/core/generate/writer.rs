//! Atomic document writes
//!
//! Documents are written to a temporary file in the target directory, synced, and
//! renamed into place, so a reader never sees a partial document and a failed write
//! leaves nothing behind.

use crate::domain::{Result, TntError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handle to a generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    /// Absolute path of the document
    pub path: PathBuf,

    /// Size of the document in bytes
    pub bytes: u64,

    /// Hex-encoded SHA-256 of the document contents
    pub checksum: String,
}

/// Hex-encoded SHA-256 of `data`
pub fn checksum(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Writes `contents` to `dir/file_name` atomically
///
/// # Errors
///
/// Returns `TntError::Io` carrying the offending path if the directory does not
/// exist or any step of the write fails.
pub fn write_atomic(dir: &Path, file_name: &str, contents: &[u8]) -> Result<GeneratedDocument> {
    let dir = dir.canonicalize().map_err(|e| TntError::io(dir, e))?;
    if !dir.is_dir() {
        return Err(TntError::io(&dir, "not a directory"));
    }
    let final_path = dir.join(file_name);

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| TntError::io(&dir, e))?;
    temp.write_all(contents)
        .map_err(|e| TntError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| TntError::io(temp.path(), e))?;

    // the temp file is removed on drop if persisting fails
    temp.persist(&final_path)
        .map_err(|e| TntError::io(&final_path, e.error))?;

    tracing::debug!(path = %final_path.display(), bytes = contents.len(), "Wrote document");

    Ok(GeneratedDocument {
        path: final_path,
        bytes: contents.len() as u64,
        checksum: checksum(contents),
    })
}
