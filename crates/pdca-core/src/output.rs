//! Writes export artifacts to disk.

use crate::error::{Result, ToolboxError};
use crate::export::ExportArtifact;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn map_write_error(path: &Path, e: std::io::Error) -> ToolboxError {
    if e.kind() == ErrorKind::PermissionDenied {
        ToolboxError::PermissionDenied(path.display().to_string())
    } else {
        ToolboxError::FileWriteError(format!("{}: {}", path.display(), e))
    }
}

/// Writes `artifact` into `dir` under its fixed filename, creating `dir`
/// when needed. An existing file is overwritten.
///
/// # Errors
///
/// Returns [`ToolboxError::PermissionDenied`] or
/// [`ToolboxError::FileWriteError`] when the directory or file cannot be
/// written.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir).map_err(|e| map_write_error(dir, e))?;
    }

    let path = dir.join(artifact.filename);
    std::fs::write(&path, &artifact.bytes).map_err(|e| map_write_error(&path, e))?;

    tracing::info!(
        path = %path.display(),
        bytes = artifact.bytes.len(),
        mime = artifact.mime_type,
        "wrote export"
    );
    Ok(path)
}
