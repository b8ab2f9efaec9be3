//! Scoped temporary storage for uploaded prescription images.
//!
//! The extraction service accepts files, not byte buffers, so the decoded
//! request body is written to a named temporary file for the duration of the
//! upload. The file is removed when the [`StagedImage`] is dropped, which
//! covers every exit path of the handler including early `?` returns.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::RemediError;

#[derive(Debug)]
pub struct StagedImage {
    file: Option<NamedTempFile>,
    mime_type: String,
    len: usize,
}

impl StagedImage {
    /// Writes `bytes` to a fresh temp file carrying the extension of `filename`.
    ///
    /// # Errors
    ///
    /// Returns `RemediError::IoError` if the file cannot be created or written.
    pub fn stage(bytes: &[u8], filename: &str, mime_type: &str) -> Result<Self, RemediError> {
        let suffix = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("prescription-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        info!(path = %file.path().display(), bytes = bytes.len(), "Saved image to temporary file");

        Ok(Self {
            file: Some(file),
            mime_type: mime_type.to_string(),
            len: bytes.len(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        // `file` is only taken in `drop`.
        self.file.as_ref().map_or_else(|| Path::new(""), NamedTempFile::path)
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(()) => info!(path = %path.display(), "Cleaned up temporary file"),
                Err(e) => warn!(path = %path.display(), "Failed to remove temporary file: {}", e),
            }
        }
    }
}
