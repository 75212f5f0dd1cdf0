//! Document ingestion
//!
//! Uploaded PDFs are stored per session and read back as page-tagged text.

mod handler;
pub mod pdf;

pub use handler::{generate_session_id, DocumentHandler, DATA_STORAGE_ENV, DEFAULT_DATA_DIR};

use crate::error::{DocPortalError, Result};
use std::path::Path;

/// A file received from a caller: its client-side name and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Load a file from disk, named after its last path component
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| DocPortalError::read_with(path, "cannot open file", e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Last path component of `name`, if any
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.name).file_name().and_then(|n| n.to_str())
    }
}
