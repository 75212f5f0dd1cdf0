//! Session-scoped PDF storage and text reading

use super::pdf::{extract_pages, format_pages};
use super::UploadedFile;
use crate::error::{DocPortalError, Result};
use crate::logging::SharedSink;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Environment variable overriding the storage root
pub const DATA_STORAGE_ENV: &str = "DATA_STORAGE_PATH";

/// Storage root, relative to the working directory, when nothing else is given
pub const DEFAULT_DATA_DIR: &str = "data/document_analysis";

/// Generate `session_<YYYYmmdd_HHMMSS>_<8 hex>`
pub fn generate_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "session_{}_{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}

fn default_data_dir() -> PathBuf {
    std::env::var(DATA_STORAGE_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn validate_session_id(session_id: &str) -> Result<()> {
    let invalid = session_id.is_empty()
        || session_id == "."
        || session_id == ".."
        || session_id.contains(['/', '\\']);
    if invalid {
        return Err(DocPortalError::config(format!(
            "Invalid session id: '{}'",
            session_id
        )));
    }
    Ok(())
}

/// Saves uploaded PDFs under `<data_dir>/<session_id>/` and reads them back
///
/// The session directory is created on construction and is left in place
/// when the handler is dropped.
pub struct DocumentHandler {
    data_dir: PathBuf,
    session_id: String,
    session_path: PathBuf,
    log: SharedSink,
}

impl DocumentHandler {
    /// Open (or create) a session directory
    ///
    /// `data_dir` falls back to `DATA_STORAGE_PATH`, then to
    /// `./data/document_analysis`. A session id is generated when none is given.
    pub fn new(
        data_dir: Option<PathBuf>,
        session_id: Option<String>,
        log: SharedSink,
    ) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let session_id = session_id.unwrap_or_else(generate_session_id);

        if let Err(e) = validate_session_id(&session_id) {
            log.error(
                "Error initializing DocumentHandler",
                &[("error", e.to_string())],
            );
            return Err(e);
        }

        let session_path = data_dir.join(&session_id);
        let session_path = fs::create_dir_all(&session_path)
            .and_then(|_| fs::canonicalize(&session_path))
            .map_err(|e| {
                log.error(
                    "Error initializing DocumentHandler",
                    &[
                        ("session_path", session_path.display().to_string()),
                        ("error", e.to_string()),
                    ],
                );
                DocPortalError::storage(&session_path, e)
            })?;

        log.info(
            "DocumentHandler initialized",
            &[
                ("session_id", session_id.clone()),
                ("session_path", session_path.display().to_string()),
            ],
        );

        Ok(Self {
            data_dir,
            session_id,
            session_path,
            log,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Absolute path of the session directory
    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Write an uploaded PDF into the session directory
    ///
    /// Only the file name's last component is used. An existing file with the
    /// same name is overwritten. Returns the absolute save path.
    pub fn save(&self, file: &UploadedFile) -> Result<PathBuf> {
        let filename = match file.file_name() {
            Some(name) if name.to_lowercase().ends_with(".pdf") => name,
            _ => {
                self.log.error(
                    "Error saving PDF",
                    &[
                        ("file", file.name.clone()),
                        ("error", "invalid file format".to_string()),
                    ],
                );
                return Err(DocPortalError::InvalidFormat(file.name.clone()));
            }
        };

        let save_path = self.session_path.join(filename);
        fs::write(&save_path, &file.bytes).map_err(|e| {
            self.log.error(
                "Error saving PDF",
                &[
                    ("file", filename.to_string()),
                    ("error", e.to_string()),
                ],
            );
            DocPortalError::storage(&save_path, e)
        })?;

        self.log.info(
            "PDF saved successfully",
            &[
                ("file", filename.to_string()),
                ("save_path", save_path.display().to_string()),
                ("session_id", self.session_id.clone()),
            ],
        );
        Ok(save_path)
    }

    /// Read every page of a PDF as `--- Page N ---` tagged text
    pub fn read_text(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let pages = extract_pages(path).map_err(|e| {
            self.log.error(
                "Error reading PDF",
                &[
                    ("pdf_path", path.display().to_string()),
                    ("error", e.to_string()),
                ],
            );
            e
        })?;

        self.log.info(
            "PDF read successfully",
            &[
                ("pdf_path", path.display().to_string()),
                ("pages", pages.len().to_string()),
                ("session_id", self.session_id.clone()),
            ],
        );
        Ok(format_pages(&pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Level, MemorySink};
    use tempfile::TempDir;

    #[test]
    fn test_generated_session_id_shape() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[3].len(), 8);
        assert!(parts[3].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_creates_session_dir() {
        let root = TempDir::new().unwrap();
        let sink = MemorySink::new();
        let handler =
            DocumentHandler::new(Some(root.path().to_path_buf()), None, sink.clone()).unwrap();

        assert!(handler.session_path().is_dir());
        assert!(handler.session_path().is_absolute());
        assert!(handler.session_id().starts_with("session_"));
        assert_eq!(sink.events()[0].field("session_id"), Some(handler.session_id()));
    }

    #[test]
    fn test_rejects_path_like_session_ids() {
        let root = TempDir::new().unwrap();
        for bad in ["", "..", "a/b"] {
            let result = DocumentHandler::new(
                Some(root.path().to_path_buf()),
                Some(bad.to_string()),
                MemorySink::new(),
            );
            assert!(matches!(result, Err(DocPortalError::Config { .. })), "{bad}");
        }
    }

    #[test]
    fn test_save_strips_directories_from_name() {
        let root = TempDir::new().unwrap();
        let handler = DocumentHandler::new(
            Some(root.path().to_path_buf()),
            Some("s1".to_string()),
            MemorySink::new(),
        )
        .unwrap();

        let saved = handler
            .save(&UploadedFile::new("../../escape.pdf", b"%PDF-1.4".to_vec()))
            .unwrap();
        assert_eq!(saved, handler.session_path().join("escape.pdf"));
    }

    #[test]
    fn test_save_overwrites() {
        let root = TempDir::new().unwrap();
        let handler = DocumentHandler::new(
            Some(root.path().to_path_buf()),
            Some("s1".to_string()),
            MemorySink::new(),
        )
        .unwrap();

        handler
            .save(&UploadedFile::new("a.pdf", b"first".to_vec()))
            .unwrap();
        let path = handler
            .save(&UploadedFile::new("a.pdf", b"second".to_vec()))
            .unwrap();
        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn test_invalid_format_is_logged() {
        let root = TempDir::new().unwrap();
        let sink = MemorySink::new();
        let handler =
            DocumentHandler::new(Some(root.path().to_path_buf()), None, sink.clone()).unwrap();

        let err = handler
            .save(&UploadedFile::new("notes.txt", b"hi".to_vec()))
            .unwrap_err();
        assert!(matches!(err, DocPortalError::InvalidFormat(ref n) if n == "notes.txt"));
        assert_eq!(sink.at(Level::Error)[0].field("file"), Some("notes.txt"));
    }
}
