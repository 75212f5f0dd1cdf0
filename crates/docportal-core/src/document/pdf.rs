//! PDF text extraction

use crate::error::{DocPortalError, Result};
use lopdf::Document;
use std::fs;
use std::path::Path;

/// Extract the text of every page, in page order
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|e| DocPortalError::read_with(path, "cannot open file", e))?;

    let document = Document::load_mem(&bytes)
        .map_err(|e| DocPortalError::read_with(path, "not a valid PDF", e.to_string()))?;

    if document.is_encrypted() {
        return Err(DocPortalError::read(path, "PDF is encrypted"));
    }

    document
        .get_pages()
        .into_keys()
        .map(|page_number| {
            document.extract_text(&[page_number]).map_err(|e| {
                DocPortalError::read_with(
                    path,
                    format!("failed to extract text from page {}", page_number),
                    e.to_string(),
                )
            })
        })
        .collect()
}

/// Header line preceding each page's text
pub fn page_marker(page_number: usize) -> String {
    format!("--- Page {} ---", page_number)
}

/// Join pages into one string, each page tagged with its 1-based number
///
/// Trailing whitespace of each page's text is trimmed so that every marker
/// starts on the line directly after the previous page's last line. Leading
/// whitespace and interior text are kept as extracted.
pub fn format_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}\n{}", page_marker(i + 1), text.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_pages() {
        let pages = vec!["first\n".to_string(), "second".to_string()];
        assert_eq!(
            format_pages(&pages),
            "--- Page 1 ---\nfirst\n--- Page 2 ---\nsecond"
        );
    }

    #[test]
    fn test_format_trims_only_trailing_whitespace() {
        let pages = vec!["  indented\n\nbody \n\n".to_string(), "\n".to_string()];
        assert_eq!(
            format_pages(&pages),
            "--- Page 1 ---\n  indented\n\nbody\n--- Page 2 ---\n"
        );
    }

    #[test]
    fn test_format_no_pages() {
        assert_eq!(format_pages(&[]), "");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = extract_pages(&dir.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, DocPortalError::Read { ref message, .. } if message == "cannot open file"));
    }

    #[test]
    fn test_not_a_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"plain text pretending to be a pdf").unwrap();

        let err = extract_pages(&path).unwrap_err();
        assert!(matches!(err, DocPortalError::Read { ref message, .. } if message == "not a valid PDF"));
    }
}
