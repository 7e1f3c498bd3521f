//! PDF text extraction

use std::path::Path;
use tracing::warn;

/// Extract plain text from a PDF on disk.
///
/// Extraction failures (encrypted, scanned, or malformed files) yield an
/// empty string rather than an error; the caller treats an empty document as
/// unanswerable.
pub fn extract_text(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "PDF text extraction failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_empty_text() {
        let text = extract_text(Path::new("/nonexistent/file.pdf"));
        assert!(text.is_empty());
    }
}
