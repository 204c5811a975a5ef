//! Error types for the paperdown library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: the conversion of a document cannot
//!   proceed at all (missing file, not a PDF, encrypted, output not
//!   writable). Returned as `Err(ConvertError)` from the top-level
//!   `convert*` functions; the batch driver turns it into a Failed job.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed to yield text but
//!   the rest of the document is fine. Stored inside
//!   [`crate::output::PageResult`] so callers can inspect partial success
//!   rather than losing the whole document to one bad page.
//!
//! The separation lets callers decide their own tolerance: fail the job on
//! the first page error, log and continue, or collect all page errors for a
//! post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the paperdown library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The document is encrypted; text extraction is not attempted.
    #[error("PDF '{path}' is encrypted and cannot be converted.")]
    EncryptedPdf { path: PathBuf },

    /// Every page failed to extract; output would be empty.
    #[error("All {total} pages failed to extract.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source path has no usable file stem to name the output after.
    #[error("Cannot derive an output file name from '{path}'")]
    BadOutputName { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageResult`] when a page fails.
/// The overall conversion continues unless ALL pages fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The parser could not decode this page's content stream.
    #[error("Page {page}: text extraction failed: {detail}")]
    ExtractFailed { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = ConvertError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("missing.pdf"));
    }

    #[test]
    fn not_a_pdf_display_includes_magic() {
        let e = ConvertError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.txt"), "got: {msg}");
        assert!(msg.contains("104"), "magic bytes should be shown, got: {msg}");
    }

    #[test]
    fn all_pages_failed_display() {
        let e = ConvertError::AllPagesFailed {
            total: 7,
            first_error: "bad content stream".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains('7'), "got: {msg}");
        assert!(msg.contains("bad content stream"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = ConvertError::OutputWriteFailed {
            path: PathBuf::from("/out/a.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("a.md"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::ExtractFailed {
            page: 3,
            detail: "unsupported encoding".into(),
        };
        assert!(e.to_string().contains("Page 3"));
        assert!(e.to_string().contains("unsupported encoding"));
    }
}
