//! Text extraction: pull page text out of a PDF behind a swappable seam.
//!
//! ## Why a trait?
//!
//! The parser is an external collaborator, not part of this crate's
//! design. Everything downstream only needs three operations — page
//! count, text of page N, document metadata — so [`PageTextSource`]
//! captures exactly those and the rest of the pipeline never names the
//! concrete library. Swapping parsers is a one-module change.
//!
//! The production implementation is [`LopdfSource`], a thin wrapper over
//! `lopdf::Document`. Encrypted documents are rejected at open time;
//! attempting extraction on them yields garbage bytes at best.

use crate::error::{ConvertError, PageError};
use crate::output::DocumentMetadata;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// The extraction operations the conversion pipeline needs from a PDF
/// parser: open is handled by the constructor, then "enumerate pages" and
/// "extract text per page".
pub trait PageTextSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Extract the text of one page (1-indexed). An empty string is a
    /// valid result: a page with no extractable text is not an error.
    fn page_text(&self, page_num: usize) -> Result<String, PageError>;

    /// Document-level metadata.
    fn metadata(&self) -> DocumentMetadata;
}

/// Production [`PageTextSource`] backed by `lopdf`.
#[derive(Debug)]
pub struct LopdfSource {
    doc: Document,
    /// Parser-assigned page numbers in document order. `lopdf` numbers
    /// pages from 1 but the numbering can in principle be sparse, so the
    /// mapping from ordinal position to page number is kept explicit.
    page_numbers: Vec<u32>,
}

impl LopdfSource {
    /// Open a document from a validated path.
    ///
    /// The caller is expected to have run
    /// [`crate::pipeline::input::validate_source`] first, so a parse
    /// failure here is reported as corruption rather than re-classified.
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let doc = Document::load(path).map_err(|e| ConvertError::CorruptPdf {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        if doc.is_encrypted() {
            return Err(ConvertError::EncryptedPdf {
                path: path.to_path_buf(),
            });
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!(
            "Opened PDF: {} ({} pages, v{})",
            path.display(),
            page_numbers.len(),
            doc.version
        );

        Ok(Self { doc, page_numbers })
    }
}

impl PageTextSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, page_num: usize) -> Result<String, PageError> {
        let parser_page =
            *self
                .page_numbers
                .get(page_num - 1)
                .ok_or_else(|| PageError::ExtractFailed {
                    page: page_num,
                    detail: format!("page out of range (document has {})", self.page_count()),
                })?;

        self.doc
            .extract_text(&[parser_page])
            .map_err(|e| PageError::ExtractFailed {
                page: page_num,
                detail: e.to_string(),
            })
    }

    fn metadata(&self) -> DocumentMetadata {
        let info = info_field(&self.doc);
        DocumentMetadata {
            title: info(b"Title"),
            author: info(b"Author"),
            subject: info(b"Subject"),
            creator: info(b"Creator"),
            producer: info(b"Producer"),
            page_count: self.page_numbers.len(),
            pdf_version: self.doc.version.clone(),
            is_encrypted: self.doc.is_encrypted(),
        }
    }
}

/// Build a reader for the document's Info dictionary.
///
/// Returns a closure so the field lookups in `metadata()` stay one-liners.
/// Every step is fallible (no Info reference, dangling reference, wrong
/// object type) and every failure means "field absent".
fn info_field(doc: &Document) -> impl Fn(&[u8]) -> Option<String> + '_ {
    move |key: &[u8]| {
        let info_ref = doc.trailer.get(b"Info").ok()?;
        let id = info_ref.as_reference().ok()?;
        let dict = doc.get_object(id).ok()?.as_dict().ok()?;
        let raw = dict.get(key).ok()?.as_str().ok()?;
        decode_pdf_string(raw)
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, otherwise
/// treated as UTF-8/Latin-ish with lossy replacement.
fn decode_pdf_string(raw: &[u8]) -> Option<String> {
    let s = if raw.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = raw[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(raw).into_owned()
    };
    let s = s.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_string() {
        assert_eq!(decode_pdf_string(b"Report 2024"), Some("Report 2024".into()));
    }

    #[test]
    fn decode_utf16_string() {
        // "Hi" with a UTF-16BE BOM.
        let raw = [0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_pdf_string(&raw), Some("Hi".into()));
    }

    #[test]
    fn decode_empty_string_is_absent() {
        assert_eq!(decode_pdf_string(b""), None);
        assert_eq!(decode_pdf_string(b"   "), None);
    }

    #[test]
    fn open_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"%PDF-1.4 but nothing else that matters").unwrap();

        let err = LopdfSource::open(&path).unwrap_err();
        assert!(matches!(err, ConvertError::CorruptPdf { .. }), "got {err:?}");
    }
}
