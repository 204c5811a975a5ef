//! Output types produced by a conversion.
//!
//! [`ConversionOutput`] is the full result of converting one document:
//! the assembled Markdown, the per-page results (text or a page-level
//! error), the document metadata, and run statistics. Everything here is
//! plain serialisable data so callers can log it, persist it, or ship it
//! across a channel to a display thread.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of converting a single PDF document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled Markdown document.
    pub markdown: String,
    /// Per-page results in page order.
    pub pages: Vec<PageResult>,
    /// Document metadata read before extraction.
    pub metadata: DocumentMetadata,
    /// Run statistics.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// All page-level errors, in page order. Empty on a clean conversion.
    pub fn page_errors(&self) -> Vec<&PageError> {
        self.pages.iter().filter_map(|p| p.error.as_ref()).collect()
    }
}

/// Extraction result for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Extracted text; empty when the page has no extractable text
    /// (that is a success, not an error).
    pub text: String,
    /// Set when extraction of this page failed. `text` is empty then.
    pub error: Option<PageError>,
}

impl PageResult {
    /// True when the page extracted cleanly but produced no text.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.text.trim().is_empty()
    }
}

/// Document-level metadata, readable without extracting any text.
///
/// The optional fields come from the PDF Info dictionary and are absent
/// more often than not in real-world files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// PDF version string from the header, e.g. "1.7".
    pub pdf_version: String,
    /// Whether the document is encrypted. Encrypted documents are rejected
    /// before extraction starts.
    pub is_encrypted: bool,
}

/// Statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that extracted without error (including empty ones).
    pub extracted_pages: usize,
    /// Pages that produced a [`PageError`].
    pub failed_pages: usize,
    /// Extracted pages that yielded no text.
    pub empty_pages: usize,
    /// Wall-clock time for the whole conversion.
    pub total_duration_ms: u64,
    /// Time spent inside the extraction stage.
    pub extract_duration_ms: u64,
    /// Size of the assembled Markdown in bytes.
    pub markdown_bytes: usize,
    /// Where the Markdown was written, when `convert_to_file` was used.
    pub output_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str, error: Option<PageError>) -> PageResult {
        PageResult {
            page_num: n,
            text: text.to_string(),
            error,
        }
    }

    #[test]
    fn page_errors_collects_in_order() {
        let out = ConversionOutput {
            markdown: String::new(),
            pages: vec![
                page(1, "hello", None),
                page(
                    2,
                    "",
                    Some(PageError::ExtractFailed {
                        page: 2,
                        detail: "x".into(),
                    }),
                ),
                page(3, "", None),
            ],
            metadata: DocumentMetadata {
                title: None,
                author: None,
                subject: None,
                creator: None,
                producer: None,
                page_count: 3,
                pdf_version: "1.5".into(),
                is_encrypted: false,
            },
            stats: ConversionStats::default(),
        };

        assert_eq!(out.page_errors().len(), 1);
        assert!(out.pages[2].is_empty());
        assert!(!out.pages[0].is_empty());
        // A page that failed is not "empty" — it is failed.
        assert!(!out.pages[1].is_empty());
    }

    #[test]
    fn stats_round_trip_json() {
        let stats = ConversionStats {
            total_pages: 4,
            extracted_pages: 3,
            failed_pages: 1,
            empty_pages: 0,
            total_duration_ms: 12,
            extract_duration_ms: 9,
            markdown_bytes: 512,
            output_path: Some(PathBuf::from("/tmp/out.md")),
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: ConversionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extracted_pages, 3);
        assert_eq!(back.output_path.as_deref(), Some(std::path::Path::new("/tmp/out.md")));
    }
}
