//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`],
//! built via its [`ConversionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share a config across a whole batch and to
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use paperdown::{ConversionConfig, PageSeparator};
///
/// let config = ConversionConfig::builder()
///     .output_dir("/tmp/markdown")
///     .page_separator(PageSeparator::HorizontalRule)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Directory the Markdown files are written into. Default: `None`.
    ///
    /// `None` means each document's output lands beside its source file
    /// (the source's parent directory). When set, every job in a batch
    /// writes into this one directory regardless of source location.
    pub output_dir: Option<PathBuf>,

    /// Prepend a `# <file stem>` heading to the output. Default: true.
    ///
    /// The heading gives otherwise headerless extracted text a stable
    /// anchor and makes a directory of generated files self-describing.
    pub include_title_heading: bool,

    /// Page separator in the assembled output. Default: [`PageSeparator::None`].
    pub page_separator: PageSeparator,

    /// Receives per-page events while a document converts. Default: `None`.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("output_dir", &self.output_dir)
            .field("include_title_heading", &self.include_title_heading)
            .field("page_separator", &self.page_separator)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            include_title_heading: true,
            page_separator: PageSeparator::default(),
            progress_callback: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    /// Write all output files into this directory instead of beside their
    /// sources.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn include_title_heading(mut self, v: bool) -> Self {
        self.config.include_title_heading = v;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        if let Some(ref dir) = self.config.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConvertError::InvalidConfig(
                    "Output directory must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How to separate pages in the assembled Markdown output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSeparator {
    /// No separator; pages joined with "\n\n". (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ConversionConfig::builder().build().unwrap();
        assert!(config.output_dir.is_none());
        assert!(config.include_title_heading);
        assert!(matches!(config.page_separator, PageSeparator::None));
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn builder_rejects_empty_output_dir() {
        let err = ConversionConfig::builder()
            .output_dir("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Output directory"));
    }

    #[test]
    fn separator_rendering() {
        assert_eq!(PageSeparator::None.render(2), "\n\n");
        assert_eq!(PageSeparator::HorizontalRule.render(2), "\n\n---\n\n");
        assert!(PageSeparator::Comment.render(2).contains("page 2"));
        assert_eq!(
            PageSeparator::Custom("* * *".into()).render(9),
            "\n\n* * *\n\n"
        );
    }
}
