//! Single-document conversion entry points.
//!
//! The pipeline for one document is strictly sequential: validate the
//! path, open the parser, walk the pages in order, polish the text, and
//! assemble the final Markdown. Per-page progress is reported through the
//! callback configured in [`ConversionConfig`]; the batch driver in
//! [`crate::batch`] loops these entry points over many files.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats, PageResult};
use crate::pipeline::extract::{LopdfSource, PageTextSource};
use crate::pipeline::{input, postprocess};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `source` — Local path to a PDF file
/// * `config` — Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages failed
/// (check `output.stats.failed_pages`).
///
/// # Errors
/// Returns `Err(ConvertError)` only for fatal errors:
/// - File not found / permission denied / not a valid PDF
/// - Corrupt or encrypted document
/// - Every page failed to extract
pub async fn convert(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let source = source.as_ref().to_path_buf();
    let config = config.clone();

    // Parsing and page extraction are CPU-bound; keep them off the
    // async worker threads.
    tokio::task::spawn_blocking(move || convert_blocking(&source, &config))
        .await
        .map_err(|e| ConvertError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Blocking implementation of [`convert`].
fn convert_blocking(
    source: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", source.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let source = input::validate_source(source)?;

    // ── Step 2: Open document ────────────────────────────────────────────
    let doc = LopdfSource::open(&source)?;
    let metadata = doc.metadata();
    let total_pages = doc.page_count();
    info!("PDF has {} pages", total_pages);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 3: Extract pages sequentially ───────────────────────────────
    let extract_start = Instant::now();
    let mut pages: Vec<PageResult> = Vec::with_capacity(total_pages);

    for page_num in 1..=total_pages {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        match doc.page_text(page_num) {
            Ok(raw) => {
                let text = postprocess::polish_text(&raw).trim_end().to_string();
                debug!("Extracted page {}: {} bytes", page_num, text.len());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, total_pages, text.len());
                }
                pages.push(PageResult {
                    page_num,
                    text,
                    error: None,
                });
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total_pages, &e.to_string());
                }
                pages.push(PageResult {
                    page_num,
                    text: String::new(),
                    error: Some(e),
                });
            }
        }
    }
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 4: Bail out if nothing extracted ────────────────────────────
    let extracted = pages.iter().filter(|p| p.error.is_none()).count();
    let failed = pages.len() - extracted;

    if total_pages > 0 && extracted == 0 {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(ConvertError::AllPagesFailed {
            total: total_pages,
            first_error,
        });
    }

    // ── Step 5: Assemble final document ──────────────────────────────────
    let markdown = assemble_document(&pages, config, &title_stem(&source));

    // ── Step 6: Compute stats ────────────────────────────────────────────
    let stats = ConversionStats {
        total_pages,
        extracted_pages: extracted,
        failed_pages: failed,
        empty_pages: pages.iter().filter(|p| p.is_empty()).count(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
        markdown_bytes: markdown.len(),
        output_path: None,
    };

    info!(
        "Conversion complete: {}/{} pages, {}ms total",
        extracted, total_pages, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages, extracted);
    }

    Ok(ConversionOutput {
        markdown,
        pages,
        metadata,
        stats,
    })
}

/// Convert a PDF and write the Markdown to `output_path`.
///
/// Uses atomic write (temp file + rename) so a failure never leaves a
/// partial `.md` behind.
pub async fn convert_to_file(
    source: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, ConvertError> {
    let output = convert(source, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    // Atomic write: write to temp, then rename.
    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(|e| ConvertError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        // Don't leave the temp file behind on failure.
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(ConvertError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    let mut stats = output.stats;
    stats.output_path = Some(path.to_path_buf());
    Ok(stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally. Intended for callers
/// without an ambient runtime, such as a GUI worker thread.
pub fn convert_sync(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(source, config))
}

/// Extract PDF metadata without converting content or touching the
/// output directory.
pub async fn inspect(
    source: impl AsRef<Path>,
) -> Result<crate::output::DocumentMetadata, ConvertError> {
    let source = source.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let source = input::validate_source(&source)?;
        Ok(LopdfSource::open(&source)?.metadata())
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Inspect task panicked: {}", e)))?
}

/// Derive the output path for a source file: `<dir>/<stem>.md`, where
/// `<dir>` is the configured output directory or, when unset, the source
/// file's own parent directory.
pub fn derive_output_path(
    source: &Path,
    config: &ConversionConfig,
) -> Result<PathBuf, ConvertError> {
    let stem = source
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConvertError::BadOutputName {
            path: source.to_path_buf(),
        })?;

    let dir = match config.output_dir {
        Some(ref d) => d.clone(),
        // An empty parent (bare file name) resolves to the current
        // directory, which is what a relative join produces anyway.
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    // Keep multi-dot stems intact: `a.b.pdf` becomes `a.b.md`.
    Ok(dir.join(format!("{}.md", stem.to_string_lossy())))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// File stem used for the optional title heading.
fn title_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Assemble the final markdown document from page results.
fn assemble_document(pages: &[PageResult], config: &ConversionConfig, stem: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if config.include_title_heading {
        parts.push(format!("# {}\n\n", stem));
    }

    // Failed pages are omitted; their errors live in the page results.
    let successful: Vec<&PageResult> = pages.iter().filter(|p| p.error.is_none()).collect();

    for (i, page) in successful.iter().enumerate() {
        if i > 0 {
            parts.push(config.page_separator.render(page.page_num));
        }
        parts.push(page.text.clone());
    }

    // One final pass normalises the seams left by empty pages and
    // guarantees the trailing newline.
    postprocess::polish_text(&parts.join(""))
}
