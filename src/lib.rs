//! # paperdown
//!
//! Convert PDF documents to Markdown, one file or a whole batch at a time.
//!
//! ## What this crate is
//!
//! A thin, well-tested orchestration layer over a PDF text parser. The
//! parser does the hard part (decoding content streams); this crate does
//! the part applications actually need wired up — path validation, per-page
//! progress events, whitespace polish, output naming, atomic writes, and a
//! sequential batch driver with a four-state job lifecycle. The bundled
//! binary puts a desktop interface on top.
//!
//! Extraction is plain text: headings, tables, and images are not
//! reconstructed from layout.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path, readability, %PDF magic
//!  ├─ 2. Extract  open via lopdf, pull text page by page (spawn_blocking)
//!  ├─ 3. Polish   whitespace cleanup (line endings, control chars, blanks)
//!  ├─ 4. Assemble title heading + pages with configurable separator
//!  └─ 5. Output   atomic write to <output_dir>/<stem>.md + per-page stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paperdown::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("document.pdf", &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("pages: {} extracted / {} failed",
//!         output.stats.extracted_pages,
//!         output.stats.failed_pages);
//!     Ok(())
//! }
//! ```
//!
//! Batches go through [`batch::run_batch`]:
//!
//! ```rust,no_run
//! use paperdown::{run_batch, ConversionConfig, ConversionJob};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut jobs = vec![
//!     ConversionJob::new("a.pdf"),
//!     ConversionJob::new("b.pdf"),
//! ];
//! let config = ConversionConfig::default();
//! let summary = run_batch(&mut jobs, &config, None).await;
//! eprintln!("{}/{} converted", summary.done, summary.total);
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `gui`   | on      | Enables the `paperdown` desktop binary (iced + rfd + anyhow + tracing-subscriber) |
//!
//! Disable `gui` when using only the library to avoid pulling in the
//! interface toolkit:
//! ```toml
//! paperdown = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, run_batch_sync, BatchObserver, BatchSummary, ConversionJob, JobStatus};
pub use config::{ConversionConfig, ConversionConfigBuilder, PageSeparator};
pub use convert::{convert, convert_sync, convert_to_file, derive_output_path, inspect};
pub use error::{ConvertError, PageError};
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata, PageResult};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
