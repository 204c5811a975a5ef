//! Sequential batch driver: many documents, one at a time.
//!
//! A [`ConversionJob`] tracks one source file through the four-state
//! lifecycle Pending → Running → {Done, Failed}. The driver never moves a
//! job backwards and never revisits a terminal job; re-converting a file
//! means queueing a fresh job for it.
//!
//! Jobs are processed strictly in order with no parallelism and no
//! retries. A failure is captured on its job and the driver moves on —
//! one bad file never aborts the rest of the batch.

use crate::config::ConversionConfig;
use crate::convert::{convert_to_file, derive_output_path};
use crate::error::ConvertError;
use crate::progress::ConversionProgressCallback;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Lifecycle state of one conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Queued, not yet picked up by the driver.
    Pending,
    /// Currently converting.
    Running,
    /// Converted; the output file exists.
    Done,
    /// Conversion failed; the error message is on the job.
    Failed,
}

impl JobStatus {
    /// Terminal states never revert.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

/// One source-PDF-to-Markdown conversion unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    /// The PDF to convert.
    pub source: PathBuf,
    pub status: JobStatus,
    /// Human-readable failure message, set when `status == Failed`.
    pub error: Option<String>,
    /// Where the Markdown landed, set when `status == Done`.
    pub output_path: Option<PathBuf>,
}

impl ConversionJob {
    /// A fresh Pending job for `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            status: JobStatus::Pending,
            error: None,
            output_path: None,
        }
    }
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub done: usize,
    pub failed: usize,
    /// Jobs skipped because they were already terminal when the driver
    /// reached them.
    pub skipped: usize,
}

/// Receives job-level events while a batch runs.
///
/// Implementations must be `Send + Sync` (the driver typically runs on a
/// worker thread while the display lives elsewhere). All methods default
/// to no-ops, mirroring [`ConversionProgressCallback`] one level up.
pub trait BatchObserver: Send + Sync {
    /// Called once before the first job.
    fn on_batch_start(&self, total_jobs: usize) {
        let _ = total_jobs;
    }

    /// A job moved from Pending to Running.
    fn on_job_start(&self, index: usize, source: &Path) {
        let _ = (index, source);
    }

    /// Page-level progress inside the job at `index`: `pages_done` of
    /// `total_pages` have been attempted.
    fn on_job_progress(&self, index: usize, pages_done: usize, total_pages: usize) {
        let _ = (index, pages_done, total_pages);
    }

    /// The job at `index` finished; its Markdown is at `output_path`.
    fn on_job_done(&self, index: usize, output_path: &Path) {
        let _ = (index, output_path);
    }

    /// The job at `index` failed with `error`. The batch continues.
    fn on_job_failed(&self, index: usize, error: &ConvertError) {
        let _ = (index, error);
    }

    /// Called once after the last job.
    fn on_batch_complete(&self, summary: &BatchSummary) {
        let _ = summary;
    }
}

/// Forwards a single document's page events to the batch observer as
/// job-level progress. Page errors count as attempted pages so the
/// percentage keeps moving on partially bad documents.
struct PageProgressForwarder {
    index: usize,
    observer: Arc<dyn BatchObserver>,
    attempted: AtomicUsize,
}

impl ConversionProgressCallback for PageProgressForwarder {
    fn on_conversion_start(&self, total_pages: usize) {
        self.observer.on_job_progress(self.index, 0, total_pages);
    }

    fn on_page_complete(&self, _page_num: usize, total_pages: usize, _text_len: usize) {
        let done = self.attempted.fetch_add(1, Ordering::SeqCst) + 1;
        self.observer.on_job_progress(self.index, done, total_pages);
    }

    fn on_page_error(&self, _page_num: usize, total_pages: usize, _error: &str) {
        let done = self.attempted.fetch_add(1, Ordering::SeqCst) + 1;
        self.observer.on_job_progress(self.index, done, total_pages);
    }
}

/// Run every non-terminal job in `jobs` sequentially.
///
/// Each job transitions Pending → Running → Done or Failed in place.
/// Already-terminal jobs are skipped (re-processing requires queueing a
/// fresh job). When an observer is supplied the driver installs its own
/// per-page callback for each job, replacing any document-level callback
/// on `config` for the duration of that job.
pub async fn run_batch(
    jobs: &mut [ConversionJob],
    config: &ConversionConfig,
    observer: Option<Arc<dyn BatchObserver>>,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: jobs.len(),
        ..Default::default()
    };

    if let Some(ref obs) = observer {
        obs.on_batch_start(jobs.len());
    }
    info!("Batch started: {} jobs", jobs.len());

    for (index, job) in jobs.iter_mut().enumerate() {
        if job.status.is_terminal() {
            warn!(
                "Skipping job {} ({}): already {:?}",
                index,
                job.source.display(),
                job.status
            );
            summary.skipped += 1;
            continue;
        }

        job.status = JobStatus::Running;
        if let Some(ref obs) = observer {
            obs.on_job_start(index, &job.source);
        }

        let mut job_config = config.clone();
        if let Some(ref obs) = observer {
            job_config.progress_callback = Some(Arc::new(PageProgressForwarder {
                index,
                observer: Arc::clone(obs),
                attempted: AtomicUsize::new(0),
            }));
        }

        let result = match derive_output_path(&job.source, config) {
            Ok(out_path) => convert_to_file(&job.source, &out_path, &job_config)
                .await
                .map(|_| out_path),
            Err(e) => Err(e),
        };

        match result {
            Ok(out_path) => {
                job.status = JobStatus::Done;
                job.output_path = Some(out_path.clone());
                summary.done += 1;
                info!(
                    "Job {} done: {} → {}",
                    index,
                    job.source.display(),
                    out_path.display()
                );
                if let Some(ref obs) = observer {
                    obs.on_job_done(index, &out_path);
                }
            }
            Err(e) => {
                job.status = JobStatus::Failed;
                job.error = Some(e.to_string());
                summary.failed += 1;
                warn!("Job {} failed: {}: {}", index, job.source.display(), e);
                if let Some(ref obs) = observer {
                    obs.on_job_failed(index, &e);
                }
            }
        }
    }

    info!(
        "Batch complete: {}/{} done, {} failed",
        summary.done, summary.total, summary.failed
    );
    if let Some(ref obs) = observer {
        obs.on_batch_complete(&summary);
    }

    summary
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally. Intended for callers
/// without an ambient runtime, such as a GUI worker thread.
pub fn run_batch_sync(
    jobs: &mut [ConversionJob],
    config: &ConversionConfig,
    observer: Option<Arc<dyn BatchObserver>>,
) -> Result<BatchSummary, ConvertError> {
    Ok(tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run_batch(jobs, config, observer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn log(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl BatchObserver for RecordingObserver {
        fn on_batch_start(&self, total_jobs: usize) {
            self.log(format!("batch_start {total_jobs}"));
        }
        fn on_job_start(&self, index: usize, _source: &Path) {
            self.log(format!("job_start {index}"));
        }
        fn on_job_done(&self, index: usize, _output_path: &Path) {
            self.log(format!("job_done {index}"));
        }
        fn on_job_failed(&self, index: usize, _error: &ConvertError) {
            self.log(format!("job_failed {index}"));
        }
        fn on_batch_complete(&self, summary: &BatchSummary) {
            self.log(format!("batch_complete {}/{}", summary.done, summary.total));
        }
    }

    #[test]
    fn status_terminality() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn new_job_is_pending() {
        let job = ConversionJob::new("/tmp/a.pdf");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.error.is_none());
        assert!(job.output_path.is_none());
    }

    #[tokio::test]
    async fn missing_files_fail_without_aborting_the_batch() {
        let mut jobs = vec![
            ConversionJob::new("/nope/first.pdf"),
            ConversionJob::new("/nope/second.pdf"),
        ];
        let config = ConversionConfig::builder().build().unwrap();
        let observer = Arc::new(RecordingObserver::default());

        let summary = run_batch(
            &mut jobs,
            &config,
            Some(observer.clone() as Arc<dyn BatchObserver>),
        )
        .await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.done, 0);
        assert_eq!(summary.failed, 2);
        for job in &jobs {
            assert_eq!(job.status, JobStatus::Failed);
            assert!(job.error.as_deref().unwrap().contains("not found"));
            assert!(job.output_path.is_none());
        }

        let events = observer.events();
        assert_eq!(
            events,
            vec![
                "batch_start 2",
                "job_start 0",
                "job_failed 0",
                "job_start 1",
                "job_failed 1",
                "batch_complete 0/2",
            ]
        );
    }

    #[tokio::test]
    async fn terminal_jobs_are_not_reprocessed() {
        let mut done = ConversionJob::new("/nope/already.pdf");
        done.status = JobStatus::Done;
        done.output_path = Some(PathBuf::from("/out/already.md"));
        let mut jobs = vec![done];

        let config = ConversionConfig::builder().build().unwrap();
        let observer = Arc::new(RecordingObserver::default());
        let summary = run_batch(
            &mut jobs,
            &config,
            Some(observer.clone() as Arc<dyn BatchObserver>),
        )
        .await;

        // The terminal job kept its state and produced no job events.
        assert_eq!(jobs[0].status, JobStatus::Done);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.done, 0);
        assert_eq!(
            observer.events(),
            vec!["batch_start 1", "batch_complete 0/1"]
        );
    }

    #[test]
    fn run_batch_sync_works_without_a_runtime() {
        let mut jobs = vec![ConversionJob::new("/nope/missing.pdf")];
        let config = ConversionConfig::builder().build().unwrap();
        let summary = run_batch_sync(&mut jobs, &config, None).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(jobs[0].status, JobStatus::Failed);
    }
}
