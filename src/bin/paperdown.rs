//! Desktop binary for paperdown.
//!
//! A thin graphical shell over the library crate: pick PDF files, pick an
//! output folder, watch per-file progress while the batch driver works
//! through the queue on a background thread.
//!
//! The window holds one row per selected file (name, progress bar,
//! percentage, status). Conversion runs on a dedicated worker thread;
//! batch events are forwarded through a channel and drained into the
//! update loop, so the interface stays live while files convert.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use iced::alignment::Vertical;
use iced::futures::channel::mpsc;
use iced::widget::{button, column, container, progress_bar, row, scrollable, text, text_input};
use iced::{Element, Length, Size, Task};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use paperdown::{
    run_batch_sync, BatchObserver, BatchSummary, ConversionConfig, ConversionJob, ConvertError,
    JobStatus,
};

fn main() -> anyhow::Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────
    // The interface shows per-file status; logs are for the terminal the
    // session was launched from. RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("paperdown {} starting", env!("CARGO_PKG_VERSION"));

    iced::application("PDF to Markdown", App::update, App::view)
        .window_size(Size::new(840.0, 600.0))
        .run()
        .context("Failed to start the graphical session")
}

// ── Worker events ────────────────────────────────────────────────────────

/// Batch-driver events crossing from the worker thread to the interface.
#[derive(Debug, Clone)]
enum WorkerEvent {
    BatchStarted { total: usize },
    JobStarted { index: usize },
    JobProgress { index: usize, done: usize, total: usize },
    JobDone { index: usize, output: PathBuf },
    JobFailed { index: usize, error: String },
    BatchFinished { done: usize, failed: usize },
}

/// [`BatchObserver`] that forwards every event into an unbounded channel.
///
/// Send failures are ignored: they only happen when the window is gone,
/// and the batch runs to completion regardless (there is no cancellation).
struct ChannelObserver {
    tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl ChannelObserver {
    fn send(&self, event: WorkerEvent) {
        let _ = self.tx.unbounded_send(event);
    }
}

impl BatchObserver for ChannelObserver {
    fn on_batch_start(&self, total_jobs: usize) {
        self.send(WorkerEvent::BatchStarted { total: total_jobs });
    }

    fn on_job_start(&self, index: usize, _source: &Path) {
        self.send(WorkerEvent::JobStarted { index });
    }

    fn on_job_progress(&self, index: usize, pages_done: usize, total_pages: usize) {
        self.send(WorkerEvent::JobProgress {
            index,
            done: pages_done,
            total: total_pages,
        });
    }

    fn on_job_done(&self, index: usize, output_path: &Path) {
        self.send(WorkerEvent::JobDone {
            index,
            output: output_path.to_path_buf(),
        });
    }

    fn on_job_failed(&self, index: usize, error: &ConvertError) {
        self.send(WorkerEvent::JobFailed {
            index,
            error: error.to_string(),
        });
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        self.send(WorkerEvent::BatchFinished {
            done: summary.done,
            failed: summary.failed,
        });
    }
}

// ── Application state ────────────────────────────────────────────────────

/// One displayed file row. Mirrors the lifecycle of the library's
/// [`ConversionJob`], plus the display-only progress fraction and detail
/// line (output path or failure message).
#[derive(Debug, Clone)]
struct JobRow {
    source: PathBuf,
    status: JobStatus,
    progress: f32,
    detail: String,
}

impl JobRow {
    fn new(source: PathBuf) -> Self {
        Self {
            source,
            status: JobStatus::Pending,
            progress: 0.0,
            detail: String::new(),
        }
    }

    fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

#[derive(Debug, Clone)]
enum Message {
    PickFile,
    PickFiles,
    PickFolder,
    FilesPicked(Option<Vec<PathBuf>>),
    FolderPicked(Option<PathBuf>),
    OutputDirEdited(String),
    Convert,
    Worker(WorkerEvent),
}

#[derive(Default)]
struct App {
    rows: Vec<JobRow>,
    output_dir: String,
    converting: bool,
}

impl App {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .set_title("Choose a PDF file")
                        .add_filter("PDF documents", &["pdf"])
                        .pick_file()
                        .await
                        .map(|file| vec![file.path().to_path_buf()])
                },
                Message::FilesPicked,
            ),

            Message::PickFiles => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .set_title("Choose PDF files")
                        .add_filter("PDF documents", &["pdf"])
                        .pick_files()
                        .await
                        .map(|files| {
                            files
                                .into_iter()
                                .map(|file| file.path().to_path_buf())
                                .collect()
                        })
                },
                Message::FilesPicked,
            ),

            Message::PickFolder => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .set_title("Choose the output folder")
                        .pick_folder()
                        .await
                        .map(|dir| dir.path().to_path_buf())
                },
                Message::FolderPicked,
            ),

            Message::FilesPicked(Some(paths)) => {
                self.add_files(paths);
                Task::none()
            }
            Message::FilesPicked(None) => Task::none(),

            Message::FolderPicked(Some(dir)) => {
                self.output_dir = dir.display().to_string();
                Task::none()
            }
            Message::FolderPicked(None) => Task::none(),

            Message::OutputDirEdited(value) => {
                // The field is frozen while a batch runs; the worker
                // already captured its own copy of the configuration.
                if !self.converting {
                    self.output_dir = value;
                }
                Task::none()
            }

            Message::Convert => self.start_conversion(),

            Message::Worker(event) => {
                self.apply_worker_event(event);
                Task::none()
            }
        }
    }

    /// Append newly picked files. Picking a file that is already listed
    /// re-queues it when it finished or failed, and is otherwise ignored.
    /// The first file ever added seeds the output-folder field with its
    /// parent directory.
    fn add_files(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if let Some(existing) = self.rows.iter_mut().find(|r| r.source == path) {
                if existing.status.is_terminal() {
                    *existing = JobRow::new(path);
                }
                continue;
            }
            if self.output_dir.trim().is_empty() {
                if let Some(parent) = path.parent() {
                    self.output_dir = parent.display().to_string();
                }
            }
            self.rows.push(JobRow::new(path));
        }
    }

    /// Kick off the batch on a worker thread and stream its events back.
    fn start_conversion(&mut self) -> Task<Message> {
        if self.converting || self.rows.is_empty() {
            return Task::none();
        }

        // Terminal rows keep their state; the driver skips them. Anything
        // else is (re)queued as Pending.
        let mut jobs: Vec<ConversionJob> = Vec::with_capacity(self.rows.len());
        for job_row in &mut self.rows {
            let mut job = ConversionJob::new(&job_row.source);
            if job_row.status.is_terminal() {
                job.status = job_row.status;
            } else {
                job_row.status = JobStatus::Pending;
                job_row.progress = 0.0;
                job_row.detail.clear();
            }
            jobs.push(job);
        }

        let output_dir = {
            let trimmed = self.output_dir.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            }
        };
        let config = ConversionConfig {
            output_dir,
            ..ConversionConfig::default()
        };

        let (tx, rx) = mpsc::unbounded();
        std::thread::spawn(move || {
            let observer: Arc<dyn BatchObserver> = Arc::new(ChannelObserver { tx });
            if let Err(e) = run_batch_sync(&mut jobs, &config, Some(observer)) {
                warn!("Batch worker could not start: {}", e);
            }
        });

        self.converting = true;
        Task::run(rx, Message::Worker)
    }

    fn apply_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::BatchStarted { total } => {
                info!("Converting {} files", total);
            }
            WorkerEvent::JobStarted { index } => {
                if let Some(job_row) = self.rows.get_mut(index) {
                    job_row.status = JobStatus::Running;
                    job_row.progress = 0.0;
                }
            }
            WorkerEvent::JobProgress { index, done, total } => {
                if let Some(job_row) = self.rows.get_mut(index) {
                    job_row.progress = if total == 0 {
                        1.0
                    } else {
                        done as f32 / total as f32
                    };
                }
            }
            WorkerEvent::JobDone { index, output } => {
                if let Some(job_row) = self.rows.get_mut(index) {
                    job_row.status = JobStatus::Done;
                    job_row.progress = 1.0;
                    job_row.detail = output.display().to_string();
                }
            }
            WorkerEvent::JobFailed { index, error } => {
                if let Some(job_row) = self.rows.get_mut(index) {
                    job_row.status = JobStatus::Failed;
                    job_row.detail = error;
                }
            }
            WorkerEvent::BatchFinished { done, failed } => {
                info!("Batch finished: {} done, {} failed", done, failed);
                self.converting = false;
            }
        }
    }

    fn status_line(&self) -> String {
        if self.rows.is_empty() {
            return "Add PDF files to convert.".to_string();
        }
        let done = self
            .rows
            .iter()
            .filter(|r| r.status == JobStatus::Done)
            .count();
        let failed = self
            .rows
            .iter()
            .filter(|r| r.status == JobStatus::Failed)
            .count();
        if self.converting {
            format!("Converting… {} of {} finished", done + failed, self.rows.len())
        } else {
            format!(
                "{} files · {} converted · {} failed",
                self.rows.len(),
                done,
                failed
            )
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let busy = self.converting;

        let controls = row![
            button("Add PDF…").on_press_maybe((!busy).then_some(Message::PickFile)),
            button("Add PDFs…").on_press_maybe((!busy).then_some(Message::PickFiles)),
            button("Output folder…").on_press_maybe((!busy).then_some(Message::PickFolder)),
            button(if busy { "Converting…" } else { "Convert" })
                .on_press_maybe((!busy && !self.rows.is_empty()).then_some(Message::Convert)),
        ]
        .spacing(8);

        let output_row = row![
            text("Output folder:").size(14),
            text_input("defaults to each file's own folder", &self.output_dir)
                .on_input(Message::OutputDirEdited)
                .width(Length::Fill),
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        let list = self
            .rows
            .iter()
            .fold(column![].spacing(6), |col, job_row| {
                col.push(view_job_row(job_row))
            });

        let content = column![
            controls,
            output_row,
            scrollable(list).height(Length::Fill).width(Length::Fill),
            text(self.status_line()).size(14),
        ]
        .spacing(12);

        container(content)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// One file row: name, progress bar, percentage, status — plus a detail
/// line underneath once the job is terminal.
fn view_job_row(job_row: &JobRow) -> Element<'_, Message> {
    let status_label = match job_row.status {
        JobStatus::Pending => "waiting",
        JobStatus::Running => "converting",
        JobStatus::Done => "done",
        JobStatus::Failed => "failed",
    };
    let percent = (job_row.progress * 100.0).round() as u32;

    let main_row = row![
        text(job_row.file_name()).width(Length::FillPortion(3)),
        progress_bar(0.0..=1.0, job_row.progress)
            .width(Length::FillPortion(4))
            .height(Length::Fixed(12.0)),
        text(format!("{percent}%")).width(Length::Fixed(48.0)),
        text(status_label).width(Length::Fixed(90.0)),
    ]
    .spacing(8)
    .align_y(Vertical::Center);

    if job_row.detail.is_empty() {
        main_row.into()
    } else {
        column![main_row, text(job_row.detail.clone()).size(12)]
            .spacing(2)
            .into()
    }
}
