use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::Log;
use super::summary::{Summary, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Target for section headers.
pub(super) const STAGE_TARGET: &str = "dotstrap::stage";
/// Target for actions skipped by `--dry-run`.
pub(super) const DRY_RUN_TARGET: &str = "dotstrap::dry_run";

/// The [`Log`] used by the binary.
///
/// Output is emitted as [`tracing`] events; what reaches the console and
/// `$XDG_CACHE_HOME/dotstrap/<command>.log` is decided by the layers that
/// [`init_subscriber`](super::init_subscriber) installs. Task outcomes are
/// kept in memory until [`print_summary`](Self::print_summary).
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`. Only remembers where the log file lives; the
    /// file itself is opened by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Print one line per recorded task, the totals and the log path.
    /// Prints nothing when no task was recorded.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let entries = self.task_entries();
        if entries.is_empty() {
            return;
        }
        let summary = Summary::new(&entries);

        println!();
        self.stage("Summary");
        for line in summary.task_lines() {
            self.info(&line);
        }
        println!();
        self.info(&summary.totals_line());

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }
}
