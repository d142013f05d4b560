//! Console and log-file output, plus the per-run task summary.
//!
//! Everything goes through [`tracing`]: [`init_subscriber`] installs a
//! console layer and a file layer, and [`Logger`] tags stage headers and
//! dry-run lines with their own targets so both layers can style them.

mod logger;
mod subscriber;
mod summary;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use summary::{Summary, TaskEntry, TaskStatus};

/// Sink for run output and task outcomes.
///
/// Tasks only see `Arc<dyn Log>`, which lets tests hand them a fresh
/// [`Logger`] and inspect what it recorded.
pub trait Log: Send + Sync {
    /// Header line opening a section of the run.
    fn stage(&self, msg: &str);
    /// Normal progress line.
    fn info(&self, msg: &str);
    /// Detail line, shown on the console only with `--verbose`.
    fn debug(&self, msg: &str);
    /// Something the operator should look at; the run continues.
    fn warn(&self, msg: &str);
    /// Something went wrong.
    fn error(&self, msg: &str);
    /// An action skipped because of `--dry-run`.
    fn dry_run(&self, msg: &str);
    /// Remember how a task ended so it shows up in the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
