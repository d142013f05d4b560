//! Task outcomes and the end-of-run summary built from them.
use std::fmt::Write as _;

const RESET: &str = "\x1b[0m";

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Ran and finished.
    Ok,
    /// Nothing in the loaded tables concerns this task.
    NotApplicable,
    /// Ran but found nothing to do.
    Skipped,
    /// Ran under `--dry-run`.
    DryRun,
    /// Ran and returned an error.
    Failed,
}

impl TaskStatus {
    const ALL: [Self; 5] = [
        Self::Ok,
        Self::NotApplicable,
        Self::Skipped,
        Self::DryRun,
        Self::Failed,
    ];

    /// Glyph shown before the task name.
    const fn glyph(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotApplicable => "·",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::NotApplicable => "\x1b[2m",
            Self::Skipped => "\x1b[33m",
            Self::DryRun => "\x1b[37m",
            Self::Failed => "\x1b[31m",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// One recorded task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Task name as shown in the stage header.
    pub name: String,
    /// How it ended.
    pub status: TaskStatus,
    /// Skip reason, error chain or hand-off note.
    pub message: Option<String>,
}

/// Rendered view over a list of [`TaskEntry`] values.
#[derive(Debug)]
pub struct Summary<'a> {
    entries: &'a [TaskEntry],
}

impl<'a> Summary<'a> {
    /// Wrap `entries` for rendering.
    #[must_use]
    pub const fn new(entries: &'a [TaskEntry]) -> Self {
        Self { entries }
    }

    /// Number of entries with `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// One colored line per task, in the order they were recorded.
    #[must_use]
    pub fn task_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| {
                let detail = e
                    .message
                    .as_deref()
                    .map(|m| format!(" ({m})"))
                    .unwrap_or_default();
                format!(
                    "{}{} {}{detail}{RESET}",
                    e.status.color(),
                    e.status.glyph(),
                    e.name
                )
            })
            .collect()
    }

    /// The closing tally, e.g. `4 tasks: 3 ok, 0 n/a, ...` with each count colored.
    #[must_use]
    pub fn totals_line(&self) -> String {
        let mut line = format!("{} tasks:", self.entries.len());
        for (i, status) in TaskStatus::ALL.into_iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let _ = write!(
                line,
                "{sep}{}{} {}{RESET}",
                status.color(),
                self.count(status),
                status.label()
            );
        }
        line
    }
}
