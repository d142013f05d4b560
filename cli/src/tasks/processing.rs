//! Task outcomes, counters, and bringing one resource in line.

use std::ops::AddAssign;

use anyhow::{Result, bail};

use super::context::Context;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// How a task's `run` ended when it did not fail.
///
/// # Examples
///
/// ```
/// use dotstrap_cli::tasks::TaskResult;
///
/// let skipped = TaskResult::Skipped("nothing missing".into());
/// assert!(matches!(skipped, TaskResult::Skipped(ref why) if why == "nothing missing"));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Work was done, or there was nothing left to do.
    Ok,
    /// Nothing to do; the reason ends up in the summary.
    Skipped(String),
    /// `--dry-run` was set, so changes were only logged.
    DryRun,
    /// An elevated copy of the program took over the run; nothing after
    /// this task may run here.
    Handoff(String),
}

/// Per-item counters for tasks that walk a list.
///
/// # Examples
///
/// ```
/// use dotstrap_cli::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// assert_eq!(stats.summary(true), "1 would change, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Items written or installed (or that would be, in a dry run).
    pub changed: u32,
    /// Items that needed nothing.
    pub already_ok: u32,
    /// Items left alone, e.g. a plugin whose installer failed.
    pub skipped: u32,
}

impl TaskStats {
    /// All counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line tally; the skipped count only appears when non-zero.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut line = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            line.push_str(&format!(", {} skipped", self.skipped));
        }
        line
    }

    /// Log the tally and end the task with `Ok`, or `DryRun` under `--dry-run`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl AddAssign for TaskStats {
    fn add_assign(&mut self, rhs: Self) {
        self.changed += rhs.changed;
        self.already_ok += rhs.already_ok;
        self.skipped += rhs.skipped;
    }
}

/// Bring `resource` from `state` to its desired state and report what
/// happened as a one-item [`TaskStats`].
///
/// `verb` names the action in log lines ("write", "install"). Under
/// `--dry-run` nothing is applied; a resource that needs work is logged and
/// counted as changed.
///
/// # Errors
///
/// Returns the error from [`apply`](crate::resources::Applicable::apply), or
/// an error naming the reason when the resource reports itself as skipped.
pub fn reconcile<R: Resource>(
    ctx: &Context,
    resource: &R,
    state: ResourceState,
    verb: &str,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();

    let current = match state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok = 1;
            return Ok(delta);
        }
        ResourceState::Invalid { reason } => {
            ctx.log.debug(&format!("skipping {desc}: {reason}"));
            delta.skipped = 1;
            return Ok(delta);
        }
        ResourceState::Missing => None,
        ResourceState::Incorrect { current } => Some(current),
    };

    if ctx.dry_run {
        ctx.log.dry_run(&match current {
            Some(current) => format!("would {verb} {desc} ({current})"),
            None => format!("would {verb}: {desc}"),
        });
        delta.changed = 1;
        return Ok(delta);
    }

    match resource.apply()? {
        ResourceChange::Applied => {
            ctx.log.debug(&format!("{verb}: {desc}"));
            delta.changed = 1;
        }
        ResourceChange::AlreadyCorrect => delta.already_ok = 1,
        ResourceChange::Skipped { reason } => bail!("failed to {verb} {desc}: {reason}"),
    }
    Ok(delta)
}
