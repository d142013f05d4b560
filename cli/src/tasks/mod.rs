//! Named, ordered tasks that orchestrate resource changes.
/// Shared state handed to every task.
pub mod context;
/// Writing canonical content to dot file targets.
pub mod dotfiles;
/// The batched package install, with privilege hand-off.
pub mod packages;
/// Saving local edits as patches.
pub mod patches;
/// Best-effort plugin installers.
pub mod plugins;
mod processing;

pub use context::Context;
pub use processing::{TaskResult, TaskStats, reconcile};

use std::ops::ControlFlow;

use anyhow::Result;

use crate::logging::TaskStatus;

/// One step of the install pipeline.
pub trait Task: Send + Sync {
    /// Name shown in the stage header, the summary and `--skip`/`--only`.
    fn name(&self) -> &str;

    /// `false` when the loaded tables give this task nothing to look at.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Do the work.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run: a failed package batch, an unreadable
    /// tracked file, a declined capture.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The install pipeline, in order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::InstallPackages),
        Box::new(plugins::InstallPlugins),
        Box::new(patches::CapturePatches),
        Box::new(dotfiles::ApplyDotfiles),
    ]
}

/// Why a run stopped before its last task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    /// A task failed; nothing after it may run.
    Failed {
        /// Name of the failed task.
        task: String,
        /// Error chain rendered with `{:#}`.
        reason: String,
    },
    /// Another process took over the run.
    HandedOff,
}

/// Run `task` if it applies and record how it ended.
///
/// Returns [`ControlFlow::Break`] when nothing after it may run.
pub fn execute(task: &dyn Task, ctx: &Context) -> ControlFlow<Stop> {
    let name = task.name();
    if !task.should_run(ctx) {
        ctx.log.debug(&format!("{name}: not applicable"));
        ctx.log.record_task(name, TaskStatus::NotApplicable, None);
        return ControlFlow::Continue(());
    }

    ctx.log.stage(name);
    let (status, message, flow) = match task.run(ctx) {
        Ok(TaskResult::Ok) => (TaskStatus::Ok, None, ControlFlow::Continue(())),
        Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None, ControlFlow::Continue(())),
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            (TaskStatus::Skipped, Some(reason), ControlFlow::Continue(()))
        }
        Ok(TaskResult::Handoff(note)) => (
            TaskStatus::Ok,
            Some(note),
            ControlFlow::Break(Stop::HandedOff),
        ),
        Err(e) => {
            let reason = format!("{e:#}");
            ctx.log.error(&format!("{name}: {reason}"));
            let stop = Stop::Failed {
                task: name.to_string(),
                reason: reason.clone(),
            };
            (TaskStatus::Failed, Some(reason), ControlFlow::Break(stop))
        }
    };
    ctx.log.record_task(name, status, message.as_deref());
    flow
}
