use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::error::TaskError;
use crate::resources::Applicable;
use crate::resources::patch::{self, PatchResource};

const QUESTION: &str = "Create patch? [y/N]";

/// Save local edits of tracked dot files as patches before they are
/// overwritten.
///
/// The operator must agree; declining stops the run with the tracked files
/// left as they are.
#[derive(Debug)]
pub struct CapturePatches;

impl Task for CapturePatches {
    fn name(&self) -> &'static str {
        "Capture local edits"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.dotfiles.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = &ctx.config;
        let files = patch::changed_files(&*ctx.executor, ctx.root(), |name| {
            config.is_tracked(name)
        })?;

        if files.is_empty() {
            return Ok(TaskResult::Skipped("no local edits".to_string()));
        }

        let captures: Vec<PatchResource> = config
            .dotfiles
            .iter()
            .filter(|d| files.contains(&d.source))
            .map(|d| {
                PatchResource::new(
                    &d.source,
                    ctx.root(),
                    d.patch_path(ctx.root()),
                    &*ctx.executor,
                    &*ctx.fs_ops,
                )
            })
            .collect();

        ctx.log
            .warn(&format!("local edits found in: {}", files.join(", ")));

        if ctx.dry_run {
            for capture in &captures {
                ctx.log
                    .dry_run(&format!("would capture: {}", capture.description()));
            }
            return Ok(TaskResult::DryRun);
        }

        if !ctx.prompt.confirm(QUESTION)? {
            return Err(TaskError::CaptureDeclined {
                files: files.join(", "),
            }
            .into());
        }

        let mut stats = TaskStats::new();
        for capture in &captures {
            capture.apply()?;
            ctx.log
                .info(&format!("captured: {}", capture.description()));
            stats.changed += 1;
        }
        Ok(stats.finish(ctx))
    }
}
