use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::requirements::{self, Requirement};
use crate::resources::plugin::PluginResource;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Run the install command of every plugin whose path is missing.
///
/// Installers are best-effort: a non-zero exit is logged at debug level and
/// the run continues.
#[derive(Debug)]
pub struct InstallPlugins;

impl Task for InstallPlugins {
    fn name(&self) -> &'static str {
        "Install plugins"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config
            .requirements
            .iter()
            .any(|r: &Requirement| !r.is_package())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resolution = requirements::resolve(
            &ctx.config.requirements,
            &ctx.platform.distro,
            &*ctx.executor,
            &*ctx.fs_ops,
            &ctx.home,
        );

        if resolution.plugins.is_empty() {
            return Ok(TaskResult::Skipped("all plugins present".to_string()));
        }

        let mut stats = TaskStats::new();
        for missing in resolution.plugins {
            let resource = PluginResource::new(
                missing.name,
                missing.path,
                missing.command,
                &*ctx.executor,
                &*ctx.fs_ops,
            );

            // An earlier installer may have created this path already.
            if resource.current_state()? == ResourceState::Correct {
                ctx.log.debug(&format!("ok: {}", resource.description()));
                stats.already_ok += 1;
                continue;
            }

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would install: {}", resource.description()));
                stats.changed += 1;
                continue;
            }

            ctx.log
                .info(&format!("installing: {}...", resource.description()));
            if let ResourceChange::Skipped { reason } = resource.apply()? {
                ctx.log
                    .debug(&format!("{}: {reason}", resource.description()));
            }
            ctx.log
                .info(&format!("installed: {}", resource.description()));
            stats.changed += 1;
        }

        Ok(stats.finish(ctx))
    }
}
