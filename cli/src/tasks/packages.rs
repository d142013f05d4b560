use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::config::requirements::{self, Requirement};
use crate::platform;
use crate::resources::Applicable;
use crate::resources::package::{PackageBatch, PackageManager};

/// Hand the rest of the run to `sudo -E <this executable> <same args>`.
///
/// Waits for the elevated process; its outcome is reported but the
/// original run always ends successfully once the hand-off happened.
fn elevate(ctx: &Context) -> Result<TaskResult> {
    let exe = std::env::current_exe().context("locating current executable")?;
    let exe = exe.to_string_lossy();

    let mut args = vec!["-E", &*exe];
    args.extend(ctx.args.iter().map(String::as_str));

    ctx.log.info("elevating privileges...");
    let result = ctx.executor.run_interactive("sudo", &args)?;
    if !result.success {
        ctx.log.warn(&format!(
            "elevated run exited with code {}",
            result.code.map_or_else(|| "?".to_string(), |c| c.to_string())
        ));
    }
    Ok(TaskResult::Handoff(
        "continued with elevated privileges".to_string(),
    ))
}

/// Install missing packages with one package-manager invocation.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.requirements.iter().any(Requirement::is_package)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resolution = requirements::resolve(
            &ctx.config.requirements,
            &ctx.platform.distro,
            &*ctx.executor,
            &*ctx.fs_ops,
            &ctx.home,
        );

        if resolution.packages.is_empty() {
            return Ok(TaskResult::Skipped("all packages present".to_string()));
        }

        let manager = PackageManager::require(&ctx.platform.distro)?;
        ctx.log.debug(&format!("using {manager} for {}", ctx.platform));

        let batch = PackageBatch::new(manager, resolution.packages, &*ctx.executor);
        let names = batch.names.join(" ");

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run: {}", batch.command_line()));
            return Ok(TaskResult::DryRun);
        }

        if !platform::is_privileged(&*ctx.executor)? {
            return elevate(ctx);
        }

        ctx.log.info(&format!("installing: {names}..."));
        batch.apply()?;
        ctx.log.info(&format!("installed: {names}"));
        Ok(TaskResult::Ok)
    }
}
