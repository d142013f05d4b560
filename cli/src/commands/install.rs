//! Command: install requirements, capture local edits and apply dot files.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::prompt::{AssumeYes, Prompt, StdinPrompt};
use crate::tasks::{self, Context};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if setup fails or a task fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("dotstrap {}", super::version()));

    let setup = super::CommandSetup::init(global, log)?;

    let prompt: Arc<dyn Prompt> = if opts.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinPrompt)
    };
    let ctx = Context::new(
        Arc::new(setup.config),
        Arc::new(setup.platform),
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        Arc::new(SystemExecutor),
        prompt,
    )?;

    let all = tasks::all_install_tasks();
    let selected = super::select_tasks(&all, opts);
    super::run_tasks_to_completion(selected, &ctx, log)
}
