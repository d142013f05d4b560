//! Subcommand implementations and the setup they share.
pub mod check;
pub mod completions;
pub mod install;
pub mod version;

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::validation::ValidationWarning;
use crate::config::{CONF_DIR, Config};
use crate::error::TaskError;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Stop, Task};

/// Environment variable naming the repository root.
pub const ROOT_ENV: &str = "DOTSTRAP_ROOT";

/// Version string embedded by the build script.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root resolution, platform detection and configuration
/// loading so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected (or overridden) host platform.
    pub platform: Platform,
    /// Both configuration tables.
    pub config: Config,
    /// What the validation pass found, already logged.
    pub warnings: Vec<ValidationWarning>,
}

impl CommandSetup {
    /// Resolve the root, detect the platform, load and validate configuration.
    ///
    /// Validation warnings are logged; they never stop the run here.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined, the distro
    /// cannot be detected, or either table fails to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;
        log.debug(&format!("root: {}", root.display()));

        log.stage("Detecting platform");
        let platform = Platform::resolve(global.distro.as_deref(), &global.os_release)?;
        log.info(&format!("distro: {platform}"));

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.info(&format!(
            "loaded {} requirements, {} dot files",
            config.requirements.len(),
            config.dotfiles.len()
        ));

        let warnings = config.validate(&platform);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!("  {warning}"));
            }
        }

        Ok(Self {
            platform,
            config,
            warnings,
        })
    }
}

/// Resolve the repository root from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if no candidate directory holds a `conf/` directory.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    find_root(
        global.root.as_deref(),
        std::env::var_os(ROOT_ENV).map(PathBuf::from),
        std::env::current_exe().ok(),
        std::env::current_dir()?,
    )
}

/// Pick the first usable root: `explicit`, then `env`, then a directory
/// above the executable that holds `conf/`, then `cwd` if it holds `conf/`.
fn find_root(
    explicit: Option<&Path>,
    env: Option<PathBuf>,
    exe: Option<PathBuf>,
    cwd: PathBuf,
) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return canonical(root);
    }
    if let Some(root) = env {
        return canonical(&root);
    }

    if let Some(parent) = exe.as_deref().and_then(Path::parent) {
        // cli/target/release/ or bin/ inside the repository
        let candidates = [parent.join("../../.."), parent.join("..")];
        for candidate in &candidates {
            if candidate.join(CONF_DIR).is_dir() {
                return canonical(candidate);
            }
        }
    }

    if cwd.join(CONF_DIR).is_dir() {
        return canonical(&cwd);
    }

    anyhow::bail!("cannot determine repository root. Use --root or set {ROOT_ENV}");
}

fn canonical(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path)
        .with_context(|| format!("resolving repository root {}", path.display()))
}

/// Apply `--only` / `--skip` to `all`, keeping order.
///
/// Matching is a case-insensitive substring test on the task name; `--only`
/// wins when both are given.
#[must_use]
pub fn select_tasks<'a>(all: &'a [Box<dyn Task>], opts: &InstallOpts) -> Vec<&'a dyn Task> {
    all.iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !opts.only.is_empty() {
                return opts.only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            !opts.skip.iter().any(|s| name.contains(&s.to_lowercase()))
        })
        .map(Box::as_ref)
        .collect()
}

/// Execute tasks in order until one stops the run, then print the summary.
///
/// A hand-off to an elevated process ends the run successfully.
///
/// # Errors
///
/// Returns [`TaskError::ExecutionFailed`] for the first failed task.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    let mut stop = None;
    for task in tasks {
        if let ControlFlow::Break(reason) = tasks::execute(task, ctx) {
            stop = Some(reason);
            break;
        }
    }

    log.print_summary();

    match stop {
        Some(Stop::Failed { task, reason }) => {
            Err(TaskError::ExecutionFailed { task, reason }.into())
        }
        Some(Stop::HandedOff) | None => Ok(()),
    }
}
