use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::prompt::Prompt;

/// Everything a task may read or act through.
///
/// Each side effect sits behind an `Arc<dyn ...>` so tests can swap in a
/// double with the `with_*` methods.
#[derive(Clone)]
pub struct Context {
    /// Both `conf/` tables and the repository root.
    pub config: Arc<Config>,
    /// Host distro.
    pub platform: Arc<Platform>,
    /// Output and task outcomes.
    pub log: Arc<dyn Log>,
    /// Log what would change instead of changing it.
    pub dry_run: bool,
    /// Expansion of `~` in targets and plugin paths.
    pub home: PathBuf,
    /// External commands.
    pub executor: Arc<dyn Executor>,
    /// File reads and writes.
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Yes/no questions to the operator.
    pub prompt: Arc<dyn Prompt>,
    /// Arguments after the program name, passed on unchanged when the run is
    /// handed to an elevated process.
    pub args: Vec<String>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.config.root)
            .field("platform", &self.platform)
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context for a real run: home from `$HOME`, real filesystem, and the
    /// process arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is not set.
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        prompt: Arc<dyn Prompt>,
    ) -> Result<Self> {
        let home = std::env::var_os("HOME").context("HOME environment variable is not set")?;
        Ok(Self {
            config,
            platform,
            log,
            dry_run,
            home: PathBuf::from(home),
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
            prompt,
            args: std::env::args().skip(1).collect(),
        })
    }

    /// Repository root holding `conf/` and the tracked files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Same context, logging to `log`.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            log,
            ..self.clone()
        }
    }

    /// Same context, reading and writing files through `fs_ops`.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs_ops,
            ..self.clone()
        }
    }

    /// Same context, asking `prompt` instead.
    #[must_use]
    pub fn with_prompt(&self, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            prompt,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::{Logger, TaskStatus};
    use crate::operations::MockFileSystemOps;
    use crate::tasks::test_helpers::{empty_config, make_context};

    fn ctx() -> Context {
        make_context(empty_config(PathBuf::from("/dotfiles")))
    }

    #[test]
    fn root_comes_from_config() {
        assert_eq!(ctx().root(), Path::new("/dotfiles"));
    }

    #[test]
    fn with_log_only_swaps_the_logger() {
        let ctx = ctx();
        let log = Arc::new(Logger::new("new"));
        let ctx2 = ctx.with_log(Arc::clone(&log) as Arc<dyn Log>);
        ctx2.log.record_task("t", TaskStatus::Ok, None);
        assert_eq!(log.task_entries().len(), 1);
        assert_eq!(ctx2.root(), ctx.root());
        assert_eq!(ctx2.home, ctx.home);
        assert_eq!(ctx2.args, ctx.args);
    }

    #[test]
    fn with_fs_ops_swaps_the_filesystem() {
        let ctx2 = ctx().with_fs_ops(Arc::new(MockFileSystemOps::new().with_dir("/only/in/mock")));
        assert!(ctx2.fs_ops.exists(Path::new("/only/in/mock")));
    }

    #[test]
    fn debug_shows_root_and_flags() {
        let debug = format!("{:?}", ctx());
        assert!(debug.contains("/dotfiles"));
        assert!(debug.contains("dry_run"));
    }
}
