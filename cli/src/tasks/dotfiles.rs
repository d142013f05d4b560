use std::path::PathBuf;

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats, reconcile};
use crate::error::ResourceError;
use crate::resources::{Resource, ResourceState};
use crate::resources::dotfile::{self, DotFileResource, Origin};

/// Targets of one run, split by whether they were written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Targets that already held the canonical content.
    pub unchanged: Vec<PathBuf>,
    /// Targets that were (or, in a dry run, would be) written.
    pub changed: Vec<PathBuf>,
}

impl Report {
    /// Render the report, one group header followed by tab-indented paths.
    /// Empty groups are left out.
    #[must_use]
    pub fn lines(&self, dry_run: bool) -> Vec<String> {
        let changed_header = if dry_run { "Would change:" } else { "Changed:" };
        let mut lines = Vec::new();
        for (header, paths) in [
            ("Not changed:", &self.unchanged),
            (changed_header, &self.changed),
        ] {
            if paths.is_empty() {
                continue;
            }
            lines.push(header.to_string());
            lines.extend(paths.iter().map(|p| format!("\t{}", p.display())));
        }
        lines
    }
}

/// Write the canonical content of every tracked dot file to each of its
/// targets, leaving byte-identical targets alone.
///
/// A target that cannot hold a file (a directory) fails the task.
#[derive(Debug)]
pub struct ApplyDotfiles;

impl Task for ApplyDotfiles {
    fn name(&self) -> &'static str {
        "Apply dot files"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.dotfiles.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        let mut report = Report::default();

        for file in &ctx.config.dotfiles {
            let canonical =
                dotfile::canonical_content(file, ctx.root(), &*ctx.executor, &*ctx.fs_ops)?;
            match canonical.origin {
                Origin::Patched => ctx.log.debug(&format!("patched: {}", file.source)),
                Origin::PatchFailed => ctx.log.warn(&format!(
                    "{} did not apply, targets of {} will be emptied",
                    file.patch_name(),
                    file.source
                )),
                Origin::Tracked => {}
            }

            for target in file.target_paths(&ctx.home) {
                let resource =
                    DotFileResource::new(target, canonical.content.clone(), &*ctx.fs_ops);
                let state = resource.current_state()?;
                if let ResourceState::Invalid { reason } = state {
                    return Err(ResourceError::InvalidTarget {
                        target: resource.target.display().to_string(),
                        reason,
                    }
                    .into());
                }
                let delta = reconcile(ctx, &resource, state, "write")?;
                if delta.changed > 0 {
                    report.changed.push(resource.target);
                } else {
                    report.unchanged.push(resource.target);
                }
                stats += delta;
            }
        }

        for line in report.lines(ctx.dry_run) {
            ctx.log.info(&line);
        }
        Ok(stats.finish(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::dotfiles::DotFile;
    use crate::exec::Executor;
    use crate::operations::{FileSystemOps, MockFileSystemOps};
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{config_with, make_context_for};
    use std::path::Path;
    use std::sync::Arc;

    fn dotfile(source: &str, targets: &[&str]) -> DotFile {
        DotFile {
            source: source.to_string(),
            targets: targets.iter().map(ToString::to_string).collect(),
        }
    }

    fn context(
        dotfiles: Vec<DotFile>,
        executor: MockExecutor,
        fs: MockFileSystemOps,
    ) -> (Context, Arc<MockExecutor>, Arc<MockFileSystemOps>) {
        let executor = Arc::new(executor);
        let fs = Arc::new(fs);
        let ctx = make_context_for(
            config_with(vec![], dotfiles),
            "ubuntu",
            Arc::clone(&executor) as Arc<dyn Executor>,
        )
        .with_fs_ops(Arc::clone(&fs) as Arc<dyn FileSystemOps>);
        (ctx, executor, fs)
    }

    fn written(fs: &MockFileSystemOps) -> Vec<String> {
        fs.written()
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    #[test]
    fn identical_target_is_not_rewritten() {
        let (ctx, _, fs) = context(
            vec![dotfile(".zshrc", &["~/.zshrc"])],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new()
                .with_file("/repo/.zshrc", "A")
                .with_file("/home/test/.zshrc", "A"),
        );

        assert!(matches!(ApplyDotfiles.run(&ctx).unwrap(), TaskResult::Ok));
        assert!(fs.written().is_empty());
    }

    #[test]
    fn differing_target_gets_tracked_content() {
        let (ctx, _, fs) = context(
            vec![dotfile(".gitconfig", &["~/.gitconfig"])],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new()
                .with_file("/repo/.gitconfig", "A")
                .with_file("/home/test/.gitconfig", "B"),
        );

        ApplyDotfiles.run(&ctx).unwrap();
        assert_eq!(
            fs.content(Path::new("/home/test/.gitconfig")).as_deref(),
            Some("A")
        );
        assert_eq!(written(&fs), vec!["/home/test/.gitconfig"]);
    }

    #[test]
    fn missing_target_is_created_for_every_listed_path() {
        let (ctx, _, fs) = context(
            vec![dotfile(".vimrc", &["~/.vimrc", "~/.config/nvim/init.vim"])],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new().with_file("/repo/.vimrc", "set nu"),
        );

        ApplyDotfiles.run(&ctx).unwrap();
        assert_eq!(
            written(&fs),
            vec!["/home/test/.vimrc", "/home/test/.config/nvim/init.vim"]
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let (ctx, _, fs) = context(
            vec![
                dotfile(".zshrc", &["~/.zshrc"]),
                dotfile(".gitconfig", &["~/.gitconfig"]),
            ],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new()
                .with_file("/repo/.zshrc", "zsh")
                .with_file("/repo/.gitconfig", "git")
                .with_file("/home/test/.gitconfig", "old"),
        );

        ApplyDotfiles.run(&ctx).unwrap();
        let after_first = fs.written().len();
        assert_eq!(after_first, 2);

        ApplyDotfiles.run(&ctx).unwrap();
        assert_eq!(fs.written().len(), after_first);
    }

    #[test]
    fn clean_patch_output_is_written() {
        let (ctx, executor, fs) = context(
            vec![dotfile(".zshrc", &["~/.zshrc"])],
            MockExecutor::ok("A\nlocal\n"),
            MockFileSystemOps::new()
                .with_file("/repo/.zshrc", "A\n")
                .with_file("/repo/.zshrc.patch", "+local\n")
                .with_file("/home/test/.zshrc", "A\n"),
        );

        ApplyDotfiles.run(&ctx).unwrap();
        assert_eq!(
            executor.calls(),
            vec!["patch -p1 .zshrc .zshrc.patch --output -"]
        );
        assert_eq!(
            fs.content(Path::new("/home/test/.zshrc")).as_deref(),
            Some("A\nlocal\n")
        );
    }

    #[test]
    fn failed_patch_empties_the_target() {
        let (ctx, _, fs) = context(
            vec![dotfile(".zshrc", &["~/.zshrc"])],
            MockExecutor::fail(),
            MockFileSystemOps::new()
                .with_file("/repo/.zshrc", "A\n")
                .with_file("/repo/.zshrc.patch", "garbage")
                .with_file("/home/test/.zshrc", "A\n"),
        );

        ApplyDotfiles.run(&ctx).unwrap();
        assert_eq!(
            fs.content(Path::new("/home/test/.zshrc")).as_deref(),
            Some("")
        );
    }

    #[test]
    fn missing_tracked_file_fails_the_task() {
        let (ctx, _, fs) = context(
            vec![dotfile(".tmux.conf", &["~/.tmux.conf"])],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new(),
        );

        let err = ApplyDotfiles.run(&ctx).unwrap_err();
        assert!(err.downcast_ref::<ResourceError>().is_some());
        assert!(fs.written().is_empty());
    }

    #[test]
    fn directory_target_fails_the_task() {
        let (ctx, _, fs) = context(
            vec![dotfile(".zshrc", &["~/.zshrc"])],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new()
                .with_file("/repo/.zshrc", "A")
                .with_dir("/home/test/.zshrc"),
        );

        let err = ApplyDotfiles.run(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::InvalidTarget { target, .. }) if target == "/home/test/.zshrc"
        ));
        assert!(fs.written().is_empty());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (mut ctx, _, fs) = context(
            vec![dotfile(".gitconfig", &["~/.gitconfig"])],
            MockExecutor::with_responses(vec![]),
            MockFileSystemOps::new()
                .with_file("/repo/.gitconfig", "A")
                .with_file("/home/test/.gitconfig", "B"),
        );
        ctx.dry_run = true;

        assert!(matches!(
            ApplyDotfiles.run(&ctx).unwrap(),
            TaskResult::DryRun
        ));
        assert!(fs.written().is_empty());
    }

    #[test]
    fn report_groups_and_omits_empty_ones() {
        let report = Report {
            unchanged: vec![PathBuf::from("/home/u/.zshrc")],
            changed: vec![],
        };
        assert_eq!(report.lines(false), vec!["Not changed:", "\t/home/u/.zshrc"]);

        let report = Report {
            unchanged: vec![PathBuf::from("/home/u/.zshrc")],
            changed: vec![PathBuf::from("/home/u/.gitconfig")],
        };
        assert_eq!(
            report.lines(false),
            vec![
                "Not changed:",
                "\t/home/u/.zshrc",
                "Changed:",
                "\t/home/u/.gitconfig"
            ]
        );
        assert_eq!(report.lines(true)[2], "Would change:");
        assert!(Report::default().lines(false).is_empty());
    }
}
