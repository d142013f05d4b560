use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Applicable, ResourceChange};
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// List tracked files with uncommitted working-tree edits.
///
/// Runs `git --no-pager diff --name-only` in `root` and keeps only the names
/// accepted by `is_tracked`, in git's output order.
///
/// # Errors
///
/// Returns an error if git cannot be run or exits non-zero.
pub fn changed_files(
    executor: &dyn Executor,
    root: &Path,
    is_tracked: impl Fn(&str) -> bool,
) -> Result<Vec<String>> {
    let result = executor
        .run_in(root, "git", &["--no-pager", "diff", "--name-only"])
        .context("listing modified files")?;
    let listing = result.stdout_text();
    Ok(listing
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty() && is_tracked(name))
        .map(str::to_string)
        .collect())
}

/// Saves a tracked file's working-tree diff as `<file>.patch` and restores
/// the committed content.
#[derive(Debug)]
pub struct PatchResource<'a> {
    /// Tracked file name relative to `root`.
    pub file: String,
    /// Repository root.
    pub root: PathBuf,
    /// Destination of the captured diff.
    pub patch_path: PathBuf,
    executor: &'a dyn Executor,
    fs: &'a dyn FileSystemOps,
}

impl<'a> PatchResource<'a> {
    /// Create a capture for `file`, writing the diff to `patch_path`.
    #[must_use]
    pub fn new(
        file: &str,
        root: &Path,
        patch_path: PathBuf,
        executor: &'a dyn Executor,
        fs: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            file: file.to_string(),
            root: root.to_path_buf(),
            patch_path,
            executor,
            fs,
        }
    }
}

impl Applicable for PatchResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.file, self.patch_path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let diff = self
            .executor
            .run_in(&self.root, "git", &["diff", "--", &self.file])
            .with_context(|| format!("diffing {}", self.file))?;
        self.fs.write(&self.patch_path, &diff.stdout)?;
        self.executor
            .run_in(&self.root, "git", &["restore", &self.file])
            .with_context(|| format!("restoring {}", self.file))?;
        Ok(ResourceChange::Applied)
    }
}
