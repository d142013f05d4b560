use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::dotfiles::DotFile;
use crate::error::ResourceError;
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// Where canonical content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The tracked file as committed.
    Tracked,
    /// The tracked file with its patch applied.
    Patched,
    /// A patch exists but did not apply; content is empty.
    PatchFailed,
}

/// Content every target of a tracked file must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// Bytes to compare against and write to targets.
    pub content: Vec<u8>,
    /// How `content` was produced.
    pub origin: Origin,
}

/// Compute the canonical content of `file`.
///
/// With a `<file>.patch` next to the tracked file, the content is the output
/// of `patch -p1 <file> <file>.patch --output -` run in `root`; when patch
/// exits non-zero the content is empty, so every target is rewritten.
/// Without a patch the tracked file is read as-is.
///
/// # Errors
///
/// Returns [`ResourceError::NotFound`] if the tracked file is missing, or an
/// error if it cannot be read or `patch` cannot be spawned.
pub fn canonical_content(
    file: &DotFile,
    root: &Path,
    executor: &dyn Executor,
    fs: &dyn FileSystemOps,
) -> Result<Canonical> {
    let source = file.source_path(root);
    if !fs.exists(&source) {
        return Err(ResourceError::NotFound(source.display().to_string()).into());
    }

    if fs.exists(&file.patch_path(root)) {
        let patch_name = file.patch_name();
        let result = executor.run_in_unchecked(
            root,
            "patch",
            &["-p1", &file.source, &patch_name, "--output", "-"],
        )?;
        return Ok(if result.success {
            Canonical {
                content: result.stdout,
                origin: Origin::Patched,
            }
        } else {
            Canonical {
                content: Vec::new(),
                origin: Origin::PatchFailed,
            }
        });
    }

    let content = fs
        .read(&source)
        .with_context(|| format!("reading {}", source.display()))?;
    Ok(Canonical {
        content,
        origin: Origin::Tracked,
    })
}

/// One target path of a tracked file.
#[derive(Debug)]
pub struct DotFileResource<'a> {
    /// Expanded target path.
    pub target: PathBuf,
    content: Vec<u8>,
    fs: &'a dyn FileSystemOps,
}

impl<'a> DotFileResource<'a> {
    /// Create a target that must hold `content`.
    #[must_use]
    pub const fn new(target: PathBuf, content: Vec<u8>, fs: &'a dyn FileSystemOps) -> Self {
        Self {
            target,
            content,
            fs,
        }
    }
}

impl Applicable for DotFileResource<'_> {
    fn description(&self) -> String {
        self.target.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.fs.write(&self.target, &self.content)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DotFileResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        match self.fs.read(&self.target) {
            Ok(current) if current == self.content => Ok(ResourceState::Correct),
            Ok(current) => Ok(ResourceState::Incorrect {
                current: format!("{} bytes differ", current.len()),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ResourceState::Missing),
            Err(e) if e.kind() == ErrorKind::IsADirectory => Ok(ResourceState::Invalid {
                reason: "target is a directory".to_string(),
            }),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.target.display())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;
    use crate::resources::test_helpers::MockExecutor;

    fn zshrc() -> DotFile {
        DotFile {
            source: ".zshrc".to_string(),
            targets: vec!["~/.zshrc".to_string()],
        }
    }

    #[test]
    fn canonical_is_raw_file_without_patch() {
        let fs = MockFileSystemOps::new().with_file("/repo/.zshrc", "A");
        let executor = MockExecutor::ok("");
        let canonical = canonical_content(&zshrc(), Path::new("/repo"), &executor, &fs).unwrap();
        assert_eq!(canonical.content, b"A");
        assert_eq!(canonical.origin, Origin::Tracked);
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn canonical_is_patched_output() {
        let fs = MockFileSystemOps::new()
            .with_file("/repo/.zshrc", "A\n")
            .with_file("/repo/.zshrc.patch", "-A\n+B\n");
        let executor = MockExecutor::ok("B\n");
        let canonical = canonical_content(&zshrc(), Path::new("/repo"), &executor, &fs).unwrap();
        assert_eq!(canonical.content, b"B\n");
        assert_eq!(canonical.origin, Origin::Patched);
        assert_eq!(
            executor.calls(),
            vec!["patch -p1 .zshrc .zshrc.patch --output -"]
        );
    }

    #[test]
    fn failed_patch_yields_empty_content() {
        let fs = MockFileSystemOps::new()
            .with_file("/repo/.zshrc", "A\n")
            .with_file("/repo/.zshrc.patch", "garbage");
        let executor = MockExecutor::fail();
        let canonical = canonical_content(&zshrc(), Path::new("/repo"), &executor, &fs).unwrap();
        assert!(canonical.content.is_empty());
        assert_eq!(canonical.origin, Origin::PatchFailed);
    }

    #[test]
    fn missing_tracked_file_is_not_found() {
        let fs = MockFileSystemOps::new();
        let executor = MockExecutor::ok("");
        let err = canonical_content(&zshrc(), Path::new("/repo"), &executor, &fs).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn equal_target_is_correct() {
        let fs = MockFileSystemOps::new().with_file("/home/test/.zshrc", "A");
        let res = DotFileResource::new(PathBuf::from("/home/test/.zshrc"), b"A".to_vec(), &fs);
        assert_eq!(res.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn different_target_is_incorrect() {
        let fs = MockFileSystemOps::new().with_file("/home/test/.gitconfig", "B");
        let res = DotFileResource::new(PathBuf::from("/home/test/.gitconfig"), b"A".to_vec(), &fs);
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn absent_target_is_missing() {
        let fs = MockFileSystemOps::new();
        let res = DotFileResource::new(PathBuf::from("/home/test/.zshrc"), b"A".to_vec(), &fs);
        assert_eq!(res.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn apply_writes_content() {
        let fs = MockFileSystemOps::new().with_file("/home/test/.gitconfig", "B");
        let res = DotFileResource::new(PathBuf::from("/home/test/.gitconfig"), b"A".to_vec(), &fs);
        assert_eq!(res.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(
            fs.content(Path::new("/home/test/.gitconfig")).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn system_fs_target_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fs = crate::operations::SystemFileSystemOps;
        let target = dir.path().join("config/app/rc");
        let res = DotFileResource::new(target.clone(), b"x".to_vec(), &fs);
        assert_eq!(res.current_state().unwrap(), ResourceState::Missing);
        res.apply().unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"x");
        assert_eq!(res.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn directory_target_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let fs = crate::operations::SystemFileSystemOps;
        let res = DotFileResource::new(dir.path().to_path_buf(), b"x".to_vec(), &fs);
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }
}
