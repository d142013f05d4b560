//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the resolver and the dot file
//! reconciler can be unit-tested without touching the real filesystem.
//! Production code uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::{Context as _, Result};
use std::path::Path;

/// Abstraction over the filesystem reads and writes performed by tasks.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error (`NotFound` when the file is absent).
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;

    /// Write `content` to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory cannot be created or the file
    /// cannot be written.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        crate::resources::helpers::fs::ensure_parent_dir(path)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Holds an in-memory map of file contents and records every write so tests
/// can assert that an unchanged target was never rewritten.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, Vec<u8>>>,
    dirs: Vec<std::path::PathBuf>,
    writes: std::sync::Mutex<Vec<std::path::PathBuf>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    #[must_use]
    pub fn with_file(self, path: impl Into<std::path::PathBuf>, content: &str) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.as_bytes().to_vec());
        }
        self
    }

    /// Mark `path` as an existing directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// Return the current content of `path` as UTF-8, if present.
    #[must_use]
    pub fn content(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .ok()?
            .get(path)
            .map(|c| String::from_utf8_lossy(c).to_string())
    }

    /// Return every path written so far, in order.
    #[must_use]
    pub fn written(&self) -> Vec<std::path::PathBuf> {
        self.writes.lock().map_or_else(|_| vec![], |w| w.clone())
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.iter().any(|d| d == path)
            || self.files.lock().is_ok_and(|f| f.contains_key(path))
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        if self.dirs.iter().any(|d| d == path) {
            return Err(std::io::ErrorKind::IsADirectory.into());
        }
        self.files
            .lock()
            .map_err(|_| std::io::Error::other("mutex poisoned"))?
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.to_path_buf(), content.to_vec());
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(path.to_path_buf());
        }
        Ok(())
    }
}
