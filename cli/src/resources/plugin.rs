use std::path::PathBuf;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::{self, Executor};
use crate::operations::FileSystemOps;

/// A plugin that is present once its install path exists.
#[derive(Debug)]
pub struct PluginResource<'a> {
    /// Requirement key as written in the table.
    pub name: String,
    /// Expanded install path.
    pub path: PathBuf,
    /// Shell command that performs the install.
    pub command: String,
    executor: &'a dyn Executor,
    fs: &'a dyn FileSystemOps,
}

impl<'a> PluginResource<'a> {
    /// Create a plugin resource.
    #[must_use]
    pub const fn new(
        name: String,
        path: PathBuf,
        command: String,
        executor: &'a dyn Executor,
        fs: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            name,
            path,
            command,
            executor,
            fs,
        }
    }
}

impl Applicable for PluginResource<'_> {
    fn description(&self) -> String {
        self.name.clone()
    }

    /// Run the install command with the terminal attached.
    ///
    /// The command's exit status is not an error: a failing installer is
    /// reported as [`ResourceChange::Skipped`] and the run continues.
    fn apply(&self) -> Result<ResourceChange> {
        let result = exec::run_shell(self.executor, &self.command)?;
        if result.success {
            Ok(ResourceChange::Applied)
        } else {
            Ok(ResourceChange::Skipped {
                reason: result.code.map_or_else(
                    || "installer was terminated by a signal".to_string(),
                    |code| format!("installer exited with code {code}"),
                ),
            })
        }
    }
}

impl Resource for PluginResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.fs.exists(&self.path) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
