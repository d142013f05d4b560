//! Things the installer can check and fix: packages, plugins, dot file
//! targets and patch captures.
/// Canonical dot file content and target files.
pub mod dotfile;
pub mod helpers;
pub mod package;
/// Patch capture for locally modified tracked files.
pub mod patch;
/// Plugin installers run through the shell.
pub mod plugin;

use anyhow::Result;

/// Something that can be described and made to happen.
///
/// Package batches stop here, since their state comes from one query over
/// the whole list. Everything that can look at itself also implements
/// [`Resource`].
pub trait Applicable {
    /// Short label for log lines, e.g. a target path or plugin name.
    fn description(&self) -> String;

    /// Make the change.
    ///
    /// # Errors
    ///
    /// Returns an error when a file cannot be written or a required command
    /// fails. Best-effort resources report failure as
    /// [`ResourceChange::Skipped`] instead.
    fn apply(&self) -> Result<ResourceChange>;
}

/// What a resource looks like right now, compared with what it should be.
///
/// # Examples
///
/// ```
/// use dotstrap_cli::resources::ResourceState;
///
/// let stale = ResourceState::Incorrect { current: "content differs".into() };
/// assert_ne!(stale, ResourceState::Correct);
/// assert_ne!(ResourceState::Missing, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Absent: no target file, no plugin directory.
    Missing,
    /// Already as desired.
    Correct,
    /// Present but different.
    Incorrect {
        /// How it differs.
        current: String,
    },
    /// Cannot be fixed from here, e.g. the target path is a directory.
    Invalid {
        /// Why not.
        reason: String,
    },
}

/// What [`Applicable::apply`] did.
///
/// # Examples
///
/// ```
/// use dotstrap_cli::resources::ResourceChange;
///
/// let skipped = ResourceChange::Skipped { reason: "installer exited with code 1".into() };
/// assert_ne!(skipped, ResourceChange::Applied);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Created or overwritten.
    Applied,
    /// Turned out to need nothing.
    AlreadyCorrect,
    /// Gave up without failing the task.
    Skipped {
        /// What went wrong.
        reason: String,
    },
}

/// An [`Applicable`] that can inspect its own state.
pub trait Resource: Applicable {
    /// Look at the system and report the current [`ResourceState`].
    ///
    /// # Errors
    ///
    /// Returns an error when the state cannot be read, e.g. an unreadable
    /// target file.
    fn current_state(&self) -> Result<ResourceState>;
}
