//! Configuration tables loaded from the repository's `conf/` directory.

/// Tracked dot files and their targets.
pub mod dotfiles;
/// Required packages and plugins.
pub mod requirements;
pub mod toml_loader;
/// Post-load configuration checks.
pub mod validation;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Directory under the repository root holding the configuration tables.
pub const CONF_DIR: &str = "conf";

/// All loaded configuration.
#[derive(Debug)]
pub struct Config {
    /// Repository root; tracked dot files and patches are relative to it.
    pub root: PathBuf,
    /// Requirement table in file order.
    pub requirements: Vec<requirements::Requirement>,
    /// Dot file table in file order.
    pub dotfiles: Vec<dotfiles::DotFile>,
}

impl Config {
    /// Load both tables from `<root>/conf/`.
    ///
    /// # Errors
    ///
    /// Returns an error if either table exists but cannot be parsed, or if a
    /// requirement tag string is malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let conf = root.join(CONF_DIR);

        let requirements = requirements::load(&conf.join("requirements.toml"))
            .context("loading requirements.toml")?;

        let dotfiles =
            dotfiles::load(&conf.join("dotfiles.toml")).context("loading dotfiles.toml")?;

        Ok(Self {
            root: root.to_path_buf(),
            requirements,
            dotfiles,
        })
    }

    /// Run every validator against this configuration.
    #[must_use]
    pub fn validate(&self, platform: &Platform) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self, platform)
    }

    /// Whether `name` (relative to the root) is a tracked dot file.
    #[must_use]
    pub fn is_tracked(&self, name: &str) -> bool {
        self.dotfiles.iter().any(|d| d.source == name)
    }
}
