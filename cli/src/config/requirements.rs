//! Requirement table: packages and plugin installers, plus the resolver that
//! decides which of them are still missing on this host.
//!
//! Each entry maps a tool name (or a filesystem path for plugins) to a tag
//! string:
//!
//! - `bin`: a package installed through the distro's package manager
//! - `bin;+arch,+archarm`: a package only wanted on the listed distros
//! - `bin;-fedora`: a package wanted everywhere except the listed distros
//! - anything else: an opaque shell command that installs a plugin at the
//!   entry's path
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::toml_loader;
use crate::error::ConfigError;
use crate::exec::Executor;
use crate::operations::FileSystemOps;
use crate::resources::helpers::fs::expand_tilde;

/// Distro restriction attached to a package requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistroFilter {
    /// Wanted on every distro.
    Any,
    /// Wanted only on the listed distros (`+distro` tags).
    Only(Vec<String>),
    /// Wanted everywhere except the listed distros (`-distro` tags).
    Except(Vec<String>),
}

impl DistroFilter {
    /// Whether a package with this filter is wanted on `distro`.
    #[must_use]
    pub fn admits(&self, distro: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(list) => list.iter().any(|d| d == distro),
            Self::Except(list) => !list.iter().any(|d| d == distro),
        }
    }

    /// Distros named by the filter's tags.
    #[must_use]
    pub fn distros(&self) -> &[String] {
        match self {
            Self::Any => &[],
            Self::Only(list) | Self::Except(list) => list,
        }
    }
}

/// How a requirement is satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementKind {
    /// Installed through the package manager; satisfied when the binary is on `PATH`.
    Package {
        /// Distro restriction.
        filter: DistroFilter,
    },
    /// Installed by a shell command; satisfied when the entry's path exists.
    Plugin {
        /// Shell command line that performs the install.
        command: String,
    },
}

/// A single row of the requirement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Binary name for packages, filesystem path (may start with `~`) for plugins.
    pub name: String,
    /// Install class.
    pub kind: RequirementKind,
}

impl Requirement {
    /// Parse a table entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRequirement`] for an empty value, an
    /// empty or unsigned tag, or a tag list mixing inclusion and exclusion.
    pub fn parse(name: &str, tag: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRequirement {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let tag = tag.trim();
        if tag.is_empty() {
            return Err(invalid("value is empty"));
        }

        let tags = if tag == "bin" {
            None
        } else if let Some(rest) = tag.strip_prefix("bin;") {
            Some(rest)
        } else {
            return Ok(Self {
                name: name.to_string(),
                kind: RequirementKind::Plugin {
                    command: tag.to_string(),
                },
            });
        };

        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for raw in tags.into_iter().flat_map(|t| t.split(',')) {
            let raw = raw.trim();
            let (list, distro) = if let Some(d) = raw.strip_prefix('+') {
                (&mut include, d)
            } else if let Some(d) = raw.strip_prefix('-') {
                (&mut exclude, d)
            } else if raw.is_empty() {
                return Err(invalid("empty distro tag"));
            } else {
                return Err(invalid(&format!("tag '{raw}' must start with '+' or '-'")));
            };
            if distro.trim().is_empty() {
                return Err(invalid(&format!("tag '{raw}' names no distro")));
            }
            list.push(distro.trim().to_lowercase());
        }

        let filter = match (include.is_empty(), exclude.is_empty()) {
            (true, true) => DistroFilter::Any,
            (false, true) => DistroFilter::Only(include),
            (true, false) => DistroFilter::Except(exclude),
            (false, false) => return Err(invalid("mixes inclusion and exclusion tags")),
        };

        Ok(Self {
            name: name.to_string(),
            kind: RequirementKind::Package { filter },
        })
    }

    /// Whether this requirement is installed through the package manager.
    #[must_use]
    pub const fn is_package(&self) -> bool {
        matches!(self.kind, RequirementKind::Package { .. })
    }
}

/// Load the `[requirements]` table from `requirements.toml`.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed, a value is not a string,
/// or a tag string is malformed.
pub fn load(path: &Path) -> Result<Vec<Requirement>> {
    toml_loader::load_ordered_section(path, "requirements")?
        .into_iter()
        .map(|(name, value)| {
            let tag = value.as_str().ok_or_else(|| ConfigError::InvalidEntry {
                file: toml_loader::file_name(path),
                key: name.clone(),
                message: "expected a tag string".to_string(),
            })?;
            Ok(Requirement::parse(&name, tag)?)
        })
        .collect()
}

/// A plugin whose install path does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPlugin {
    /// Requirement key as written in the table.
    pub name: String,
    /// Tilde-expanded install path.
    pub path: PathBuf,
    /// Shell command that installs it.
    pub command: String,
}

/// Requirements still missing on this host, in table order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Package names to hand to the package manager in one batch.
    pub packages: Vec<String>,
    /// Plugins to install one by one.
    pub plugins: Vec<MissingPlugin>,
}

/// Compute the missing packages and plugins for `distro`.
///
/// A package is missing when its filter admits `distro` and its binary is not
/// on `PATH`; a binary already present always wins over an explicit
/// inclusion tag.  A plugin is missing when its expanded path does not exist.
#[must_use]
pub fn resolve(
    requirements: &[Requirement],
    distro: &str,
    executor: &dyn Executor,
    fs: &dyn FileSystemOps,
    home: &Path,
) -> Resolution {
    let mut resolution = Resolution::default();
    for req in requirements {
        match &req.kind {
            RequirementKind::Package { filter } => {
                if filter.admits(distro) && !executor.which(&req.name) {
                    resolution.packages.push(req.name.clone());
                }
            }
            RequirementKind::Plugin { command } => {
                let path = expand_tilde(&req.name, home);
                if !fs.exists(&path) {
                    resolution.plugins.push(MissingPlugin {
                        name: req.name.clone(),
                        path,
                        command: command.clone(),
                    });
                }
            }
        }
    }
    resolution
}
