//! Host distribution detection and privilege checks.
use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::error::PlatformError;
use crate::exec::Executor;

/// Platform information for the current system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Lowercase distro key (e.g. `ubuntu`, `arch`, `archarm`).
    pub distro: String,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.distro)
    }
}

impl Platform {
    /// Create a platform for an explicit distro key.
    #[must_use]
    pub fn new(distro: &str) -> Self {
        Self {
            distro: distro.trim().to_lowercase(),
        }
    }

    /// Detect the distro from a `KEY=value` identification file such as
    /// `/etc/os-release`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::DetectionFailed`] if the file cannot be read
    /// or contains no `ID` key.
    pub fn detect(os_release: &Path) -> Result<Self, PlatformError> {
        let content = std::fs::read_to_string(os_release).map_err(|e| {
            PlatformError::DetectionFailed(format!("reading {}: {e}", os_release.display()))
        })?;
        parse_os_release(&content).map_or_else(
            || {
                Err(PlatformError::DetectionFailed(format!(
                    "no ID key in {}",
                    os_release.display()
                )))
            },
            |distro| Ok(Self { distro }),
        )
    }

    /// Use `distro` when given, otherwise detect from `os_release`.
    ///
    /// # Errors
    ///
    /// Returns an error if detection is needed and fails.
    pub fn resolve(distro: Option<&str>, os_release: &Path) -> Result<Self, PlatformError> {
        match distro {
            Some(d) if !d.trim().is_empty() => Ok(Self::new(d)),
            _ => Self::detect(os_release),
        }
    }
}

/// Extract the value of the `ID` key from os-release formatted content.
///
/// Only an exact `ID` key matches, so `ID_LIKE` or `VERSION_ID` are never
/// selected regardless of line order.  Quotes around the value are removed
/// and the result is lowercased.
#[must_use]
pub fn parse_os_release(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "ID")
        .map(|(_, value)| {
            value
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_lowercase()
        })
        .filter(|value| !value.is_empty())
}

/// Return `true` if the current process runs with an effective uid of 0.
///
/// # Errors
///
/// Returns an error if `id -u` cannot be run.
pub fn is_privileged(executor: &dyn Executor) -> Result<bool> {
    let result = executor.run("id", &["-u"])?;
    Ok(result.stdout_text().trim() == "0")
}
