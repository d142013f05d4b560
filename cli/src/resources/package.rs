//! Batched package installation through the distro's package manager.
use anyhow::Result;

use super::{Applicable, ResourceChange};
use crate::error::{PlatformError, ResourceError};
use crate::exec::{self, Executor};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Arch Linux and Arch Linux ARM.
    Pacman,
    /// Alpine Linux.
    Apk,
    /// Fedora.
    Dnf,
    /// Termux.
    Pkg,
    /// Debian and Ubuntu.
    Apt,
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pacman => write!(f, "pacman"),
            Self::Apk => write!(f, "apk"),
            Self::Dnf => write!(f, "dnf"),
            Self::Pkg => write!(f, "pkg"),
            Self::Apt => write!(f, "apt"),
        }
    }
}

impl PackageManager {
    /// Package manager for a distro key, if the distro is supported.
    #[must_use]
    pub fn for_distro(distro: &str) -> Option<Self> {
        match distro {
            "arch" | "archarm" => Some(Self::Pacman),
            "alpine" => Some(Self::Apk),
            "fedora" => Some(Self::Dnf),
            "termux" => Some(Self::Pkg),
            "ubuntu" | "debian" => Some(Self::Apt),
            _ => None,
        }
    }

    /// Like [`for_distro`](Self::for_distro) but failing for unknown distros.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when no manager is mapped.
    pub fn require(distro: &str) -> Result<Self, PlatformError> {
        Self::for_distro(distro).ok_or_else(|| PlatformError::Unsupported {
            distro: distro.to_string(),
        })
    }

    /// Shell fragment that refreshes indexes (where needed) and installs the
    /// packages appended to it.
    #[must_use]
    pub const fn base_command(self) -> &'static str {
        match self {
            Self::Pacman => "pacman -Sy --noconfirm",
            Self::Apk => "apk update && apk add",
            Self::Dnf => "dnf install -y",
            Self::Pkg => "pkg install -y",
            Self::Apt => "apt update && apt install -y",
        }
    }
}

/// Every missing package, installed with one package-manager invocation.
#[derive(Debug)]
pub struct PackageBatch<'a> {
    /// Package manager for the host distro.
    pub manager: PackageManager,
    /// Package names in table order.
    pub names: Vec<String>,
    executor: &'a dyn Executor,
}

impl<'a> PackageBatch<'a> {
    /// Create a batch install for `names`.
    #[must_use]
    pub const fn new(
        manager: PackageManager,
        names: Vec<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            manager,
            names,
            executor,
        }
    }

    /// The full shell command line, e.g. `apt update && apt install -y git zsh`.
    #[must_use]
    pub fn command_line(&self) -> String {
        format!("{} {}", self.manager.base_command(), self.names.join(" "))
    }
}

impl Applicable for PackageBatch<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.names.join(" "), self.manager)
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.names.is_empty() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        let result = exec::run_shell(self.executor, &self.command_line())?;
        if !result.success {
            return Err(ResourceError::PackageInstall {
                packages: self.names.join(" "),
                code: result.code,
            }
            .into());
        }
        Ok(ResourceChange::Applied)
    }
}
