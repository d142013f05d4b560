//! Typed failures, one enum per layer.
//!
//! Lower layers return these; commands see them through [`anyhow::Error`]
//! and may `downcast_ref` when the kind matters (for instance a declined
//! capture or a failed task).
//!
//! | enum | raised by |
//! |------|-----------|
//! | [`ConfigError`] | table parsing, requirement tag grammar |
//! | [`PlatformError`] | distro detection, package manager lookup |
//! | [`ResourceError`] | package batch, tracked file lookup, unwritable target |
//! | [`TaskError`] | task failure, operator declining a capture |

use thiserror::Error;

/// Something wrong in `conf/requirements.toml` or `conf/dotfiles.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A requirement tag string does not follow `bin[;+a,+b|-a,-b]`.
    #[error("Invalid requirement '{name}': {reason}")]
    InvalidRequirement {
        /// Requirement key (tool name or path).
        name: String,
        /// What is wrong with the tag string.
        reason: String,
    },

    /// A table value has the wrong type.
    #[error("Invalid entry '{key}' in {file}: {message}")]
    InvalidEntry {
        /// Table file name.
        file: String,
        /// Offending key.
        key: String,
        /// Human-readable description.
        message: String,
    },

    /// A table could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Reasons the run ends early.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A task returned an error; later tasks were not run.
    #[error("Task '{task}' failed: {reason}")]
    ExecutionFailed {
        /// Name of the task that failed.
        task: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The operator declined to capture local edits as patches.
    #[error("local changes to {files} were not captured; please commit your changes")]
    CaptureDeclined {
        /// Comma-separated tracked files with local edits.
        files: String,
    },
}

/// Failures applying a resource.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The package manager exited non-zero.
    #[error("failed to install packages, please install manually: {packages}")]
    PackageInstall {
        /// Space-joined package names.
        packages: String,
        /// Exit code reported by the shell, if any.
        code: Option<i32>,
    },

    /// A tracked dot file does not exist in the repository.
    #[error("Tracked file not found: {0}")]
    NotFound(String),

    /// A dot file target cannot hold the canonical content.
    #[error("cannot write {target}: {reason}")]
    InvalidTarget {
        /// Expanded target path.
        target: String,
        /// Why the target cannot be written, e.g. it is a directory.
        reason: String,
    },
}

/// Failures working out which system this is.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No package manager is known for the detected distro.
    #[error("No package manager known for distro '{distro}'")]
    Unsupported {
        /// Detected distro key.
        distro: String,
    },

    /// Distro detection failed (missing file or missing `ID` key).
    #[error("Platform detection failed: {0}")]
    DetectionFailed(String),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_invalid_requirement_display() {
        let e = ConfigError::InvalidRequirement {
            name: "btop".to_string(),
            reason: "mixes inclusion and exclusion tags".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid requirement 'btop': mixes inclusion and exclusion tags"
        );
    }

    #[test]
    fn config_error_invalid_entry_display() {
        let e = ConfigError::InvalidEntry {
            file: "dotfiles.toml".to_string(),
            key: ".zshrc".to_string(),
            message: "expected a list of paths".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid entry '.zshrc' in dotfiles.toml: expected a list of paths"
        );
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: "/conf/requirements.toml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("/conf/requirements.toml"));
        assert!(e.source().is_some());
    }

    #[test]
    fn task_error_capture_declined_display() {
        let e = TaskError::CaptureDeclined {
            files: ".zshrc, .gitconfig".to_string(),
        };
        assert!(e.to_string().contains(".zshrc, .gitconfig"));
        assert!(e.to_string().contains("please commit your changes"));
    }

    #[test]
    fn resource_error_package_install_display() {
        let e = ResourceError::PackageInstall {
            packages: "git zsh".to_string(),
            code: Some(100),
        };
        assert_eq!(
            e.to_string(),
            "failed to install packages, please install manually: git zsh"
        );
    }

    #[test]
    fn platform_error_unsupported_display() {
        let e = PlatformError::Unsupported {
            distro: "gentoo".to_string(),
        };
        assert_eq!(e.to_string(), "No package manager known for distro 'gentoo'");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<TaskError>();
        assert_send_sync::<ResourceError>();
        assert_send_sync::<PlatformError>();
    }

    #[test]
    fn invalid_target_display_names_the_path() {
        let e = ResourceError::InvalidTarget {
            target: "/home/u/.zshrc".to_string(),
            reason: "target is a directory".to_string(),
        };
        assert_eq!(e.to_string(), "cannot write /home/u/.zshrc: target is a directory");
    }

    #[test]
    fn task_error_converts_to_anyhow() {
        let e = TaskError::ExecutionFailed {
            task: "Install packages".to_string(),
            reason: "apt exited with code 100".to_string(),
        };
        let anyhow_err: anyhow::Error = e.into();
        assert!(anyhow_err.downcast_ref::<TaskError>().is_some());
    }
}
