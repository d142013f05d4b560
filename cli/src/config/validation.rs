use std::path::Path;

use crate::platform::Platform;
use crate::resources::package::PackageManager;

use super::dotfiles::DotFile;
use super::requirements::{Requirement, RequirementKind};

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "dotfiles.toml", "requirements.toml").
    pub source: String,
    /// The specific entry that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item` in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.source, self.item, self.message)
    }
}

/// A check over one loaded table.
///
/// Implementations check a loaded table for problems that do not prevent
/// loading but will likely make a run misbehave.
pub trait ConfigValidator {
    /// File name of the table this validator looks at; every warning it
    /// returns names it as the source.
    fn table(&self) -> &'static str;

    /// Warnings for the loaded table, empty when nothing looks off.
    fn validate(&self, root: &Path, platform: &Platform) -> Vec<ValidationWarning>;
}

/// Validator for the dot file table.
#[derive(Debug)]
pub struct DotFileValidator<'a> {
    dotfiles: &'a [DotFile],
}

impl<'a> DotFileValidator<'a> {
    /// Validate `dotfiles`.
    #[must_use]
    pub const fn new(dotfiles: &'a [DotFile]) -> Self {
        Self { dotfiles }
    }
}

impl ConfigValidator for DotFileValidator<'_> {
    fn table(&self) -> &'static str {
        "dotfiles.toml"
    }

    fn validate(&self, root: &Path, _platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for file in self.dotfiles {
            if Path::new(&file.source).is_absolute() {
                warnings.push(ValidationWarning::new(
                    self.table(),
                    &file.source,
                    "tracked file should be relative to the repository root",
                ));
            }

            let source_path = file.source_path(root);
            if !source_path.is_file() {
                warnings.push(ValidationWarning::new(
                    self.table(),
                    &file.source,
                    format!("tracked file does not exist: {}", source_path.display()),
                ));
            }

            if file.targets.is_empty() {
                warnings.push(ValidationWarning::new(
                    self.table(),
                    &file.source,
                    "no target paths",
                ));
            }

            for target in &file.targets {
                if !target.starts_with('~') && !Path::new(target).is_absolute() {
                    warnings.push(ValidationWarning::new(
                        self.table(),
                        &file.source,
                        format!("target '{target}' should be absolute or start with ~"),
                    ));
                }
            }
        }

        warnings
    }
}

/// Validator for the requirement table.
#[derive(Debug)]
pub struct RequirementValidator<'a> {
    requirements: &'a [Requirement],
}

impl<'a> RequirementValidator<'a> {
    /// Validate `requirements`.
    #[must_use]
    pub const fn new(requirements: &'a [Requirement]) -> Self {
        Self { requirements }
    }
}

impl ConfigValidator for RequirementValidator<'_> {
    fn table(&self) -> &'static str {
        "requirements.toml"
    }

    fn validate(&self, _root: &Path, platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for req in self.requirements {
            match &req.kind {
                RequirementKind::Package { filter } => {
                    if req.name.contains(char::is_whitespace) {
                        warnings.push(ValidationWarning::new(
                            self.table(),
                            &req.name,
                            "package name contains whitespace",
                        ));
                    }
                    for distro in filter.distros() {
                        if PackageManager::for_distro(distro).is_none() {
                            warnings.push(ValidationWarning::new(
                                self.table(),
                                &req.name,
                                format!("tag names '{distro}' which has no package manager"),
                            ));
                        }
                    }
                }
                RequirementKind::Plugin { .. } => {
                    if !req.name.starts_with('~') && !Path::new(&req.name).is_absolute() {
                        warnings.push(ValidationWarning::new(
                            self.table(),
                            &req.name,
                            "plugin path should be absolute or start with ~",
                        ));
                    }
                }
            }
        }

        let has_packages = self.requirements.iter().any(Requirement::is_package);
        if has_packages && PackageManager::for_distro(&platform.distro).is_none() {
            warnings.push(ValidationWarning::new(
                self.table(),
                &platform.distro,
                "packages are listed but this distro has no package manager",
            ));
        }

        warnings
    }
}

/// Run every validator, requirements first, and collect their warnings.
#[must_use]
pub fn validate_all(config: &super::Config, platform: &Platform) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator>> = vec![
        Box::new(RequirementValidator::new(&config.requirements)),
        Box::new(DotFileValidator::new(&config.dotfiles)),
    ];

    validators
        .iter()
        .flat_map(|v| v.validate(&config.root, platform))
        .collect()
}
