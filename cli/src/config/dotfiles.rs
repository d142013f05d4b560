//! Dot file table: tracked files and the target paths they are mirrored to.
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use super::toml_loader;
use crate::error::ConfigError;
use crate::resources::helpers::fs::expand_tilde;

/// Suffix appended to a tracked file name to form its patch artifact.
pub const PATCH_SUFFIX: &str = ".patch";

/// Target list as written in TOML: a single path or an array of paths.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Targets {
    One(String),
    Many(Vec<String>),
}

impl From<Targets> for Vec<String> {
    fn from(targets: Targets) -> Self {
        match targets {
            Targets::One(t) => vec![t],
            Targets::Many(v) => v,
        }
    }
}

/// A tracked file and the targets it must be mirrored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotFile {
    /// File name relative to the repository root.
    pub source: String,
    /// Target paths as written (may start with `~`).
    pub targets: Vec<String>,
}

impl DotFile {
    /// Name of the patch artifact for this file, relative to the repository root.
    #[must_use]
    pub fn patch_name(&self) -> String {
        format!("{}{PATCH_SUFFIX}", self.source)
    }

    /// Absolute path of the tracked file.
    #[must_use]
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(&self.source)
    }

    /// Absolute path of the patch artifact.
    #[must_use]
    pub fn patch_path(&self, root: &Path) -> PathBuf {
        root.join(self.patch_name())
    }

    /// Targets with `~` expanded against `home`.
    pub fn target_paths<'a>(&'a self, home: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        self.targets.iter().map(move |t| expand_tilde(t, home))
    }
}

/// Load the `[dotfiles]` table from `dotfiles.toml`.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or a value is neither a
/// string nor an array of strings.
pub fn load(path: &Path) -> Result<Vec<DotFile>> {
    toml_loader::load_ordered_section(path, "dotfiles")?
        .into_iter()
        .map(|(source, value)| {
            let targets: Targets = value.try_into().map_err(|e| ConfigError::InvalidEntry {
                file: toml_loader::file_name(path),
                key: source.clone(),
                message: format!("expected a path or a list of paths: {e}"),
            })?;
            Ok(DotFile {
                source,
                targets: targets.into(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::write_temp_toml;

    #[test]
    fn load_list_and_single_targets() {
        let (_dir, path) = write_temp_toml(
            "[dotfiles]\n\".zshrc\" = [\"~/.zshrc\", \"~/.config/zsh/.zshrc\"]\n\".gitconfig\" = \"~/.gitconfig\"\n",
        );
        let files = load(&path).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].source, ".zshrc");
        assert_eq!(files[0].targets, vec!["~/.zshrc", "~/.config/zsh/.zshrc"]);
        assert_eq!(files[1].source, ".gitconfig");
        assert_eq!(files[1].targets, vec!["~/.gitconfig"]);
    }

    #[test]
    fn load_rejects_non_path_value() {
        let (_dir, path) = write_temp_toml("[dotfiles]\n\".zshrc\" = 42\n");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains(".zshrc"), "{err}");
    }

    #[test]
    fn patch_name_appends_suffix() {
        let file = DotFile {
            source: ".zshrc".to_string(),
            targets: vec![],
        };
        assert_eq!(file.patch_name(), ".zshrc.patch");
        assert_eq!(
            file.patch_path(Path::new("/repo")),
            PathBuf::from("/repo/.zshrc.patch")
        );
    }

    #[test]
    fn target_paths_expand_home() {
        let file = DotFile {
            source: ".vimrc".to_string(),
            targets: vec!["~/.vimrc".to_string(), "/etc/vimrc".to_string()],
        };
        let paths: Vec<PathBuf> = file.target_paths(Path::new("/home/u")).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/home/u/.vimrc"), PathBuf::from("/etc/vimrc")]
        );
    }
}
