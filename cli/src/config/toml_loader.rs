//! TOML configuration file parsing with order-preserving tables.
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load and deserialize a TOML config file.
///
/// A missing file deserializes from empty TOML, so every field must carry a
/// `#[serde(default)]` for the file to be optional.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return toml::from_str("").context("Failed to create empty config");
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

/// Load the top-level table named `section` from `path` as ordered
/// `(key, value)` pairs.
///
/// Key order follows the file, which in turn drives processing and display
/// order.  A missing file or missing section yields an empty list.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// `section` is present but is not a table.
pub fn load_ordered_section(path: &Path, section: &str) -> Result<Vec<(String, toml::Value)>> {
    let mut root: toml::Table = load_config(path)?;
    match root.remove(section) {
        None => Ok(Vec::new()),
        Some(toml::Value::Table(table)) => Ok(table.into_iter().collect()),
        Some(_) => Err(ConfigError::InvalidEntry {
            file: file_name(path),
            key: section.to_string(),
            message: "expected a table".to_string(),
        }
        .into()),
    }
}

/// File name of `path` for error messages.
pub(super) fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().to_string(),
    )
}
