//! Path resolution for files named in configuration.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path to an absolute path.
///
/// Handles three cases:
/// - Tilde paths (`~/cards.txt`) - expanded to home directory
/// - Relative paths (`cards.txt`, `../shared/cards.txt`) - resolved relative to `config_dir`
/// - Absolute paths - returned as-is
///
/// The path is not required to exist; validation reports missing files.
pub fn resolve_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
