//! Configuration file parsing.
//!
//! Parses individual `.scry.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Suggestion settings section.
    pub suggest: Option<RawSuggestSettings>,
    /// Card catalog section.
    pub catalog: Option<RawCatalogSettings>,
    /// Saved filter lists.
    pub filters: Option<RawFilters>,
}

/// Raw suggestion settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSuggestSettings {
    /// Maximum suggestions per source.
    pub limit: Option<usize>,
    /// Quiet period before a card name lookup, in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Minimum name fragment length before looking names up.
    pub min_name_length: Option<usize>,
    /// Number of history entries kept.
    pub history_size: Option<usize>,
}

/// Raw catalog settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawCatalogSettings {
    /// Newline-separated card names file, relative to the config file.
    pub names: Option<String>,
}

/// Raw saved filters.
///
/// Each list accepts either a single string or an array of strings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawFilters {
    /// Pinned filters.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub pinned: Option<Vec<String>>,
    /// Recently used filters, most recent first.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub history: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
