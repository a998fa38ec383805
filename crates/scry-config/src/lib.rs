//! Configuration system for scry.
//!
//! scry uses TOML configuration files named `.scry.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.scry.toml` files
//! found, then loading `~/.scry.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawCatalogSettings, RawConfig, RawFilters, RawSuggestSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_path;
use scry_query::{FilterExpr, parse_expression};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for scry.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Suggestion settings.
    pub suggest: SuggestSettings,
    /// Card catalog settings.
    pub catalog: CatalogSettings,
    /// Saved filters.
    pub filters: SavedFilters,
    /// Config files that contributed, highest precedence first.
    pub files: Vec<PathBuf>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.scry.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - A zero suggestion limit
    /// - A missing or unconfigured card names file
    /// - Saved filters that do not parse as a single complete filter
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableConfig {
            suggest: &self.suggest,
            catalog: &self.catalog,
            filters: &self.filters,
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Suggestion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Maximum suggestions per source.
    pub limit: usize,
    /// Quiet period before a card name lookup, in milliseconds.
    pub debounce_ms: u64,
    /// Minimum name fragment length before looking names up.
    pub min_name_length: usize,
    /// Number of history entries kept.
    pub history_size: usize,
}

impl SuggestSettings {
    /// The name lookup debounce as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            debounce_ms: 250,
            min_name_length: 2,
            history_size: 100,
        }
    }
}

/// Card catalog settings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSettings {
    /// Resolved path to the card names file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<PathBuf>,
}

/// Saved filters, as written in configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SavedFilters {
    /// Pinned filters.
    pub pinned: Vec<String>,
    /// Recently used filters, most recent first.
    pub history: Vec<String>,
}

impl SavedFilters {
    /// Pinned filters that parse. Others are reported by [`Config::validate`].
    pub fn pinned_exprs(&self) -> Vec<FilterExpr> {
        parse_all(&self.pinned)
    }

    /// History filters that parse. Others are reported by [`Config::validate`].
    pub fn history_exprs(&self) -> Vec<FilterExpr> {
        parse_all(&self.history)
    }
}

/// Parses every entry, dropping the ones that fail.
fn parse_all(entries: &[String]) -> Vec<FilterExpr> {
    entries
        .iter()
        .filter_map(|entry| parse_expression(entry).ok())
        .collect()
}

/// Borrowed view of the effective configuration for TOML output.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Suggestion settings.
    suggest: &'a SuggestSettings,
    /// Card catalog settings.
    catalog: &'a CatalogSettings,
    /// Saved filters.
    filters: &'a SavedFilters,
}
