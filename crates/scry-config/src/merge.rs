//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules and resolving paths.

use std::path::PathBuf;

use crate::{
    CatalogSettings, Config, ConfigError, SavedFilters, SuggestSettings,
    parse::{RawConfig, RawSuggestSettings},
    resolve::resolve_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins
/// - Catalog names file: first definition wins, resolved against its own config file
/// - Filter lists: concatenated, highest precedence first, duplicates dropped
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    Ok(Config {
        suggest: merge_suggest_settings(configs),
        catalog: merge_catalog(configs)?,
        filters: merge_filters(configs),
        files: configs.iter().map(|c| c.path.clone()).collect(),
        config_root: configs
            .first()
            .and_then(|c| c.path.parent())
            .map(PathBuf::from),
    })
}

/// Merges suggestion settings, taking first defined value for each field.
fn merge_suggest_settings(configs: &[ParsedConfig]) -> SuggestSettings {
    let mut result = SuggestSettings::default();

    // Lowest precedence first so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref suggest) = parsed.config.suggest {
            apply_raw_suggest(&mut result, suggest);
        }
    }

    result
}

/// Applies raw suggestion settings to result, overwriting any present values.
fn apply_raw_suggest(result: &mut SuggestSettings, raw: &RawSuggestSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    if let Some(v) = raw.debounce_ms {
        result.debounce_ms = v;
    }
    if let Some(v) = raw.min_name_length {
        result.min_name_length = v;
    }
    if let Some(v) = raw.history_size {
        result.history_size = v;
    }
}

/// Picks the highest-precedence names file and resolves it.
fn merge_catalog(configs: &[ParsedConfig]) -> Result<CatalogSettings, ConfigError> {
    for parsed in configs {
        let Some(names) = parsed
            .config
            .catalog
            .as_ref()
            .and_then(|c| c.names.as_deref())
        else {
            continue;
        };
        let config_dir = parsed.path.parent().unwrap_or(&parsed.path);
        return Ok(CatalogSettings {
            names: Some(resolve_path(names, config_dir)?),
        });
    }
    Ok(CatalogSettings::default())
}

/// Concatenates saved filter lists across configs.
fn merge_filters(configs: &[ParsedConfig]) -> SavedFilters {
    let mut result = SavedFilters::default();

    for filters in configs.iter().filter_map(|p| p.config.filters.as_ref()) {
        extend_unique(&mut result.pinned, filters.pinned.as_deref());
        extend_unique(&mut result.history, filters.history.as_deref());
    }

    result
}

/// Appends entries not already present.
fn extend_unique(list: &mut Vec<String>, entries: Option<&[String]>) {
    for entry in entries.unwrap_or_default() {
        if !list.contains(entry) {
            list.push(entry.clone());
        }
    }
}
