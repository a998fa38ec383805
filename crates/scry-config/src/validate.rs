//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use scry_query::parse_expression;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A saved filter is not a single complete filter.
    InvalidFilter {
        /// Which list it came from: `pinned` or `history`.
        list: &'static str,
        /// The filter text.
        filter: String,
        /// Why it does not parse.
        message: String,
    },
    /// The configured names file does not exist.
    NamesFileMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// No names file is configured, so name suggestions are disabled.
    NoCatalog,
    /// The suggestion limit is zero, so nothing would ever be suggested.
    ZeroLimit,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter {
                list,
                filter,
                message,
            } => write!(f, "{list} filter '{filter}' is ignored: {message}"),
            Self::NamesFileMissing { path } => {
                write!(f, "card names file does not exist: {path}")
            }
            Self::NoCatalog => write!(
                f,
                "no card names file configured; name suggestions are disabled"
            ),
            Self::ZeroLimit => write!(f, "suggest.limit is 0; no suggestions will be shown"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.suggest.limit == 0 {
        warnings.push(ConfigWarning::ZeroLimit);
    }

    match &config.catalog.names {
        None => warnings.push(ConfigWarning::NoCatalog),
        Some(path) if !path.is_file() => warnings.push(ConfigWarning::NamesFileMissing {
            path: path.display().to_string(),
        }),
        Some(_) => {}
    }

    for (list, entries) in [
        ("pinned", &config.filters.pinned),
        ("history", &config.filters.history),
    ] {
        for filter in entries {
            if let Err(err) = parse_expression(filter) {
                warnings.push(ConfigWarning::InvalidFilter {
                    list,
                    filter: filter.clone(),
                    message: err.message().to_string(),
                });
            }
        }
    }

    warnings
}
