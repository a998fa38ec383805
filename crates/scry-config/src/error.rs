//! Errors raised while loading `.scry.toml` files.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// A configuration file that could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// The unreadable file.
        path: PathBuf,
        /// I/O failure.
        source: io::Error,
    },

    /// The file is not valid TOML, or has unknown or mistyped settings.
    #[error("invalid configuration in {path}: {source}")]
    ParseToml {
        /// The offending file.
        path: PathBuf,
        /// TOML decoding failure, with line and column.
        source: de::Error,
    },

    /// A `~` path was configured but there is no home directory to expand it against.
    #[error("cannot expand '~' without a home directory")]
    NoHomeDirectory,
}
