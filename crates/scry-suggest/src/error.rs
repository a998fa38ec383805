//! Error types for external collaborators.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from a card catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog service could not answer.
    #[error("catalog unavailable: {message}")]
    Unavailable {
        /// What went wrong.
        message: String,
    },

    /// A local names file could not be read.
    #[error("failed to read card names from {path}: {source}")]
    ReadNames {
        /// Path to the names file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl CatalogError {
    /// Creates an [`CatalogError::Unavailable`] error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
