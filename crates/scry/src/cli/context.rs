//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use scry_config::Config;
use scry_suggest::{MemoryStore, NameSource, StaticCatalog, SuggestionProvider};
use tracing::{debug, warn};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for commands like `init` that should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds a suggestion provider from the configured filters and card names.
    ///
    /// A names file that cannot be read leaves name suggestions empty rather than failing.
    pub fn provider(&self) -> SuggestionProvider<StaticCatalog> {
        let settings = &self.config.suggest;
        let catalog = match &self.config.catalog.names {
            Some(path) => StaticCatalog::load(path).unwrap_or_else(|err| {
                warn!(error = %err, "card names unavailable");
                StaticCatalog::default()
            }),
            None => StaticCatalog::default(),
        };
        debug!(names = catalog.len(), "catalog loaded");

        let pinned = MemoryStore::new().with_entries(self.config.filters.pinned_exprs());
        let history = MemoryStore::with_capacity(settings.history_size)
            .with_entries(self.config.filters.history_exprs());

        SuggestionProvider::new(
            Arc::new(pinned),
            Arc::new(history),
            NameSource::new(
                Arc::new(catalog),
                settings.debounce(),
                settings.min_name_length,
            ),
        )
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
