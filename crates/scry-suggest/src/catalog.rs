//! The card-name lookup service boundary.

use std::{fs, future::Future, path::Path};

use parking_lot::Mutex;

use crate::{error::CatalogError, matching::find_ignore_case};

/// A service that completes card names.
pub trait CatalogClient: Send + Sync {
    /// Returns card names matching `fragment`, best first.
    fn autocomplete(&self, fragment: &str) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;
}

/// Most names a [`StaticCatalog`] returns per request.
const MAX_RESULTS: usize = 20;

/// A catalog backed by a fixed list of names.
///
/// Every request is recorded and can be read back with [`StaticCatalog::requests`].
#[derive(Debug, Default)]
pub struct StaticCatalog {
    /// Names in catalog order.
    names: Vec<String>,
    /// Fragments requested so far.
    requests: Mutex<Vec<String>>,
}

impl StaticCatalog {
    /// Creates a catalog over `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Loads names from a file, one per line. Blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::ReadNames {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog has no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fragments requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl CatalogClient for StaticCatalog {
    async fn autocomplete(&self, fragment: &str) -> Result<Vec<String>, CatalogError> {
        self.requests.lock().push(fragment.to_string());

        let mut matches: Vec<(usize, &String)> = self
            .names
            .iter()
            .filter_map(|name| find_ignore_case(name, fragment).map(|range| (range.start, name)))
            .collect();
        // Names starting with the fragment come first.
        matches.sort_by_key(|(start, _)| usize::from(*start != 0));

        Ok(matches
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(_, name)| name.clone())
            .collect())
    }
}
