//! Ranked autocomplete for scry filter queries.
//!
//! Several independent sources look at the term being typed and propose complete filters:
//!
//! - **Pinned** and **history**: saved filters containing the typed text
//! - **Filter keys**: `fo` → `fo:`, `format:`
//! - **Enumerated values**: `r:my` → `r:mythic`
//! - **Operators**: `r:rare` → `r=rare`, `r>=rare`, ...
//! - **Names**: debounced lookups against a [`CatalogClient`]
//!
//! [`SuggestionProvider`] merges them into a [`SuggestionStream`] of snapshots. The
//! synchronous sources answer at once; card names follow in a later snapshot.
//!
//! # Example
//!
//! ```
//! use std::{collections::HashSet, sync::Arc, time::Duration};
//!
//! use futures_util::StreamExt;
//! use scry_suggest::{MemoryStore, NameSource, StaticCatalog, SuggestionProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = Arc::new(StaticCatalog::new(["Lightning Bolt"]));
//! let provider = SuggestionProvider::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryStore::new()),
//!     NameSource::new(catalog, Duration::from_millis(10), 2),
//! );
//!
//! let mut stream = provider.suggestions("fo", &HashSet::new(), 5);
//! let first = stream.next().await.unwrap();
//! assert_eq!(first[0].rendered(), "fo:");
//! # }
//! ```

#![warn(missing_docs)]

mod catalog;
mod error;
mod matching;
mod provider;
mod sources;
mod store;
mod suggestion;
mod task;

pub use catalog::{CatalogClient, StaticCatalog};
pub use error::CatalogError;
pub use matching::find_ignore_case;
pub use provider::{SuggestionProvider, SuggestionStream};
pub use sources::{
    EnumeratedValueSource, FilterKeySource, LookupTicket, NameSource, ReverseValueSource,
    StoredFilterSource, StoredKind, SuggestionSource,
};
pub use store::{FilterStore, MemoryStore};
pub use suggestion::{KeyCandidate, PrefixKind, Suggestion, SuggestionKind};
