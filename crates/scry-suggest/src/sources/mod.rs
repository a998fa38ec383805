//! Independent suggestion providers.
//!
//! Every synchronous source implements [`SuggestionSource`]. Each one ranks its own results
//! by [`PrefixKind`](crate::PrefixKind), then by candidate length, then by a source-specific
//! tiebreak, and truncates to the requested limit.

mod enumeration;
mod filter_key;
mod name;
mod reverse;
mod stored;

use std::collections::HashSet;

use scry_query::{FilterExpr, PartialFilterTerm};

pub use enumeration::EnumeratedValueSource;
pub use filter_key::FilterKeySource;
pub use name::{LookupTicket, NameSource};
pub use reverse::ReverseValueSource;
pub use stored::{StoredFilterSource, StoredKind};

use crate::suggestion::Suggestion;

/// A source that answers immediately from local data.
pub trait SuggestionSource: Send + Sync {
    /// Suggestions for `term`, skipping any candidate in `excluding`, at most `limit` long.
    fn suggestions(
        &self,
        term: &PartialFilterTerm,
        excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion>;
}
