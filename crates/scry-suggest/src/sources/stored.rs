//! Pinned and history suggestions.

use std::{collections::HashSet, sync::Arc};

use scry_query::{FilterExpr, PartialFilterTerm};

use super::SuggestionSource;
use crate::{
    matching::{classify, find_ignore_case, shifted},
    store::FilterStore,
    suggestion::{PrefixKind, Suggestion, SuggestionKind},
};

/// Which list a [`StoredFilterSource`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredKind {
    /// Filters the user pinned.
    Pinned,
    /// Filters the user recently applied.
    History,
}

impl StoredKind {
    /// Wraps a candidate in the matching suggestion kind.
    fn wrap(self, expr: FilterExpr) -> SuggestionKind {
        match self {
            Self::Pinned => SuggestionKind::Pinned(expr),
            Self::History => SuggestionKind::History(expr),
        }
    }
}

/// Suggests saved filters whose rendering contains the typed text.
///
/// A negative term that finds nothing as typed is retried without its `-` against positive
/// entries, offering them negated.
pub struct StoredFilterSource {
    /// Pinned or history.
    kind: StoredKind,
    /// Backing store.
    store: Arc<dyn FilterStore>,
}

/// A match before ranking.
struct Candidate {
    /// The suggestion.
    suggestion: Suggestion,
    /// Position in the store, most recent first.
    recency: usize,
}

impl StoredFilterSource {
    /// Creates a source over `store`.
    pub fn new(kind: StoredKind, store: Arc<dyn FilterStore>) -> Self {
        Self { kind, store }
    }

    /// Matches one stored entry against the typed text.
    fn match_entry(&self, expr: FilterExpr, typed: &str) -> Option<Suggestion> {
        let rendered = expr.to_string();
        if let Some(range) = find_ignore_case(&rendered, typed) {
            let prefix = classify(&rendered, &range);
            return Some(Suggestion::new(self.kind.wrap(expr), Some(range), prefix));
        }

        // "-is:fo" can still mean a stored "is:foil", negated.
        let positive = typed.strip_prefix('-').filter(|rest| !rest.is_empty())?;
        if expr.is_negated() {
            return None;
        }
        let range = find_ignore_case(&rendered, positive)?;
        let (range, prefix) = if range.start == 0 {
            (0..range.end + 1, PrefixKind::Effective)
        } else {
            (shifted(range, 1), PrefixKind::None)
        };
        Some(Suggestion::new(
            self.kind.wrap(expr.with_negation(true)),
            Some(range),
            prefix,
        ))
    }
}

impl SuggestionSource for StoredFilterSource {
    fn suggestions(
        &self,
        term: &PartialFilterTerm,
        excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion> {
        let typed = term.raw();
        let entries = self.store.entries();

        if typed.is_empty() {
            return entries
                .into_iter()
                .filter(|expr| !excluding.contains(expr))
                .take(limit)
                .map(|expr| Suggestion::new(self.kind.wrap(expr), None, PrefixKind::None))
                .collect();
        }

        let mut candidates: Vec<Candidate> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(recency, expr)| {
                let suggestion = self.match_entry(expr, typed)?;
                let excluded = suggestion.kind.expr().is_some_and(|e| excluding.contains(e));
                (!excluded).then_some(Candidate { suggestion, recency })
            })
            .collect();

        candidates.sort_by_key(|c| (c.suggestion.prefix_kind, c.suggestion.match_len, c.recency));
        candidates
            .into_iter()
            .take(limit)
            .map(|c| c.suggestion)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use scry_query::{Comparison, FilterTerm};

    use super::*;
    use crate::store::MemoryStore;

    fn kv(key: &str, value: &str) -> FilterExpr {
        FilterTerm::key_value(key, Comparison::Including, value).into()
    }

    fn source(entries: Vec<FilterExpr>) -> StoredFilterSource {
        StoredFilterSource::new(
            StoredKind::History,
            Arc::new(MemoryStore::new().with_entries(entries)),
        )
    }

    fn rendered(results: &[Suggestion]) -> Vec<String> {
        results.iter().map(Suggestion::rendered).collect()
    }

    #[test]
    fn empty_input_lists_entries_by_recency() {
        let source = source(vec![kv("t", "instant"), kv("c", "red"), kv("f", "modern")]);
        let results = source.suggestions(&PartialFilterTerm::parse(""), &HashSet::new(), 2);
        assert_eq!(rendered(&results), vec!["t:instant", "c:red"]);
        assert!(results.iter().all(|s| s.prefix_kind == PrefixKind::None));
    }

    #[test]
    fn prefix_beats_substring_then_length_then_recency() {
        let source = source(vec![
            kv("o", "red"),
            kv("c", "redgreen"),
            kv("c", "red"),
            kv("c", "rex"),
        ]);
        let results = source.suggestions(&PartialFilterTerm::parse("c:re"), &HashSet::new(), 10);
        assert_eq!(rendered(&results), vec!["c:red", "c:rex", "c:redgreen"]);
        assert_eq!(results[0].match_range, Some(0..4));
        assert_eq!(results[0].prefix_kind, PrefixKind::Actual);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let source = source(vec![kv("name", "Lightning Bolt")]);
        let results = source.suggestions(&PartialFilterTerm::parse("BOLT"), &HashSet::new(), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].prefix_kind, PrefixKind::None);
        assert_eq!(results[0].match_range, Some(16..20));
    }

    #[test]
    fn negative_input_matches_positive_entry() {
        let source = source(vec![kv("is", "foil")]);
        let results = source.suggestions(&PartialFilterTerm::parse("-is:fo"), &HashSet::new(), 10);
        assert_eq!(rendered(&results), vec!["-is:foil"]);
        assert_eq!(results[0].prefix_kind, PrefixKind::Effective);
        assert_eq!(results[0].match_range, Some(0..6));
    }

    #[test]
    fn positive_input_matches_inside_negative_entry() {
        let entry: FilterExpr = FilterTerm::key_value("is", Comparison::Including, "foil")
            .with_negation(true)
            .into();
        let source = source(vec![entry]);
        let results = source.suggestions(&PartialFilterTerm::parse("is:f"), &HashSet::new(), 10);
        assert_eq!(rendered(&results), vec!["-is:foil"]);
        assert_eq!(results[0].prefix_kind, PrefixKind::Effective);
    }

    #[test]
    fn excluded_entries_are_skipped() {
        let source = source(vec![kv("c", "red"), kv("c", "blue")]);
        let excluding = HashSet::from([kv("c", "red")]);
        let results = source.suggestions(&PartialFilterTerm::parse("c:"), &excluding, 10);
        assert_eq!(rendered(&results), vec!["c:blue"]);

        let empty = source.suggestions(&PartialFilterTerm::parse(""), &excluding, 10);
        assert_eq!(rendered(&empty), vec!["c:blue"]);
    }

    #[test]
    fn pinned_kind_is_reported() {
        let source = StoredFilterSource::new(
            StoredKind::Pinned,
            Arc::new(MemoryStore::new().with_entries([kv("f", "modern")])),
        );
        let results = source.suggestions(&PartialFilterTerm::parse("f:"), &HashSet::new(), 10);
        assert!(matches!(results[0].kind, SuggestionKind::Pinned(_)));
    }
}
