//! Filter key completion.

use std::collections::HashSet;

use scry_query::{
    Comparison, FilterExpr, PartialContent, PartialFilterTerm, PartialText, Vocabulary,
};

use super::SuggestionSource;
use crate::{
    matching::{find_ignore_case, shifted},
    suggestion::{KeyCandidate, PrefixKind, Suggestion, SuggestionKind},
};

/// Suggests `key:` for keys and aliases containing the typed word.
///
/// Only applies while no operator has been typed and the word is neither quoted nor marked
/// with `!`. An exact spelling ranks first; otherwise shorter spellings win, and an alias
/// beats its canonical name when lengths tie.
#[derive(Debug)]
pub struct FilterKeySource {
    /// Keys to complete.
    vocabulary: &'static Vocabulary,
}

impl Default for FilterKeySource {
    fn default() -> Self {
        Self::new(Vocabulary::standard())
    }
}

/// A match before ranking.
struct Candidate {
    /// The suggestion.
    suggestion: Suggestion,
    /// The spelling equals the typed word.
    exact: bool,
    /// The spelling is the canonical name rather than an alias.
    canonical: bool,
    /// Declaration order of the key.
    order: usize,
}

impl FilterKeySource {
    /// Creates a source over `vocabulary`.
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl SuggestionSource for FilterKeySource {
    fn suggestions(
        &self,
        term: &PartialFilterTerm,
        _excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion> {
        let PartialContent::Name {
            literal_match: false,
            text: PartialText::Bare { text: typed },
        } = &term.content
        else {
            return Vec::new();
        };
        if typed.is_empty() {
            return Vec::new();
        }

        let negated = term.polarity.is_negative();
        let offset = usize::from(negated);
        let mut candidates = Vec::new();

        for (order, descriptor) in self.vocabulary.descriptors().iter().enumerate() {
            for spelling in descriptor.spellings() {
                let Some(range) = find_ignore_case(spelling, typed) else {
                    continue;
                };
                let exact = spelling.eq_ignore_ascii_case(typed);
                let prefix = match (range.start, negated) {
                    (0, false) => PrefixKind::Actual,
                    (0, true) => PrefixKind::Effective,
                    _ => PrefixKind::None,
                };
                let candidate = KeyCandidate {
                    negated,
                    key: spelling.to_string(),
                    comparison: Comparison::Including,
                };
                candidates.push(Candidate {
                    suggestion: Suggestion::new(
                        SuggestionKind::FilterKey(candidate),
                        Some(shifted(range, offset)),
                        prefix,
                    ),
                    exact,
                    canonical: spelling == descriptor.name,
                    order,
                });
            }
        }

        candidates.sort_by_key(|c| {
            (
                !c.exact,
                c.suggestion.prefix_kind,
                c.suggestion.match_len,
                c.canonical,
                c.order,
            )
        });
        candidates
            .into_iter()
            .take(limit)
            .map(|c| c.suggestion)
            .collect()
    }
}
