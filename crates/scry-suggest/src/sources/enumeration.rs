//! Completion of values from a key's enumerated set.

use std::collections::HashSet;

use scry_query::{
    Comparison, FilterExpr, FilterKeyDescriptor, FilterTerm, FilterValue, PartialContent,
    PartialFilterTerm, PartialText, QuoteKind, Vocabulary,
};

use super::SuggestionSource;
use crate::{
    matching::{find_ignore_case, shifted},
    suggestion::{PrefixKind, Suggestion, SuggestionKind},
};

/// The key, operator and value fragment of a term eligible for value completion.
pub struct ValueContext<'t> {
    /// The key's descriptor.
    pub descriptor: &'static FilterKeyDescriptor,
    /// The key as typed, lowercased.
    pub key: &'t str,
    /// A complete operator valid for the key.
    pub comparison: Comparison,
    /// The value so far.
    pub value: &'t PartialText,
    /// Leading `-` on the term.
    pub negated: bool,
}

impl<'t> ValueContext<'t> {
    /// Extracts the context from a term whose key and operator are resolved and accepted.
    pub fn of(term: &'t PartialFilterTerm, vocabulary: &'static Vocabulary) -> Option<Self> {
        let PartialContent::Filter {
            key,
            comparison,
            value,
        } = &term.content
        else {
            return None;
        };
        let descriptor = vocabulary.lookup(key)?;
        let comparison = comparison.complete()?;
        if !descriptor.operators.accepts(comparison) {
            return None;
        }
        Some(Self {
            descriptor,
            key,
            comparison,
            value,
            negated: term.polarity.is_negative(),
        })
    }

    /// Builds a term with this key, operator and polarity.
    pub fn term(&self, comparison: Comparison, value: FilterValue) -> FilterTerm {
        FilterTerm::KeyValue {
            negated: self.negated,
            key: self.key.to_string(),
            comparison,
            value,
        }
    }
}

/// Character offset of `value`'s text within a rendered `key<op>value` candidate.
fn value_start(rendered: &str, value: &str) -> usize {
    let quoted = FilterValue::text(value).to_string();
    rendered.chars().count() - quoted.chars().count() + usize::from(quoted != value)
}

/// Suggests values from the key's enumerated set that contain the typed fragment.
///
/// Nothing is offered for keys without a set, for an operator the key does not accept, or
/// for a regex value. An empty fragment lists the whole set alphabetically.
#[derive(Debug)]
pub struct EnumeratedValueSource {
    /// Keys and their value sets.
    vocabulary: &'static Vocabulary,
}

impl Default for EnumeratedValueSource {
    fn default() -> Self {
        Self::new(Vocabulary::standard())
    }
}

impl EnumeratedValueSource {
    /// Creates a source over `vocabulary`.
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl SuggestionSource for EnumeratedValueSource {
    fn suggestions(
        &self,
        term: &PartialFilterTerm,
        excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion> {
        let Some(context) = ValueContext::of(term, self.vocabulary) else {
            return Vec::new();
        };
        let Some(values) = context.descriptor.values else {
            return Vec::new();
        };
        if matches!(
            context.value,
            PartialText::Balanced { quote: QuoteKind::Regex, .. }
                | PartialText::Unterminated { quote: QuoteKind::Regex, .. }
        ) {
            return Vec::new();
        }

        let fragment = context.value.text();
        let mut candidates: Vec<(Suggestion, &str)> = values
            .iter()
            .filter_map(|&value| {
                let expr: FilterExpr = context
                    .term(context.comparison, FilterValue::text(value))
                    .into();
                if excluding.contains(&expr) {
                    return None;
                }
                if fragment.is_empty() {
                    let kind = SuggestionKind::EnumeratedValue(expr);
                    return Some((Suggestion::new(kind, None, PrefixKind::None), value));
                }

                let range = find_ignore_case(value, fragment)?;
                let prefix = match (range.start, context.negated) {
                    (0, false) => PrefixKind::Actual,
                    (0, true) => PrefixKind::Effective,
                    _ => PrefixKind::None,
                };
                let range = shifted(range, value_start(&expr.to_string(), value));
                let kind = SuggestionKind::EnumeratedValue(expr);
                Some((Suggestion::new(kind, Some(range), prefix), value))
            })
            .collect();

        if fragment.is_empty() {
            candidates.sort_by_key(|(_, value)| *value);
        } else {
            candidates.sort_by(|(a, a_value), (b, b_value)| {
                (a.prefix_kind, a.match_len)
                    .cmp(&(b.prefix_kind, b.match_len))
                    .then_with(|| a_value.cmp(b_value))
            });
        }
        candidates
            .into_iter()
            .take(limit)
            .map(|(suggestion, _)| suggestion)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(typed: &str) -> Vec<Suggestion> {
        EnumeratedValueSource::default().suggestions(&PartialFilterTerm::parse(typed), &HashSet::new(), 50)
    }

    fn rendered(results: &[Suggestion]) -> Vec<String> {
        results.iter().map(Suggestion::rendered).collect()
    }

    #[test]
    fn prefix_matches_shorter_first() {
        let results = values("is:scry");
        assert_eq!(rendered(&results), vec!["is:scryland", "is:scryfallpreview"]);
        assert!(results.iter().all(|s| s.prefix_kind == PrefixKind::Actual));
        assert_eq!(results[0].match_range, Some(3..7));
    }

    #[test]
    fn negated_term_yields_effective_prefixes() {
        let results = values("-is:scry");
        assert_eq!(rendered(&results), vec!["-is:scryland", "-is:scryfallpreview"]);
        assert!(results.iter().all(|s| s.prefix_kind == PrefixKind::Effective));
        assert_eq!(results[0].match_range, Some(4..8));
    }

    #[test]
    fn substring_matches_rank_after_prefixes() {
        let results = rendered(&values("f:modern"));
        assert_eq!(results[0], "f:modern");
        assert!(results.contains(&"f:premodern".to_string()));
    }

    #[test]
    fn empty_fragment_lists_whole_set_alphabetically() {
        let results = values("r:");
        assert_eq!(
            rendered(&results),
            vec!["r:bonus", "r:common", "r:mythic", "r:rare", "r:special", "r:uncommon"]
        );
        assert!(results.iter().all(|s| s.prefix_kind == PrefixKind::None && s.match_range.is_none()));
    }

    #[test]
    fn case_insensitive_and_keeps_operator() {
        let results = rendered(&values("R>=MYTH"));
        assert_eq!(results, vec!["r>=mythic"]);
    }

    #[test]
    fn quoted_fragment_is_matched_inside_the_quotes() {
        let results = rendered(&values("t:\"inst"));
        assert_eq!(results, vec!["t:instant"]);
    }

    #[test]
    fn suppressed_cases() {
        assert!(values("name:bolt").is_empty());
        assert!(values("t>inst").is_empty());
        assert!(values("t!").is_empty());
        assert!(values("o:/dra").is_empty());
        assert!(values("is:/scry/").is_empty());
        assert!(values("scry").is_empty());
    }

    #[test]
    fn excluded_values_are_skipped() {
        let excluding = HashSet::from([FilterExpr::from(FilterTerm::key_value(
            "r",
            Comparison::Including,
            "rare",
        ))]);
        let results = EnumeratedValueSource::default().suggestions(
            &PartialFilterTerm::parse("r:ra"),
            &excluding,
            10,
        );
        assert!(results.is_empty());
    }
}
