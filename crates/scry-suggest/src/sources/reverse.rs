//! Operator alternatives for a finished enumerated value.

use std::collections::HashSet;

use scry_query::{FilterExpr, FilterTerm, PartialFilterTerm, Vocabulary};

use super::{SuggestionSource, enumeration::ValueContext};
use crate::suggestion::{PrefixKind, Suggestion, SuggestionKind};

/// Once a key and one of its enumerated values are typed, offers the same pair with each other
/// operator the key accepts, in canonical operator order.
///
/// `r:rare` yields `r=rare`, `r!=rare`, `r<rare` and so on.
#[derive(Debug)]
pub struct ReverseValueSource {
    /// Keys and their value sets.
    vocabulary: &'static Vocabulary,
}

impl Default for ReverseValueSource {
    fn default() -> Self {
        Self::new(Vocabulary::standard())
    }
}

impl ReverseValueSource {
    /// Creates a source over `vocabulary`.
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl SuggestionSource for ReverseValueSource {
    fn suggestions(
        &self,
        term: &PartialFilterTerm,
        excluding: &HashSet<FilterExpr>,
        limit: usize,
    ) -> Vec<Suggestion> {
        let Some(context) = ValueContext::of(term, self.vocabulary) else {
            return Vec::new();
        };
        let Some(FilterTerm::KeyValue { value, .. }) = term.to_complete_autoterminated() else {
            return Vec::new();
        };
        let known = context.descriptor.values.is_some_and(|values| {
            values
                .iter()
                .any(|v| v.eq_ignore_ascii_case(value.as_str()))
        });
        if !known {
            return Vec::new();
        }

        context
            .descriptor
            .operators
            .comparisons()
            .filter(|&comparison| comparison != context.comparison)
            .map(|comparison| FilterExpr::from(context.term(comparison, value.clone())))
            .filter(|expr| !excluding.contains(expr))
            .take(limit)
            .map(|expr| {
                Suggestion::new(
                    SuggestionKind::ReverseEnumeratedValue(expr),
                    None,
                    PrefixKind::None,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use scry_query::Comparison;

    use super::*;

    fn rendered(typed: &str) -> Vec<String> {
        ReverseValueSource::default()
            .suggestions(&PartialFilterTerm::parse(typed), &HashSet::new(), 10)
            .iter()
            .map(Suggestion::rendered)
            .collect()
    }

    #[test]
    fn all_comparison_key_offers_every_other_operator() {
        assert_eq!(
            rendered("r:rare"),
            vec!["r=rare", "r!=rare", "r<rare", "r<=rare", "r>rare", "r>=rare"]
        );
    }

    #[test]
    fn equality_only_key_offers_the_other_equality() {
        assert_eq!(rendered("-f=modern"), vec!["-f:modern"]);
    }

    #[test]
    fn quoted_value_is_accepted_and_rerendered_bare() {
        assert_eq!(rendered("t:\"instant"), vec!["t=instant"]);
    }

    #[test]
    fn requires_a_known_value() {
        assert!(rendered("r:rar").is_empty());
        assert!(rendered("name:bolt").is_empty());
        assert!(rendered("r:").is_empty());
        assert!(rendered("t>instant").is_empty());
    }

    #[test]
    fn excluded_and_limited() {
        let excluding = HashSet::from([FilterExpr::from(FilterTerm::key_value(
            "r",
            Comparison::Equal,
            "rare",
        ))]);
        let results = ReverseValueSource::default().suggestions(
            &PartialFilterTerm::parse("r:rare"),
            &excluding,
            2,
        );
        let rendered: Vec<String> = results.iter().map(Suggestion::rendered).collect();
        assert_eq!(rendered, vec!["r!=rare", "r<rare"]);
    }
}
