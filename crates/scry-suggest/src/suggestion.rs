//! Suggestion values shared by every source.

use std::{fmt, ops::Range};

use scry_query::{Comparison, FilterExpr};
use serde::Serialize;

/// How a candidate lines up with what the user typed.
///
/// Ordered best first, so sorting ascending ranks stronger matches earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixKind {
    /// The typed text is a prefix of the candidate as written.
    Actual,
    /// The typed text is a prefix once leading markers or polarity are set aside.
    Effective,
    /// The typed text appears somewhere else in the candidate.
    None,
}

/// A key completion. Renders with its operator, e.g. `-fo:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCandidate {
    /// Leading `-`, carried over from the term being typed.
    pub negated: bool,
    /// Canonical name or alias.
    pub key: String,
    /// Operator appended after the key.
    pub comparison: Comparison,
}

impl fmt::Display for KeyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("-")?;
        }
        write!(f, "{}{}", self.key, self.comparison)
    }
}

/// Where a suggestion came from, with its candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "candidate", rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A pinned filter.
    Pinned(FilterExpr),
    /// A recently used filter.
    History(FilterExpr),
    /// A filter key with an operator.
    FilterKey(KeyCandidate),
    /// A value from a key's enumerated set.
    EnumeratedValue(FilterExpr),
    /// The typed key and value with a different operator.
    ReverseEnumeratedValue(FilterExpr),
    /// A card name from the catalog.
    Name(FilterExpr),
}

impl SuggestionKind {
    /// Short label naming the source.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pinned(_) => "pinned",
            Self::History(_) => "history",
            Self::FilterKey(_) => "key",
            Self::EnumeratedValue(_) => "value",
            Self::ReverseEnumeratedValue(_) => "operator",
            Self::Name(_) => "name",
        }
    }

    /// The candidate expression, for every kind except key completions.
    pub fn expr(&self) -> Option<&FilterExpr> {
        match self {
            Self::Pinned(expr)
            | Self::History(expr)
            | Self::EnumeratedValue(expr)
            | Self::ReverseEnumeratedValue(expr)
            | Self::Name(expr) => Some(expr),
            Self::FilterKey(_) => None,
        }
    }
}

/// One ranked completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Source and candidate.
    #[serde(flatten)]
    pub kind: SuggestionKind,
    /// Matched span, in characters of [`Suggestion::rendered`].
    pub match_range: Option<Range<usize>>,
    /// How the match lines up with the start of the candidate.
    pub prefix_kind: PrefixKind,
    /// Length of the rendered candidate, in characters.
    pub match_len: usize,
}

impl Suggestion {
    /// Builds a suggestion, measuring the candidate's rendered length.
    pub fn new(kind: SuggestionKind, match_range: Option<Range<usize>>, prefix_kind: PrefixKind) -> Self {
        let match_len = render(&kind).chars().count();
        Self {
            kind,
            match_range,
            prefix_kind,
            match_len,
        }
    }

    /// The candidate's canonical text.
    pub fn rendered(&self) -> String {
        render(&self.kind)
    }
}

/// Renders a candidate.
fn render(kind: &SuggestionKind) -> String {
    match kind {
        SuggestionKind::FilterKey(candidate) => candidate.to_string(),
        other => other.expr().map(ToString::to_string).unwrap_or_default(),
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered())
    }
}
