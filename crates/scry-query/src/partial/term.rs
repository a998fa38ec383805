//! The in-progress term model.
//!
//! A [`PartialFilterTerm`] records how far the user has got with one term: polarity, whether a
//! key and operator have been typed, and whether the value's quotes are still open. It can be
//! promoted to a complete [`FilterTerm`] once nothing is left dangling.

use serde::Serialize;

use crate::{
    partial::lexer::{PartialTokenKind, tokenize_tolerant},
    term::{Comparison, FilterTerm, FilterValue, QuoteKind, is_word_char},
    vocabulary::Vocabulary,
};

/// Whether a term carries a leading `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// No leading `-`.
    Positive,
    /// Leading `-`.
    Negative,
}

impl Polarity {
    /// Whether this is [`Polarity::Negative`].
    pub fn is_negative(self) -> bool {
        self == Self::Negative
    }
}

/// Text of a name or value, with its quoting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PartialText {
    /// Unquoted text.
    Bare {
        /// The text as typed.
        text: String,
    },
    /// A quoted or regex span whose closing delimiter is the last character.
    Balanced {
        /// Delimiter kind.
        quote: QuoteKind,
        /// Text between the delimiters.
        text: String,
    },
    /// A quoted or regex span with no closing delimiter yet.
    Unterminated {
        /// Delimiter kind.
        quote: QuoteKind,
        /// Text after the opening delimiter.
        text: String,
    },
}

impl PartialText {
    /// Classifies the quoting state of `text`.
    pub fn classify(text: &str) -> Self {
        let Some(quote) = text.chars().next().and_then(QuoteKind::from_char) else {
            return Self::Bare { text: text.into() };
        };

        let body = &text[1..];
        match body.find(quote.delimiter()) {
            None => Self::Unterminated {
                quote,
                text: body.into(),
            },
            Some(close) if close + 1 == body.len() => Self::Balanced {
                quote,
                text: body[..close].into(),
            },
            Some(_) => Self::Bare { text: text.into() },
        }
    }

    /// The text without delimiters.
    pub fn text(&self) -> &str {
        match self {
            Self::Bare { text } | Self::Balanced { text, .. } | Self::Unterminated { text, .. } => {
                text
            }
        }
    }

    /// Whether this is bare text.
    pub fn is_bare(&self) -> bool {
        matches!(self, Self::Bare { .. })
    }

    /// Whether this is an empty bare text (nothing typed yet).
    fn is_empty_bare(&self) -> bool {
        matches!(self, Self::Bare { text } if text.is_empty())
    }

    /// Converts to a complete value, closing an open span when `autoterminate` is set.
    ///
    /// An open span with nothing typed after the delimiter has no value yet.
    fn to_value(&self, autoterminate: bool) -> Option<FilterValue> {
        let (quote, text) = match self {
            Self::Bare { text } if text.is_empty() => return None,
            Self::Bare { text } => return Some(FilterValue::Text(text.clone())),
            Self::Unterminated { .. } if !autoterminate => return None,
            Self::Unterminated { text, .. } if text.is_empty() => return None,
            Self::Balanced { quote, text } | Self::Unterminated { quote, text } => (quote, text),
        };
        Some(match quote {
            QuoteKind::Regex => FilterValue::Regex(text.clone()),
            QuoteKind::Double | QuoteKind::Single => FilterValue::Text(text.clone()),
        })
    }
}

/// An operator that has been started but not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteComparison {
    /// A lone `!` that may still become `!=`.
    Bang,
}

/// The operator part of a filter term being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "comparison", rename_all = "snake_case")]
pub enum PartialComparison {
    /// A full operator.
    Complete(Comparison),
    /// An operator prefix.
    Incomplete(IncompleteComparison),
}

impl PartialComparison {
    /// Returns the operator if it is complete.
    pub fn complete(self) -> Option<Comparison> {
        match self {
            Self::Complete(comparison) => Some(comparison),
            Self::Incomplete(_) => None,
        }
    }
}

/// What has been typed after the polarity marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartialContent {
    /// No key and operator yet.
    Name {
        /// Leading `!`.
        literal_match: bool,
        /// The name so far.
        text: PartialText,
    },
    /// A recognized key followed by an operator.
    Filter {
        /// The key, lowercased.
        key: String,
        /// The operator so far.
        comparison: PartialComparison,
        /// The value so far.
        value: PartialText,
    },
}

/// One term as it is being typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialFilterTerm {
    /// Leading `-` or not.
    pub polarity: Polarity,
    /// Everything after the polarity marker.
    pub content: PartialContent,
    /// The text this term was parsed from.
    raw: String,
}

impl PartialFilterTerm {
    /// Parses one term's worth of text.
    ///
    /// Never fails: text that is not a recognized `key<op>` prefix is a name.
    pub fn parse(text: &str) -> Self {
        let (polarity, rest) = match text.strip_prefix('-') {
            Some(rest) => (Polarity::Negative, rest),
            None => (Polarity::Positive, text),
        };

        let content = match rest.strip_prefix('!') {
            Some(name) => PartialContent::Name {
                literal_match: true,
                text: PartialText::classify(name),
            },
            None => parse_filter(rest).unwrap_or_else(|| PartialContent::Name {
                literal_match: false,
                text: PartialText::classify(rest),
            }),
        };

        Self {
            polarity,
            content,
            raw: text.into(),
        }
    }

    /// Returns the partial term under the cursor in a multi-term buffer.
    ///
    /// `offset` is a byte offset. A verbatim chunk that contains the offset, or ends exactly
    /// at it, is used. Otherwise the cursor sits on a separator and the term is empty.
    pub fn term_at(text: &str, offset: usize) -> Self {
        tokenize_tolerant(text)
            .into_iter()
            .find(|t| {
                t.kind == PartialTokenKind::Verbatim
                    && t.range.start <= offset
                    && offset <= t.range.end
            })
            .map_or_else(|| Self::parse(""), |t| Self::parse(t.text(text)))
    }

    /// The text this term was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The part currently being completed: the name, or the value after the operator.
    pub fn fragment(&self) -> &str {
        match &self.content {
            PartialContent::Name { text, .. } => text.text(),
            PartialContent::Filter { value, .. } => value.text(),
        }
    }

    /// Whether nothing at all has been typed.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Promotes to a complete term if every piece is resolved.
    pub fn to_complete(&self) -> Option<FilterTerm> {
        self.promote(false)
    }

    /// Promotes to a complete term, treating an open quote or regex as closed at the end.
    pub fn to_complete_autoterminated(&self) -> Option<FilterTerm> {
        self.promote(true)
    }

    /// Shared promotion logic.
    fn promote(&self, autoterminate: bool) -> Option<FilterTerm> {
        let negated = self.polarity.is_negative();
        match &self.content {
            PartialContent::Name {
                literal_match,
                text,
            } => Some(FilterTerm::Name {
                negated,
                literal_match: *literal_match,
                value: text.to_value(autoterminate)?,
            }),
            PartialContent::Filter {
                key,
                comparison,
                value,
            } => {
                let comparison = comparison.complete()?;
                let accepted = Vocabulary::standard()
                    .lookup(key)
                    .is_some_and(|d| d.operators.accepts(comparison));
                if !accepted || value.is_empty_bare() {
                    return None;
                }
                Some(FilterTerm::KeyValue {
                    negated,
                    key: key.clone(),
                    comparison,
                    value: value.to_value(autoterminate)?,
                })
            }
        }
    }
}

/// Recognizes `key<op>value` where `key` is in the vocabulary.
fn parse_filter(text: &str) -> Option<PartialContent> {
    let key_len = text.find(|c: char| !is_word_char(c)).unwrap_or(text.len());
    if key_len == 0 {
        return None;
    }
    let (key, after) = text.split_at(key_len);
    let key = Vocabulary::standard()
        .lookup_ignore_case(key)
        .map(|_| key.to_lowercase())?;

    let (comparison, value) = match Comparison::match_prefix(after) {
        Some((comparison, len)) => (PartialComparison::Complete(comparison), &after[len..]),
        None => (
            PartialComparison::Incomplete(IncompleteComparison::Bang),
            after.strip_prefix('!')?,
        ),
    };

    Some(PartialContent::Filter {
        key,
        comparison,
        value: PartialText::classify(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(text: &str) -> PartialText {
        PartialText::Bare { text: text.into() }
    }

    #[test]
    fn classify_text_states() {
        assert_eq!(PartialText::classify("bolt"), bare("bolt"));
        assert_eq!(
            PartialText::classify("\"Lightning Bolt\""),
            PartialText::Balanced {
                quote: QuoteKind::Double,
                text: "Lightning Bolt".into()
            }
        );
        assert_eq!(
            PartialText::classify("'Light"),
            PartialText::Unterminated {
                quote: QuoteKind::Single,
                text: "Light".into()
            }
        );
        assert_eq!(
            PartialText::classify("/dr"),
            PartialText::Unterminated {
                quote: QuoteKind::Regex,
                text: "dr".into()
            }
        );
        assert_eq!(PartialText::classify("\"a\"b"), bare("\"a\"b"));
    }

    #[test]
    fn plain_name() {
        let term = PartialFilterTerm::parse("bolt");
        assert_eq!(term.polarity, Polarity::Positive);
        assert_eq!(
            term.content,
            PartialContent::Name {
                literal_match: false,
                text: bare("bolt")
            }
        );
        assert_eq!(term.fragment(), "bolt");
        assert_eq!(term.raw(), "bolt");
    }

    #[test]
    fn negated_literal_name() {
        let term = PartialFilterTerm::parse("-!Opt");
        assert_eq!(term.polarity, Polarity::Negative);
        assert_eq!(
            term.content,
            PartialContent::Name {
                literal_match: true,
                text: bare("Opt")
            }
        );
    }

    #[test]
    fn key_is_recognized_case_insensitively() {
        let term = PartialFilterTerm::parse("-IS:scry");
        assert_eq!(term.polarity, Polarity::Negative);
        assert_eq!(
            term.content,
            PartialContent::Filter {
                key: "is".into(),
                comparison: PartialComparison::Complete(Comparison::Including),
                value: bare("scry"),
            }
        );
        assert_eq!(term.fragment(), "scry");
    }

    #[test]
    fn unknown_key_is_a_name() {
        let term = PartialFilterTerm::parse("zz:1");
        assert!(matches!(term.content, PartialContent::Name { .. }));
        assert_eq!(term.fragment(), "zz:1");
    }

    #[test]
    fn key_without_operator_is_a_name() {
        let term = PartialFilterTerm::parse("fo");
        assert_eq!(
            term.content,
            PartialContent::Name {
                literal_match: false,
                text: bare("fo")
            }
        );
    }

    #[test]
    fn lone_bang_is_incomplete() {
        let term = PartialFilterTerm::parse("c!");
        assert_eq!(
            term.content,
            PartialContent::Filter {
                key: "c".into(),
                comparison: PartialComparison::Incomplete(IncompleteComparison::Bang),
                value: bare(""),
            }
        );
        assert_eq!(term.to_complete(), None);
        assert_eq!(term.to_complete_autoterminated(), None);
    }

    #[test]
    fn not_equal_is_complete() {
        let term = PartialFilterTerm::parse("c!=r");
        assert_eq!(
            term.to_complete(),
            Some(FilterTerm::key_value("c", Comparison::NotEqual, "r"))
        );
    }

    #[test]
    fn promotion_requires_a_value() {
        assert_eq!(PartialFilterTerm::parse("format:").to_complete(), None);
        assert_eq!(PartialFilterTerm::parse("").to_complete(), None);
        assert_eq!(PartialFilterTerm::parse("-").to_complete(), None);
        assert_eq!(
            PartialFilterTerm::parse("name:\"\"").to_complete(),
            Some(FilterTerm::key_value("name", Comparison::Including, ""))
        );
    }

    #[test]
    fn promotion_checks_operator_class() {
        assert_eq!(PartialFilterTerm::parse("t>instant").to_complete(), None);
        assert!(PartialFilterTerm::parse("cmc>3").to_complete().is_some());
    }

    #[test]
    fn autotermination_closes_open_quote() {
        let term = PartialFilterTerm::parse("name:\"Lightning");
        assert_eq!(term.to_complete(), None);
        assert_eq!(
            term.to_complete_autoterminated(),
            Some(FilterTerm::key_value("name", Comparison::Including, "Lightning"))
        );
    }

    #[test]
    fn autotermination_needs_text_after_the_delimiter() {
        for text in ["\"", "name:\"", "o:/", "-'"] {
            assert_eq!(
                PartialFilterTerm::parse(text).to_complete_autoterminated(),
                None,
                "{text}"
            );
        }
    }

    #[test]
    fn autotermination_keeps_regex() {
        let term = PartialFilterTerm::parse("o:/draw");
        assert_eq!(
            term.to_complete_autoterminated(),
            Some(FilterTerm::KeyValue {
                negated: false,
                key: "o".into(),
                comparison: Comparison::Including,
                value: FilterValue::Regex("draw".into()),
            })
        );
    }

    #[test]
    fn term_at_cursor() {
        let text = "t:instant -is:scry";
        assert_eq!(PartialFilterTerm::term_at(text, 4).raw(), "t:instant");
        assert_eq!(PartialFilterTerm::term_at(text, 9).raw(), "t:instant");
        assert_eq!(PartialFilterTerm::term_at(text, text.len()).raw(), "-is:scry");
        assert!(PartialFilterTerm::term_at("a  b", 2).is_empty());
    }

    #[test]
    fn rendered_terms_promote_to_themselves() {
        let terms = [
            FilterTerm::name("Lightning Bolt"),
            FilterTerm::key_value("c", Comparison::NotEqual, "r").with_negation(true),
            FilterTerm::Name {
                negated: true,
                literal_match: true,
                value: FilterValue::text("Opt"),
            },
            FilterTerm::key_value("usd", Comparison::LessOrEqual, "0.50"),
        ];
        for term in terms {
            let partial = PartialFilterTerm::parse(&term.to_string());
            assert_eq!(partial.to_complete(), Some(term));
        }
    }
}
