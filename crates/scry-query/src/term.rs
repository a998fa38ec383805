//! Complete filter terms and expressions.
//!
//! These are the values produced by the strict parser and by promoting a partial term. Every
//! value has a canonical textual rendering (its `Display` impl) that parses back to an equal
//! value.

use std::fmt;

use serde::Serialize;

/// A comparison operator between a filter key and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `:` - the field includes the value.
    Including,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
}

impl Comparison {
    /// All comparisons in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Including,
        Self::Equal,
        Self::NotEqual,
        Self::LessThan,
        Self::LessOrEqual,
        Self::GreaterThan,
        Self::GreaterOrEqual,
    ];

    /// Operator symbols tried longest-first when scanning text.
    const BY_LENGTH: [(&'static str, Self); 7] = [
        ("<=", Self::LessOrEqual),
        (">=", Self::GreaterOrEqual),
        ("!=", Self::NotEqual),
        ("<", Self::LessThan),
        (">", Self::GreaterThan),
        ("=", Self::Equal),
        (":", Self::Including),
    ];

    /// Returns the operator's textual symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Including => ":",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Matches the longest operator at the start of `text`.
    ///
    /// Returns the comparison and the number of bytes it occupies.
    pub fn match_prefix(text: &str) -> Option<(Self, usize)> {
        Self::BY_LENGTH
            .iter()
            .find(|(symbol, _)| text.starts_with(symbol))
            .map(|&(symbol, comparison)| (comparison, symbol.len()))
    }

    /// Whether this is one of the two equality-style operators.
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Including | Self::Equal)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Delimiter kind of a quoted or regex span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteKind {
    /// `"..."`
    Double,
    /// `'...'`
    Single,
    /// `/.../`
    Regex,
}

impl QuoteKind {
    /// Returns the quote kind opened by `ch`, if any.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            '/' => Some(Self::Regex),
            _ => None,
        }
    }

    /// The delimiter character.
    pub fn delimiter(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
            Self::Regex => '/',
        }
    }
}

/// Returns true for characters allowed in an unquoted word.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// The value side of a filter, or the text of a name filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FilterValue {
    /// Plain text, rendered bare when possible and quoted otherwise.
    Text(String),
    /// A regular expression body, rendered between slashes.
    Regex(String),
}

impl FilterValue {
    /// Creates a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the raw text without delimiters.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Regex(text) => text,
        }
    }

    /// Whether the text can be written without quotes and still parse back unchanged.
    fn is_bare_word(text: &str) -> bool {
        !text.is_empty() && text.chars().all(is_word_char) && !text.eq_ignore_ascii_case("or")
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) if Self::is_bare_word(text) => f.write_str(text),
            Self::Text(text) => {
                let quote = if text.contains('"') && !text.contains('\'') {
                    '\''
                } else {
                    '"'
                };
                write!(f, "{quote}{text}{quote}")
            }
            Self::Regex(body) => write!(f, "/{body}/"),
        }
    }
}

/// A single complete filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterTerm {
    /// A bare, quoted or regex name with no key.
    Name {
        /// Leading `-`.
        negated: bool,
        /// Leading `!`: match the name exactly rather than as a substring.
        literal_match: bool,
        /// The name text.
        value: FilterValue,
    },
    /// `key<comparison>value`.
    KeyValue {
        /// Leading `-`.
        negated: bool,
        /// The key as written (canonical name or alias).
        key: String,
        /// The comparison operator.
        comparison: Comparison,
        /// The value.
        value: FilterValue,
    },
}

impl FilterTerm {
    /// Creates a positive, substring-matching name term.
    pub fn name(text: impl Into<String>) -> Self {
        Self::Name {
            negated: false,
            literal_match: false,
            value: FilterValue::text(text),
        }
    }

    /// Creates a positive key/value term with a text value.
    pub fn key_value(key: impl Into<String>, comparison: Comparison, value: impl Into<String>) -> Self {
        Self::KeyValue {
            negated: false,
            key: key.into(),
            comparison,
            value: FilterValue::text(value),
        }
    }

    /// Whether the term carries a leading `-`.
    pub fn is_negated(&self) -> bool {
        match self {
            Self::Name { negated, .. } | Self::KeyValue { negated, .. } => *negated,
        }
    }

    /// Returns a copy with the given negation.
    pub fn with_negation(mut self, negation: bool) -> Self {
        match &mut self {
            Self::Name { negated, .. } | Self::KeyValue { negated, .. } => *negated = negation,
        }
        self
    }

    /// Returns the term's value.
    pub fn value(&self) -> &FilterValue {
        match self {
            Self::Name { value, .. } | Self::KeyValue { value, .. } => value,
        }
    }
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name {
                negated,
                literal_match,
                value,
            } => {
                if *negated {
                    f.write_str("-")?;
                }
                if *literal_match {
                    f.write_str("!")?;
                }
                write!(f, "{value}")
            }
            Self::KeyValue {
                negated,
                key,
                comparison,
                value,
            } => {
                if *negated {
                    f.write_str("-")?;
                }
                write!(f, "{key}{comparison}{value}")
            }
        }
    }
}

/// A complete filter expression: one term, or a parenthesized disjunction of terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterExpr {
    /// A single term.
    Term {
        /// The term.
        term: FilterTerm,
    },
    /// `-?(a or b ...)`. Never empty. Negation applies to the group as a whole.
    Disjunction {
        /// Leading `-` on the group.
        negated: bool,
        /// Member terms, in source order.
        members: Vec<FilterTerm>,
    },
}

impl From<FilterTerm> for FilterExpr {
    fn from(term: FilterTerm) -> Self {
        Self::Term { term }
    }
}

impl FilterExpr {
    /// Whether the expression as a whole is negated.
    pub fn is_negated(&self) -> bool {
        match self {
            Self::Term { term } => term.is_negated(),
            Self::Disjunction { negated, .. } => *negated,
        }
    }

    /// Returns a copy with the outermost negation set to `negation`.
    pub fn with_negation(self, negation: bool) -> Self {
        match self {
            Self::Term { term } => term.with_negation(negation).into(),
            Self::Disjunction { members, .. } => Self::Disjunction {
                negated: negation,
                members,
            },
        }
    }

    /// Returns the single term, if this is not a disjunction.
    pub fn as_term(&self) -> Option<&FilterTerm> {
        match self {
            Self::Term { term } => Some(term),
            Self::Disjunction { .. } => None,
        }
    }

    /// Formats the expression as an indented structure, one node per line.
    pub fn tree(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Term { term } => push_term_line(&mut out, term, 0),
            Self::Disjunction { negated, members } => {
                out.push_str(if *negated { "Not(Or)\n" } else { "Or\n" });
                for member in members {
                    push_term_line(&mut out, member, 1);
                }
            }
        }
        out
    }
}

/// Appends one tree line describing `term`.
fn push_term_line(out: &mut String, term: &FilterTerm, indent: usize) {
    let prefix = "  ".repeat(indent);
    let line = match term {
        FilterTerm::Name {
            negated,
            literal_match,
            value,
        } => format!(
            "{prefix}Name(negated={negated}, literal={literal_match}, {:?})",
            value
        ),
        FilterTerm::KeyValue {
            negated,
            key,
            comparison,
            value,
        } => format!(
            "{prefix}KeyValue(negated={negated}, {key:?} {comparison} {:?})",
            value
        ),
    };
    out.push_str(&line);
    out.push('\n');
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term { term } => write!(f, "{term}"),
            Self::Disjunction { negated, members } => {
                if *negated {
                    f.write_str("-")?;
                }
                f.write_str("(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_longest_match_first() {
        assert_eq!(
            Comparison::match_prefix("<=3"),
            Some((Comparison::LessOrEqual, 2))
        );
        assert_eq!(Comparison::match_prefix("<3"), Some((Comparison::LessThan, 1)));
        assert_eq!(Comparison::match_prefix("!=x"), Some((Comparison::NotEqual, 2)));
        assert_eq!(Comparison::match_prefix("!x"), None);
        assert_eq!(Comparison::match_prefix(":red"), Some((Comparison::Including, 1)));
    }

    #[test]
    fn bare_values_stay_bare() {
        assert_eq!(FilterTerm::key_value("c", Comparison::Including, "red").to_string(), "c:red");
        assert_eq!(FilterTerm::name("bolt").to_string(), "bolt");
    }

    #[test]
    fn values_with_spaces_are_quoted() {
        let term = FilterTerm::key_value("name", Comparison::Equal, "Lightning Bolt");
        assert_eq!(term.to_string(), "name=\"Lightning Bolt\"");
    }

    #[test]
    fn text_containing_double_quote_uses_single_quotes() {
        assert_eq!(FilterTerm::name("say \"hi\"").to_string(), "'say \"hi\"'");
    }

    #[test]
    fn or_and_empty_text_are_quoted() {
        assert_eq!(FilterTerm::name("or").to_string(), "\"or\"");
        assert_eq!(FilterTerm::name("").to_string(), "\"\"");
    }

    #[test]
    fn markers_render_minus_then_bang() {
        let term = FilterTerm::Name {
            negated: true,
            literal_match: true,
            value: FilterValue::text("Opt"),
        };
        assert_eq!(term.to_string(), "-!Opt");
    }

    #[test]
    fn regex_value_renders_with_slashes() {
        let term = FilterTerm::KeyValue {
            negated: false,
            key: "o".into(),
            comparison: Comparison::Including,
            value: FilterValue::Regex("draw.*card".into()),
        };
        assert_eq!(term.to_string(), "o:/draw.*card/");
    }

    #[test]
    fn disjunction_renders_group_negation() {
        let expr = FilterExpr::Disjunction {
            negated: true,
            members: vec![
                FilterTerm::key_value("t", Comparison::Including, "instant"),
                FilterTerm::key_value("t", Comparison::Including, "sorcery"),
            ],
        };
        assert_eq!(expr.to_string(), "-(t:instant or t:sorcery)");
    }

    #[test]
    fn with_negation_on_disjunction_keeps_members() {
        let expr = FilterExpr::Disjunction {
            negated: false,
            members: vec![FilterTerm::name("a")],
        };
        let negated = expr.with_negation(true);
        assert!(negated.is_negated());
        assert_eq!(negated.to_string(), "-(a)");
    }

    #[test]
    fn tree_lists_members() {
        let expr = FilterExpr::Disjunction {
            negated: false,
            members: vec![FilterTerm::name("a"), FilterTerm::name("b")],
        };
        let tree = expr.tree();
        assert!(tree.starts_with("Or\n"));
        assert_eq!(tree.lines().count(), 3);
    }
}
