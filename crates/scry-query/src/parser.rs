//! Strict parser for complete filter expressions.
//!
//! Parses a strict token stream into a [`FilterExpr`] using recursive descent. There is no
//! partial result: anything the grammar does not cover is an error.
//!
//! # Grammar
//!
//! ```text
//! expression  → disjunction | term
//! disjunction → "-"? GROUP
//! GROUP inner → term (("or" | WS) term)*
//! term        → "-"? "!"? name | "-"? keyvalue
//! name        → QUOTED | REGEX | WORD
//! keyvalue    → KEY COMPARISON (QUOTED | REGEX | WORD)
//! ```
//!
//! Markers, key, operator and value must touch: `-c:red` is a term, `- c:red` is not.

use crate::{
    error::{ParseError, QueryError},
    lexer::{Token, TokenKind, tokenize, tokenize_range},
    term::{FilterExpr, FilterTerm, FilterValue},
    vocabulary::Vocabulary,
};

/// Recursive descent parser over one token stream.
struct Parser<'a> {
    /// The complete query, for re-lexing group contents.
    input: &'a str,
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// Keys recognized in `key:value` terms.
    vocabulary: &'a Vocabulary,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(input: &'a str, tokens: Vec<Token>, vocabulary: &'a Vocabulary) -> Self {
        Self {
            input,
            tokens,
            position: 0,
            vocabulary,
        }
    }

    /// Parses the whole stream as one expression.
    fn parse(mut self) -> Result<FilterExpr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new("empty filter", None));
        }

        let expr = self.parse_expression()?;

        if let Some(token) = self.peek() {
            return Err(ParseError::new(
                format!("unexpected {} after the filter", describe(&token.kind)),
                Some(token.span.start),
            ));
        }

        Ok(expr)
    }

    /// Parses: expression → disjunction | term
    fn parse_expression(&mut self) -> Result<FilterExpr, ParseError> {
        let negated_group = self.check(|k| matches!(k, TokenKind::Minus))
            && self.peek_at(1).is_some_and(|t| matches!(t.kind, TokenKind::Group(_)));

        if negated_group || self.check(|k| matches!(k, TokenKind::Group(_))) {
            return self.parse_disjunction();
        }

        self.parse_term().map(FilterExpr::from)
    }

    /// Parses: disjunction → "-"? GROUP
    fn parse_disjunction(&mut self) -> Result<FilterExpr, ParseError> {
        let negated = self.take_attached_minus()?;

        let Some(group) = self.advance() else {
            return Err(ParseError::new("expected a group", None));
        };
        let inner = group.inner_start()..group.span.end - 1;
        let tokens = tokenize_range(self.input, inner)?;

        let members =
            Self::new(self.input, tokens, self.vocabulary).parse_group_members(group.span.start)?;
        Ok(FilterExpr::Disjunction { negated, members })
    }

    /// Parses: GROUP inner → term (("or" | WS) term)*
    fn parse_group_members(mut self, open_paren: usize) -> Result<Vec<FilterTerm>, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new("empty group", Some(open_paren)));
        }

        let mut members = Vec::new();
        loop {
            if let Some(token) = self.peek().filter(|t| is_or(&t.kind)) {
                let message = if members.is_empty() {
                    "expected a filter before 'or'"
                } else {
                    "expected a filter between 'or's"
                };
                return Err(ParseError::new(message, Some(token.span.start)));
            }

            let start = self.peek().map(|t| t.span.start);
            members.push(self.parse_term()?);
            let end = self.previous_end();

            let Some(next) = self.peek() else {
                return Ok(members);
            };

            if is_or(&next.kind) {
                let or_at = next.span.start;
                self.advance();
                if self.peek().is_none() {
                    return Err(ParseError::new("expected a filter after 'or'", Some(or_at)));
                }
            } else if Some(next.span.start) == end {
                return Err(ParseError::new(
                    "filters in a group must be separated by whitespace or 'or'",
                    start,
                ));
            }
        }
    }

    /// Parses: term → "-"? "!"? name | "-"? keyvalue
    fn parse_term(&mut self) -> Result<FilterTerm, ParseError> {
        let negated = self.take_attached_minus()?;

        if self.check(|k| matches!(k, TokenKind::Bang)) {
            return self.parse_literal_name(negated);
        }

        let Some(token) = self.advance() else {
            return Err(ParseError::new("expected a filter after '-'", None));
        };

        match token.kind {
            TokenKind::Word(word) if self.attached_comparison() => {
                self.parse_key_value(negated, &word, token.span.start)
            }
            TokenKind::Word(word) if word.eq_ignore_ascii_case("or") => Err(ParseError::new(
                "'or' is only allowed between filters inside parentheses",
                Some(token.span.start),
            )),
            TokenKind::Word(word) | TokenKind::Quoted(word) => Ok(FilterTerm::Name {
                negated,
                literal_match: false,
                value: FilterValue::Text(word),
            }),
            TokenKind::Regex(body) => Ok(FilterTerm::Name {
                negated,
                literal_match: false,
                value: FilterValue::Regex(body),
            }),
            other => Err(ParseError::new(
                format!("expected a filter, found {}", describe(&other)),
                Some(token.span.start),
            )),
        }
    }

    /// Parses the name after a `!` marker.
    fn parse_literal_name(&mut self, negated: bool) -> Result<FilterTerm, ParseError> {
        let bang = self.take_attached("'!' must be attached to the name it marks")?;

        let Some(token) = self.advance() else {
            return Err(ParseError::new("expected a name after '!'", Some(bang)));
        };
        let value = match token.kind {
            TokenKind::Word(word) if self.attached_comparison() => {
                return Err(ParseError::new(
                    format!("'!' cannot be used with the filter key '{word}'"),
                    Some(bang),
                ));
            }
            TokenKind::Word(text) | TokenKind::Quoted(text) => FilterValue::Text(text),
            TokenKind::Regex(body) => FilterValue::Regex(body),
            other => {
                return Err(ParseError::new(
                    format!("expected a name after '!', found {}", describe(&other)),
                    Some(token.span.start),
                ));
            }
        };

        Ok(FilterTerm::Name {
            negated,
            literal_match: true,
            value,
        })
    }

    /// Parses: keyvalue → KEY COMPARISON (QUOTED | REGEX | WORD)
    ///
    /// The key has already been consumed; the comparison is the current token.
    fn parse_key_value(&mut self, negated: bool, key: &str, key_at: usize) -> Result<FilterTerm, ParseError> {
        let Some(descriptor) = self.vocabulary.lookup_ignore_case(key) else {
            return Err(ParseError::new(format!("unknown filter key '{key}'"), Some(key_at)));
        };

        let Some(Token {
            kind: TokenKind::Comparison(comparison),
            span,
        }) = self.advance()
        else {
            return Err(ParseError::new("expected a comparison", Some(key_at)));
        };

        if !descriptor.operators.accepts(comparison) {
            return Err(ParseError::new(
                format!("filter key '{key}' does not accept '{comparison}'"),
                Some(span.start),
            ));
        }

        let missing = || ParseError::new(format!("expected a value after '{key}{comparison}'"), Some(span.end));
        if self.peek().is_none_or(|t| t.span.start != span.end) {
            return Err(missing());
        }

        let value = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Word(text) | TokenKind::Quoted(text)) => FilterValue::Text(text),
            Some(TokenKind::Regex(body)) => FilterValue::Regex(body),
            _ => return Err(missing()),
        };

        Ok(FilterTerm::KeyValue {
            negated,
            key: key.to_lowercase(),
            comparison,
            value,
        })
    }

    /// Consumes a leading `-` if present, requiring it to touch the next token.
    fn take_attached_minus(&mut self) -> Result<bool, ParseError> {
        if !self.check(|k| matches!(k, TokenKind::Minus)) {
            return Ok(false);
        }
        self.take_attached("'-' must be attached to the filter it negates")?;
        Ok(true)
    }

    /// Consumes the current token and checks that the next one starts where it ends.
    ///
    /// Returns the consumed token's start.
    fn take_attached(&mut self, message: &str) -> Result<usize, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::new(message, None));
        };
        match self.peek() {
            Some(next) if next.span.start == token.span.end => Ok(token.span.start),
            _ => Err(ParseError::new(message, Some(token.span.start))),
        }
    }

    /// Whether the current token is a comparison touching the previous token.
    fn attached_comparison(&self) -> bool {
        self.peek().is_some_and(|t| {
            matches!(t.kind, TokenKind::Comparison(_)) && Some(t.span.start) == self.previous_end()
        })
    }

    /// End of the most recently consumed token.
    fn previous_end(&self) -> Option<usize> {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the token `offset` places ahead without consuming anything.
    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    /// Checks the current token's kind.
    fn check(&self, predicate: impl Fn(&TokenKind) -> bool) -> bool {
        self.peek().is_some_and(|t| predicate(&t.kind))
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

/// Whether a token is the `or` separator.
fn is_or(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Word(word) if word.eq_ignore_ascii_case("or"))
}

/// Short human description of a token for error messages.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Quoted(text) => format!("quoted text \"{text}\""),
        TokenKind::Regex(body) => format!("regex /{body}/"),
        TokenKind::Group(_) => "group".to_string(),
        TokenKind::Word(word) => format!("'{word}'"),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Bang => "'!'".to_string(),
        TokenKind::Comparison(comparison) => format!("'{comparison}'"),
    }
}

/// Parses a complete filter expression with the standard vocabulary.
///
/// Fails on any lexical or grammatical problem, including trailing input.
pub fn parse_expression(input: &str) -> Result<FilterExpr, QueryError> {
    parse_expression_with(input, Vocabulary::standard())
}

/// Parses a complete filter expression against a specific vocabulary.
pub fn parse_expression_with(input: &str, vocabulary: &Vocabulary) -> Result<FilterExpr, QueryError> {
    let tokens = tokenize(input)?;
    Parser::new(input, tokens, vocabulary)
        .parse()
        .map_err(|e| QueryError::from_parse(e, input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Comparison;

    fn kv(key: &str, comparison: Comparison, value: &str) -> FilterTerm {
        FilterTerm::key_value(key, comparison, value)
    }

    fn name(text: &str) -> FilterTerm {
        FilterTerm::name(text)
    }

    fn term(input: &str) -> FilterTerm {
        parse_expression(input)
            .unwrap()
            .as_term()
            .cloned()
            .unwrap()
    }

    fn error(input: &str) -> String {
        parse_expression(input).unwrap_err().message().to_string()
    }

    #[test]
    fn bare_name() {
        assert_eq!(term("bolt"), name("bolt"));
    }

    #[test]
    fn quoted_name() {
        assert_eq!(term("\"Lightning Bolt\""), name("Lightning Bolt"));
        assert_eq!(term("'Lightning Bolt'"), name("Lightning Bolt"));
    }

    #[test]
    fn regex_name() {
        assert_eq!(
            term("/^bolt/"),
            FilterTerm::Name {
                negated: false,
                literal_match: false,
                value: FilterValue::Regex("^bolt".into()),
            }
        );
    }

    #[test]
    fn key_value_terms() {
        assert_eq!(term("c:red"), kv("c", Comparison::Including, "red"));
        assert_eq!(term("cmc>=3"), kv("cmc", Comparison::GreaterOrEqual, "3"));
        assert_eq!(term("c!=r"), kv("c", Comparison::NotEqual, "r"));
    }

    #[test]
    fn key_is_lowercased() {
        assert_eq!(term("Color:red"), kv("color", Comparison::Including, "red"));
    }

    #[test]
    fn negation_and_literal_markers() {
        assert_eq!(term("-is:foil"), kv("is", Comparison::Including, "foil").with_negation(true));
        assert_eq!(
            term("-!Opt"),
            FilterTerm::Name {
                negated: true,
                literal_match: true,
                value: FilterValue::text("Opt"),
            }
        );
    }

    #[test]
    fn or_is_a_valid_value() {
        assert_eq!(term("name:or"), kv("name", Comparison::Including, "or"));
        assert_eq!(term("\"or\""), name("or"));
    }

    #[test]
    fn disjunction() {
        let expr = parse_expression("(t:instant or t:sorcery)").unwrap();
        assert_eq!(
            expr,
            FilterExpr::Disjunction {
                negated: false,
                members: vec![
                    kv("t", Comparison::Including, "instant"),
                    kv("t", Comparison::Including, "sorcery"),
                ],
            }
        );
    }

    #[test]
    fn negated_disjunction_keeps_member_polarity() {
        let expr = parse_expression("-(c:red OR -c:blue)").unwrap();
        assert_eq!(
            expr,
            FilterExpr::Disjunction {
                negated: true,
                members: vec![
                    kv("c", Comparison::Including, "red"),
                    kv("c", Comparison::Including, "blue").with_negation(true),
                ],
            }
        );
    }

    #[test]
    fn whitespace_separates_group_members() {
        let FilterExpr::Disjunction { members, .. } = parse_expression("(bolt shock)").unwrap() else {
            panic!("expected a disjunction");
        };
        assert_eq!(members, vec![name("bolt"), name("shock")]);
    }

    #[test]
    fn single_member_group() {
        let expr = parse_expression("(bolt)").unwrap();
        assert_eq!(
            expr,
            FilterExpr::Disjunction {
                negated: false,
                members: vec![name("bolt")],
            }
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(error(""), "empty filter");
        assert_eq!(error("   "), "empty filter");
    }

    #[test]
    fn empty_group_is_an_error() {
        assert_eq!(error("()"), "empty group");
        assert_eq!(error("-( )"), "empty group");
    }

    #[test]
    fn misplaced_or() {
        assert!(error("(a or)").contains("after 'or'"));
        assert!(error("(or a)").contains("before 'or'"));
        assert!(error("(a or or b)").contains("between"));
        assert!(error("or").contains("inside parentheses"));
    }

    #[test]
    fn unknown_key() {
        let err = parse_expression("zz:1").unwrap_err();
        assert_eq!(err.message(), "unknown filter key 'zz'");
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn operator_class_is_enforced() {
        assert!(error("t>instant").contains("does not accept '>'"));
        assert!(parse_expression("r>=rare").is_ok());
    }

    #[test]
    fn missing_value() {
        assert!(error("c:").contains("expected a value"));
        assert!(error("c: red").contains("expected a value"));
    }

    #[test]
    fn detached_markers() {
        assert!(error("- c:red").contains("attached"));
        assert!(error("! bolt").contains("attached"));
        assert!(error("-").contains("attached"));
    }

    #[test]
    fn bang_before_key() {
        assert!(error("!t:instant").contains("cannot be used with the filter key"));
    }

    #[test]
    fn trailing_input() {
        let err = parse_expression("c:red bolt").unwrap_err();
        assert!(err.message().contains("unexpected 'bolt'"));
        assert_eq!(err.position(), Some(6));
        assert!(error("(a) b").contains("unexpected"));
    }

    #[test]
    fn touching_group_members() {
        assert!(error("(a\"b\")").contains("separated"));
    }

    #[test]
    fn lex_errors_surface() {
        let err = parse_expression("(a or \"b)").unwrap_err();
        assert!(err.message().contains("unclosed"));
    }

    #[test]
    fn errors_inside_groups_point_into_the_query() {
        let err = parse_expression("(c:red or zz:1)").unwrap_err();
        assert_eq!(err.position(), Some(10));
        assert_eq!(err.query, "(c:red or zz:1)");
    }

    #[test]
    fn round_trip() {
        let terms = vec![
            name("bolt"),
            name("Lightning Bolt"),
            name("say \"hi\""),
            name("or"),
            name("x-y"),
            FilterTerm::Name {
                negated: true,
                literal_match: true,
                value: FilterValue::text("Fire // Ice"),
            },
            kv("c", Comparison::NotEqual, "r"),
            kv("usd", Comparison::LessThan, "0.5"),
            kv("name", Comparison::Equal, "Jace, the Mind Sculptor").with_negation(true),
            FilterTerm::KeyValue {
                negated: false,
                key: "o".into(),
                comparison: Comparison::Including,
                value: FilterValue::Regex("draw (a|two) cards?".into()),
            },
        ];
        for t in terms {
            let rendered = t.to_string();
            assert_eq!(parse_expression(&rendered).unwrap(), FilterExpr::from(t), "{rendered}");
        }

        let group = FilterExpr::Disjunction {
            negated: true,
            members: vec![name("a b"), kv("f", Comparison::Including, "modern")],
        };
        assert_eq!(parse_expression(&group.to_string()).unwrap(), group);
    }
}
