//! Strict tokenizer for complete queries.
//!
//! At each position the first matching rule wins: quoted literal, `/regex/`, parenthesized
//! group, word, `-`, comparison operator, `!`. Anything else (including an unmatched quote,
//! slash or parenthesis) is a [`LexError`].

use std::{iter::Peekable, ops::Range, str::Chars};

use crate::{
    error::LexError,
    term::{Comparison, QuoteKind, is_word_char},
};

/// The kind of a strict token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A single- or double-quoted literal (quotes stripped).
    Quoted(String),
    /// A `/regex/` literal (slashes stripped).
    Regex(String),
    /// A parenthesized group. Holds the text between the parentheses.
    Group(String),
    /// A run of word characters.
    Word(String),
    /// `-`
    Minus,
    /// `!` not followed by `=`.
    Bang,
    /// A comparison operator.
    Comparison(Comparison),
}

/// A token with the byte range it covers in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was matched.
    pub kind: TokenKind,
    /// Byte range in the original input, delimiters included.
    pub span: Range<usize>,
}

impl Token {
    /// Byte offset where a group's inner text starts.
    pub fn inner_start(&self) -> usize {
        self.span.start + 1
    }
}

/// Tokenizes a query string, or a sub-range of one.
struct Lexer<'a> {
    /// The complete input (used for error context).
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in `input`.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `range` of `input`.
    fn new(input: &'a str, range: Range<usize>) -> Self {
        Self {
            input,
            position: range.start,
            chars: input[range].chars().peekable(),
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire range.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };
        let start = self.position;

        let kind = match ch {
            '"' | '\'' => self.read_delimited(ch, "unclosed quote").map(TokenKind::Quoted)?,
            '/' => self.read_delimited(ch, "unclosed regex").map(TokenKind::Regex)?,
            '(' => self.read_group()?,
            ')' => return Err(self.error_at("unmatched closing parenthesis", start)),
            '-' => {
                self.advance();
                TokenKind::Minus
            }
            '!' | '<' | '>' | '=' | ':' => self.read_operator(),
            c if is_word_char(c) => self.read_word(),
            c => return Err(self.error_at(format!("unexpected character '{c}'"), start)),
        };

        Ok(Some(Token {
            kind,
            span: start..self.position,
        }))
    }

    /// Reads a span opened by `delimiter` up to the matching closing delimiter.
    fn read_delimited(&mut self, delimiter: char, unclosed: &str) -> Result<String, LexError> {
        let start = self.position;
        self.advance(); // opening delimiter

        let mut content = String::new();
        loop {
            match self.chars.peek() {
                Some(&ch) if ch == delimiter => {
                    self.advance();
                    return Ok(content);
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at(unclosed, start)),
            }
        }
    }

    /// Reads a parenthesized group, keeping its inner text verbatim.
    ///
    /// Quoted and regex spans are skipped while looking for the closing parenthesis.
    fn read_group(&mut self) -> Result<TokenKind, LexError> {
        let start = self.position;
        self.advance(); // (

        let mut content = String::new();
        let mut open_quote: Option<char> = None;
        loop {
            let Some(&ch) = self.chars.peek() else {
                return Err(self.error_at("unclosed parenthesis", start));
            };

            match open_quote {
                Some(delimiter) if ch == delimiter => open_quote = None,
                Some(_) => {}
                None if ch == ')' => {
                    self.advance();
                    return Ok(TokenKind::Group(content));
                }
                None if ch == '(' => {
                    return Err(self.error_at("nested parentheses are not supported", self.position));
                }
                None => open_quote = QuoteKind::from_char(ch).map(QuoteKind::delimiter),
            }

            content.push(ch);
            self.advance();
        }
    }

    /// Reads a comparison operator, or a lone `!`.
    fn read_operator(&mut self) -> TokenKind {
        let rest = &self.input[self.position..];
        match Comparison::match_prefix(rest) {
            Some((comparison, len)) => {
                for _ in 0..len {
                    self.advance();
                }
                TokenKind::Comparison(comparison)
            }
            None => {
                // Only a lone '!' reaches here.
                self.advance();
                TokenKind::Bang
            }
        }
    }

    /// Reads a run of word characters.
    fn read_word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !is_word_char(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }
        TokenKind::Word(word)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a complete query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, 0..input.len()).tokenize()
}

/// Tokenizes `range` of `input`, reporting spans and errors against the whole input.
pub(crate) fn tokenize_range(input: &str, range: Range<usize>) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, range).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn word(s: &str) -> TokenKind {
        TokenKind::Word(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![]);
        assert_eq!(kinds("   "), vec![]);
    }

    #[test]
    fn key_value() {
        assert_eq!(
            kinds("c:red"),
            vec![
                word("c"),
                TokenKind::Comparison(Comparison::Including),
                word("red")
            ]
        );
    }

    #[test]
    fn operators_longest_first() {
        assert_eq!(
            kinds("cmc>=3"),
            vec![
                word("cmc"),
                TokenKind::Comparison(Comparison::GreaterOrEqual),
                word("3")
            ]
        );
        assert_eq!(
            kinds("c!=r"),
            vec![
                word("c"),
                TokenKind::Comparison(Comparison::NotEqual),
                word("r")
            ]
        );
    }

    #[test]
    fn negation_and_bang() {
        assert_eq!(
            kinds("-!bolt"),
            vec![TokenKind::Minus, TokenKind::Bang, word("bolt")]
        );
    }

    #[test]
    fn quoted_literals() {
        assert_eq!(
            kinds("\"Lightning Bolt\" 'x'"),
            vec![
                TokenKind::Quoted("Lightning Bolt".into()),
                TokenKind::Quoted("x".into())
            ]
        );
    }

    #[test]
    fn regex_literal() {
        assert_eq!(
            kinds("o:/draw.*/"),
            vec![
                word("o"),
                TokenKind::Comparison(Comparison::Including),
                TokenKind::Regex("draw.*".into())
            ]
        );
    }

    #[test]
    fn group_keeps_inner_text() {
        let tokens = tokenize("-(t:instant or t:sorcery)").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Minus);
        assert_eq!(
            tokens[1].kind,
            TokenKind::Group("t:instant or t:sorcery".into())
        );
        assert_eq!(tokens[1].span, 1..25);
        assert_eq!(tokens[1].inner_start(), 2);
    }

    #[test]
    fn group_skips_quoted_parens() {
        assert_eq!(
            kinds("(name:\"a)b\" or x)"),
            vec![TokenKind::Group("name:\"a)b\" or x".into())]
        );
    }

    #[test]
    fn spans_are_byte_ranges() {
        let tokens = tokenize("  éa:b").unwrap();
        assert_eq!(tokens[0].span, 2..5);
        assert_eq!(tokens[1].span, 5..6);
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("name:\"bolt").unwrap_err();
        assert_eq!(err.position, 5);
        assert!(err.message.contains("unclosed quote"));
    }

    #[test]
    fn unclosed_regex_error() {
        let err = tokenize("o:/draw").unwrap_err();
        assert!(err.message.contains("unclosed regex"));
    }

    #[test]
    fn unmatched_parens() {
        assert!(tokenize("(a or b").unwrap_err().message.contains("unclosed parenthesis"));
        assert!(tokenize("a)").unwrap_err().message.contains("unmatched"));
    }

    #[test]
    fn nested_group_error() {
        let err = tokenize("(a or (b))").unwrap_err();
        assert!(err.message.contains("nested"));
        assert_eq!(err.position, 6);
    }

    #[test]
    fn unexpected_character() {
        let err = tokenize("cmc=2.5").unwrap_err();
        assert!(err.message.contains("unexpected character '.'"));
    }

    #[test]
    fn range_tokenizing_reports_absolute_spans() {
        let input = "(a or b)";
        let tokens = tokenize_range(input, 1..7).unwrap();
        assert_eq!(tokens[0].span, 1..2);
        assert_eq!(tokens[1].kind, word("or"));
        assert_eq!(tokens[2].span, 6..7);
    }
}
