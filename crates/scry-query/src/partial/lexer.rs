//! Tokenizer for text that is still being typed.
//!
//! Unlike the strict lexer this one never interprets keys or operators. It only splits the
//! buffer into structural pieces (`(`, `)`, `or`), separators, and verbatim chunks that the
//! partial term model classifies later.

use std::ops::Range;

use serde::Serialize;

use crate::{error::LexError, term::QuoteKind};

/// How unterminated quoted and regex spans are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Every span must be closed. Used for re-lexing saved text.
    Strict,
    /// An open span runs to the end of input. Used while the user is typing.
    Tolerant,
}

/// Kind of a partial token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialTokenKind {
    /// `(` or `-(`.
    OpenParen,
    /// `)`
    CloseParen,
    /// The word `or` standing on its own.
    Or,
    /// Plain text, a quoted span, or both run together.
    Verbatim,
    /// Whitespace separating two terms.
    And,
}

/// A partial token and the byte range it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialToken {
    /// What was matched.
    pub kind: PartialTokenKind,
    /// Byte range in the input. Never includes absorbed whitespace.
    pub range: Range<usize>,
}

impl PartialToken {
    /// Returns the covered slice of `text`.
    pub fn text<'t>(&self, text: &'t str) -> &'t str {
        &text[self.range.clone()]
    }
}

/// Returns true for characters that end a plain verbatim run.
fn is_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')') || QuoteKind::from_char(ch).is_some()
}

/// Scanner state over one buffer.
struct Scanner<'a> {
    /// The text being tokenized.
    text: &'a str,
    /// Unterminated-literal policy.
    mode: LexMode,
    /// Current byte offset.
    position: usize,
    /// Tokens produced so far.
    tokens: Vec<PartialToken>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner at the start of `text`.
    fn new(text: &'a str, mode: LexMode) -> Self {
        Self {
            text,
            mode,
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// The unconsumed input.
    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    /// Tokenizes the whole buffer.
    fn run(mut self) -> Result<Vec<PartialToken>, LexError> {
        while let Some(ch) = self.rest().chars().next() {
            let start = self.position;
            if ch.is_whitespace() {
                self.scan_whitespace();
            } else if self.rest().starts_with("-(") {
                self.position += 2;
                self.push(PartialTokenKind::OpenParen, start);
            } else if ch == '(' {
                self.position += 1;
                self.push(PartialTokenKind::OpenParen, start);
            } else if ch == ')' {
                self.position += 1;
                self.push(PartialTokenKind::CloseParen, start);
            } else if self.at_or() {
                self.position += 2;
                self.push(PartialTokenKind::Or, start);
            } else if let Some(quote) = QuoteKind::from_char(ch) {
                self.scan_literal(quote)?;
                self.push(PartialTokenKind::Verbatim, start);
            } else {
                let len = self.rest().find(is_boundary).unwrap_or(self.rest().len());
                self.position += len;
                self.push(PartialTokenKind::Verbatim, start);
            }
        }
        Ok(self.tokens)
    }

    /// Consumes a whitespace run, emitting `And` unless a structural token absorbs it.
    fn scan_whitespace(&mut self) {
        let start = self.position;
        let len = self
            .rest()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.rest().len());
        self.position += len;

        let absorbed_before = matches!(
            self.tokens.last().map(|t| t.kind),
            Some(PartialTokenKind::OpenParen | PartialTokenKind::Or)
        );
        let absorbed_after = self.rest().starts_with(')') || self.at_or();
        if !absorbed_before && !absorbed_after {
            self.push(PartialTokenKind::And, start);
        }
    }

    /// Whether the word `or` starts here, bounded on both sides.
    fn at_or(&self) -> bool {
        let rest = self.rest();
        let is_or = rest
            .get(..2)
            .is_some_and(|word| word.eq_ignore_ascii_case("or"));
        if !is_or {
            return false;
        }

        let bounded_after = rest[2..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | ')'));
        let bounded_before = self.text[..self.position]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | ')'));
        bounded_before && bounded_after
    }

    /// Consumes a quoted or regex span starting at the current position.
    fn scan_literal(&mut self, quote: QuoteKind) -> Result<(), LexError> {
        let start = self.position;
        let body = &self.rest()[1..];
        match body.find(quote.delimiter()) {
            Some(close) => {
                self.position += 1 + close + 1;
                Ok(())
            }
            None if self.mode == LexMode::Tolerant => {
                self.position = self.text.len();
                Ok(())
            }
            None => {
                let what = if quote == QuoteKind::Regex { "regex" } else { "quote" };
                Err(LexError::new(format!("unclosed {what}"), start, self.text))
            }
        }
    }

    /// Appends a token ending at the current position, merging touching verbatim chunks.
    fn push(&mut self, kind: PartialTokenKind, start: usize) {
        let end = self.position;
        if kind == PartialTokenKind::Verbatim {
            match self.tokens.last_mut() {
                Some(last) if last.kind == PartialTokenKind::Verbatim && last.range.end == start => {
                    last.range.end = end;
                    return;
                }
                _ => {}
            }
        }
        self.tokens.push(PartialToken {
            kind,
            range: start..end,
        });
    }
}

/// Tokenizes possibly incomplete text.
///
/// In [`LexMode::Strict`] an unclosed quote or regex is an error.
pub fn tokenize_partial(text: &str, mode: LexMode) -> Result<Vec<PartialToken>, LexError> {
    Scanner::new(text, mode).run()
}

/// Tokenizes text as it is being typed. Never fails.
pub fn tokenize_tolerant(text: &str) -> Vec<PartialToken> {
    // Tolerant mode has no error path.
    tokenize_partial(text, LexMode::Tolerant).unwrap_or_default()
}
