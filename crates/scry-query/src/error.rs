//! Error types for the strict query path.
//!
//! Only the strict tokenizer and parser produce errors. The partial term model signals
//! "not yet promotable" with `None`, and the dispatcher recovers from every strict failure.

use std::{error::Error, fmt};

/// Tokenizer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where the error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new tokenizer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a caret under the offending position.
    pub fn format_with_context(&self) -> String {
        let clamped = self.position.min(self.input.len());
        let column = self
            .input
            .get(..clamped)
            .map_or(clamped, |s| s.chars().count());
        let mut result = String::new();
        result.push_str(&format!("filter syntax error: {}\n", self.message));
        result.push_str(&format!("  {}\n", self.input));
        result.push_str(&format!("  {}^", " ".repeat(column)));
        result
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl Error for LexError {}

/// Grammar error with an optional byte position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte position of the offending token, when there is one.
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = self.position {
            write!(f, "at byte {}: {}", position, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl Error for ParseError {}

/// A unified error for strict parsing, carrying the query text for context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string.
    pub query: String,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Unmatched quote, slash or parenthesis, or an unexpected character.
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// Grammar violation.
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input, if known.
        position: Option<usize>,
    },
}

impl QueryError {
    /// Wraps a parse error together with the query it came from.
    pub fn from_parse(err: ParseError, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: err.message,
                position: err.position,
            },
            query: query.into(),
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Parse { message, .. } => message,
        }
    }

    /// Byte position of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
        }
    }

    /// Returns a hint for common mistakes.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unclosed quote") {
            Some("Add a closing quote to complete the value")
        } else if message.contains("unclosed regex") {
            Some("Close the regular expression with '/'")
        } else if message.contains("nested") {
            Some("Groups cannot contain other groups; list the filters in one group")
        } else if message.contains("unknown filter key") {
            Some("Run 'scry keys' to list the recognized filter keys")
        } else if message.contains("'or'") {
            Some("'or' needs a filter on both sides, e.g. '(t:instant or t:sorcery)'")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "filter syntax error: {}", self.message())?;
        writeln!(f, "  {}", self.query)?;
        if let Some(position) = self.position() {
            let clamped = position.min(self.query.len());
            let column = self.query.get(..clamped).map_or(clamped, |s| s.chars().count());
            writeln!(f, "  {}^", " ".repeat(column))?;
        }
        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: err.input,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            position: Some(err.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::from(LexError::new("unclosed quote", 5, "name:\"bolt"));
        let display = err.to_string();
        assert!(display.contains("unclosed quote"));
        assert!(display.contains("name:\"bolt"));
        assert!(display.contains("     ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn parse_error_keeps_position() {
        let err = QueryError::from_parse(
            ParseError::new("unknown filter key 'zz'", Some(1)),
            "(zz:1)",
        );
        assert_eq!(err.position(), Some(1));
        assert!(err.suggestion().unwrap().contains("scry keys"));
    }

    #[test]
    fn or_error_suggestion() {
        let err = QueryError::from_parse(
            ParseError::new("expected a filter after 'or'", None),
            "(a or)",
        );
        assert!(err.suggestion().unwrap().contains("both sides"));
    }

    #[test]
    fn format_with_context_counts_characters() {
        let err = LexError::new("unexpected character", 3, "é+x");
        assert!(err.format_with_context().ends_with("  ^"));
    }

    #[test]
    fn message_extraction() {
        let err = QueryError::from(LexError::new("test message", 0, "query"));
        assert_eq!(err.message(), "test message");
    }
}
