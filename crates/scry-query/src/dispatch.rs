//! Choosing a parse path for raw filter text.

use serde::Serialize;
use tracing::debug;

use crate::{
    parser::parse_expression,
    partial::{PartialFilterTerm, PartialTokenKind, tokenize_tolerant},
    term::{FilterExpr, FilterTerm},
};

/// The result of interpreting a piece of filter text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "expr", rename_all = "snake_case")]
pub enum ParsedFilterOutcome {
    /// Nothing but whitespace.
    Empty,
    /// Parsed cleanly.
    Valid(FilterExpr),
    /// Parsed once an open quote or regex was treated as closed.
    AutoTerminated(FilterExpr),
    /// Not a well-formed filter; the whole text is searched as a name.
    Fallback(FilterExpr),
}

impl ParsedFilterOutcome {
    /// The expression, unless the text was empty.
    pub fn expr(&self) -> Option<&FilterExpr> {
        match self {
            Self::Empty => None,
            Self::Valid(expr) | Self::AutoTerminated(expr) | Self::Fallback(expr) => Some(expr),
        }
    }

    /// Consumes the outcome, returning its expression.
    pub fn into_expr(self) -> Option<FilterExpr> {
        match self {
            Self::Empty => None,
            Self::Valid(expr) | Self::AutoTerminated(expr) | Self::Fallback(expr) => Some(expr),
        }
    }

    /// Short lowercase label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Valid(_) => "valid",
            Self::AutoTerminated(_) => "auto-terminated",
            Self::Fallback(_) => "fallback",
        }
    }
}

/// Wraps `text` as a plain name search.
fn fallback(text: &str) -> ParsedFilterOutcome {
    ParsedFilterOutcome::Fallback(FilterTerm::name(text).into())
}

/// Interprets raw filter text.
///
/// Text starting with `(` or `-(` must parse strictly as a group; anything malformed there
/// falls back to a name search over the whole text rather than being reinterpreted as a
/// single term. Everything else goes through the partial term model, first as typed and then
/// with open quotes closed. Never fails.
pub fn dispatch(text: &str) -> ParsedFilterOutcome {
    let text = text.trim();
    if text.is_empty() {
        return ParsedFilterOutcome::Empty;
    }

    let starts_group = tokenize_tolerant(text)
        .first()
        .is_some_and(|t| t.kind == PartialTokenKind::OpenParen);
    if starts_group {
        return match parse_expression(text) {
            Ok(expr) => ParsedFilterOutcome::Valid(expr),
            Err(err) => {
                debug!(text, error = err.message(), "group did not parse, searching as a name");
                fallback(text)
            }
        };
    }

    let term = PartialFilterTerm::parse(text);
    if let Some(complete) = term.to_complete() {
        return ParsedFilterOutcome::Valid(complete.into());
    }
    if let Some(complete) = term.to_complete_autoterminated() {
        debug!(text, "closed an open quote to complete the filter");
        return ParsedFilterOutcome::AutoTerminated(complete.into());
    }

    debug!(text, "not a complete filter, searching as a name");
    fallback(text)
}
