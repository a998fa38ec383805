//! Understanding text while it is being typed.
//!
//! - [`lexer`] splits a buffer into structural tokens and verbatim chunks.
//! - [`term`] classifies one chunk as a [`PartialFilterTerm`].
//! - [`whitespace`] repairs separators inserted by auto-spacing.

pub mod lexer;
pub mod term;
pub mod whitespace;

pub use lexer::{LexMode, PartialToken, PartialTokenKind, tokenize_partial, tokenize_tolerant};
pub use term::{
    IncompleteComparison, PartialComparison, PartialContent, PartialFilterTerm, PartialText,
    Polarity,
};
pub use whitespace::remove_autoinserted_whitespace;
