//! Filter query language for a card catalog.
//!
//! The language combines plain name searches with keyed filters:
//!
//! - **Names**: `bolt`, `"Lightning Bolt"`, `/^light/` - substring, phrase or regex
//! - **Literal names**: `!Opt` - exact match instead of substring
//! - **Filters**: `c:red`, `mv>=3`, `o:/draw.*card/` - key, comparison, value
//! - **Negation**: `-is:foil`, `-!Opt`
//! - **Alternatives**: `(t:instant or t:sorcery)`, `-(c:red c:blue)`
//!
//! Complete text goes through [`parse_expression`]. Text that is still being typed goes
//! through [`PartialFilterTerm`], and [`dispatch`] picks between the two.
//!
//! # Example
//!
//! ```
//! use scry_query::{ParsedFilterOutcome, dispatch, parse_expression};
//!
//! let expr = parse_expression("-(t:instant or t:sorcery)").unwrap();
//! assert_eq!(expr.to_string(), "-(t:instant or t:sorcery)");
//!
//! let outcome = dispatch("name:\"Lightning");
//! assert!(matches!(outcome, ParsedFilterOutcome::AutoTerminated(_)));
//! ```

#![warn(missing_docs)]

mod dispatch;
mod error;
mod lexer;
mod parser;
pub mod partial;
mod term;
mod vocabulary;

pub use dispatch::{ParsedFilterOutcome, dispatch};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{parse_expression, parse_expression_with};
pub use partial::{
    IncompleteComparison, LexMode, PartialComparison, PartialContent, PartialFilterTerm,
    PartialText, PartialToken, PartialTokenKind, Polarity, remove_autoinserted_whitespace,
    tokenize_partial, tokenize_tolerant,
};
pub use term::{Comparison, FilterExpr, FilterTerm, FilterValue, QuoteKind, is_word_char};
pub use vocabulary::{FilterKeyDescriptor, OperatorClass, Vocabulary};
