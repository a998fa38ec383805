//! Undoing separators inserted by text-input auto-spacing.
//!
//! After a completed `key:` is inserted, many input widgets add a space. Whatever the user
//! types next then lands in a new term instead of the value. [`remove_autoinserted_whitespace`]
//! finds that shape and glues the fragment back onto the key.

use std::ops::Range;

use crate::partial::{
    lexer::{PartialToken, PartialTokenKind, tokenize_tolerant},
    term::{PartialContent, PartialFilterTerm, PartialText},
};

/// Whether `text` is a key with a complete operator and nothing after it.
fn is_dangling_key(text: &str) -> bool {
    matches!(
        PartialFilterTerm::parse(text).content,
        PartialContent::Filter {
            comparison,
            value: PartialText::Bare { text: ref value },
            ..
        } if comparison.complete().is_some() && value.is_empty()
    )
}

/// Whether `text` is a positive, non-literal name still being typed.
fn is_name_fragment(text: &str) -> bool {
    let term = PartialFilterTerm::parse(text);
    !term.polarity.is_negative()
        && matches!(
            term.content,
            PartialContent::Name {
                literal_match: false,
                text: PartialText::Bare { .. } | PartialText::Unterminated { .. },
            }
        )
}

/// Moves one selection boundary to account for deleting `removed`.
fn shift(boundary: usize, removed: &Range<usize>) -> usize {
    if boundary >= removed.end {
        boundary - removed.len()
    } else if boundary > removed.start {
        removed.start
    } else {
        boundary
    }
}

/// Finds the separators to delete, in buffer order.
fn autoinserted_separators(text: &str, tokens: &[PartialToken]) -> Vec<Range<usize>> {
    tokens
        .windows(3)
        .filter(|w| {
            w[0].kind == PartialTokenKind::Verbatim
                && w[1].kind == PartialTokenKind::And
                && w[2].kind == PartialTokenKind::Verbatim
                && is_dangling_key(w[0].text(text))
                && is_name_fragment(w[2].text(text))
        })
        .map(|w| w[1].range.clone())
        .collect()
}

/// Deletes separators stranded between a completed `key<op>` and the value being typed.
///
/// `selection` is a byte range into `text`. Returns the edited text and the selection moved
/// to match: a boundary inside a deleted separator collapses to its start, and a boundary at
/// or past its end shifts left by its length. Text without the pattern is returned unchanged.
pub fn remove_autoinserted_whitespace(text: &str, selection: Range<usize>) -> (String, Range<usize>) {
    let tokens = tokenize_tolerant(text);
    let mut edited = text.to_string();
    let mut selection = selection;

    // Back to front, so earlier ranges stay valid.
    for removed in autoinserted_separators(text, &tokens).into_iter().rev() {
        edited.replace_range(removed.clone(), "");
        selection = shift(selection.start, &removed)..shift(selection.end, &removed);
    }

    (edited, selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glues_value_back_onto_key() {
        let (text, selection) = remove_autoinserted_whitespace("format: modern", 14..14);
        assert_eq!(text, "format:modern");
        assert_eq!(selection, 13..13);
    }

    #[test]
    fn selection_inside_separator_collapses_to_start() {
        let (text, selection) = remove_autoinserted_whitespace("f:  mod", 3..4);
        assert_eq!(text, "f:mod");
        assert_eq!(selection, 2..2);
    }

    #[test]
    fn selection_before_separator_is_untouched() {
        let (_, selection) = remove_autoinserted_whitespace("f: mod", 0..2);
        assert_eq!(selection, 0..2);
    }

    #[test]
    fn selection_spanning_separator() {
        let (_, selection) = remove_autoinserted_whitespace("f: mod", 1..5);
        assert_eq!(selection, 1..4);
    }

    #[test]
    fn unterminated_fragment_is_glued() {
        let (text, _) = remove_autoinserted_whitespace("name: \"Light", 12..12);
        assert_eq!(text, "name:\"Light");
    }

    #[test]
    fn resolved_value_is_left_alone() {
        let input = "format:modern bolt";
        let (text, selection) = remove_autoinserted_whitespace(input, 18..18);
        assert_eq!(text, input);
        assert_eq!(selection, 18..18);
    }

    #[test]
    fn incomplete_operator_is_left_alone() {
        let (text, _) = remove_autoinserted_whitespace("c! r", 4..4);
        assert_eq!(text, "c! r");
    }

    #[test]
    fn negative_or_filter_fragment_is_left_alone() {
        assert_eq!(remove_autoinserted_whitespace("f: -mod", 7..7).0, "f: -mod");
        assert_eq!(remove_autoinserted_whitespace("f: c:red", 8..8).0, "f: c:red");
        assert_eq!(remove_autoinserted_whitespace("f: !Opt", 7..7).0, "f: !Opt");
    }

    #[test]
    fn multiple_matches_shift_cumulatively() {
        let (text, selection) = remove_autoinserted_whitespace("f: a t: b", 9..9);
        assert_eq!(text, "f:a t:b");
        assert_eq!(selection, 7..7);
    }
}
