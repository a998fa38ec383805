//! Case-insensitive substring matching over rendered candidates.
//!
//! Ranges are in characters, not bytes, so they can be used directly for highlighting.

use std::ops::Range;

use crate::suggestion::PrefixKind;

/// Compares two characters ignoring case.
fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Finds the first case-insensitive occurrence of `needle` in `haystack`.
///
/// An empty needle matches at the start.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let hay: Vec<char> = haystack.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    let last_start = hay.len().checked_sub(needle.len())?;

    (0..=last_start)
        .find(|&start| {
            hay[start..start + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(&a, &b)| chars_eq_ignore_case(a, b))
        })
        .map(|start| start..start + needle.len())
}

/// Number of leading marker characters: an optional `-`, an optional `!`, then an optional
/// opening quote or slash.
pub fn content_start(rendered: &str) -> usize {
    let mut chars = rendered.chars().peekable();
    let mut count = 0;
    for marker in ['-', '!'] {
        if chars.next_if_eq(&marker).is_some() {
            count += 1;
        }
    }
    if chars.next_if(|c| matches!(c, '"' | '\'' | '/')).is_some() {
        count += 1;
    }
    count
}

/// Classifies a match found directly in a rendered candidate.
pub fn classify(rendered: &str, range: &Range<usize>) -> PrefixKind {
    let start = content_start(rendered);
    if range.start == 0 {
        PrefixKind::Actual
    } else if range.start == start {
        PrefixKind::Effective
    } else {
        PrefixKind::None
    }
}

/// Shifts a character range right by `offset`.
pub fn shifted(range: Range<usize>, offset: usize) -> Range<usize> {
    range.start + offset..range.end + offset
}
