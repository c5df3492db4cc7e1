//! Camel-case tokenizing helpers
//!
//! A keyword only counts when the character after it is upper-case or the
//! text ends there, so `And` never splits `Android` and `Asc` never splits
//! `Ascent`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::Direction;

/// Query kind, anything up to the first `By` that is followed by a new word
/// or the end of input, and the delimiter itself.
pub(crate) static SUBJECT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(find|read|query|count)(\p{Lu}.*?)??(By)(?:\p{Lu}|$)")
        .expect("Failed to compile subject pattern")
});

/// Result-limiting marker at the start of the subject body
pub(crate) static LIMIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(First|Top)(\d*)").expect("Failed to compile limit pattern")
});

/// Zero-valued limit anywhere a limit may appear
pub(crate) static ZERO_LIMIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Distinct)?(?:First|Top)0+(?:\D|$)")
        .expect("Failed to compile zero-limit pattern")
});

/// Whether a keyword ending at byte `at` stands on its own
pub(crate) fn at_boundary(text: &str, at: usize) -> bool {
    text[at..].chars().next().map_or(true, char::is_uppercase)
}

/// Byte offsets of every boundary-respecting occurrence of `keyword`
pub(crate) fn keyword_positions(text: &str, keyword: &str) -> Vec<usize> {
    text.match_indices(keyword)
        .filter(|(at, _)| at_boundary(text, at + keyword.len()))
        .map(|(at, _)| at)
        .collect()
}

/// Split `text` on `keyword`, keeping empty pieces
pub(crate) fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for at in keyword_positions(text, keyword) {
        pieces.push(&text[start..at]);
        start = at + keyword.len();
    }
    pieces.push(&text[start..]);
    pieces
}

/// Strip one of `markers` from the end of `text`
pub(crate) fn strip_marker<'a>(
    text: &'a str,
    markers: &[&'static str],
) -> (&'a str, Option<&'static str>) {
    markers
        .iter()
        .find_map(|&marker| text.strip_suffix(marker).map(|head| (head, Some(marker))))
        .unwrap_or((text, None))
}

/// Split a sort clause into terms, cutting after each direction keyword
pub(crate) fn split_after_directions(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = Direction::ALL
        .iter()
        .flat_map(|direction| {
            let keyword = direction.keyword();
            keyword_positions(text, keyword)
                .into_iter()
                .map(move |at| at + keyword.len())
        })
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cuts {
        pieces.push(&text[start..cut]);
        start = cut;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}
