//! Finder expression parsing
//!
//! Parsing runs top-down: the subject is matched first, then the predicate is
//! split into its sort clause, `Or` groups, `And` conditions and finally
//! property/operator/case-folding parts. Property names are resolved through
//! a compile-local [`Resolver`](properties::Resolver).

mod condition;
mod predicate;
pub(crate) mod properties;
mod subject;
pub(crate) mod tokens;

use finder_shared::naming::starts_with_upper;

use crate::keywords::{Direction, ALL_IGNORE_CASE, AND, OR, ORDER_BY};

pub(crate) use predicate::parse_predicate;
pub(crate) use properties::Resolver;
pub(crate) use subject::parse_subject;

use tokens::{
    keyword_positions, split_after_directions, split_keyword, strip_marker, SUBJECT_PATTERN,
    ZERO_LIMIT_PATTERN,
};

/// Grammar-only check of a complete expression, without any schema.
///
/// Every condition and sort term must be a non-empty camel-case word, limits
/// must be positive and at most one sort clause may appear.
pub(crate) fn check_shape(text: &str) -> bool {
    let Some(caps) = SUBJECT_PATTERN.captures(text) else {
        return false;
    };
    let body = caps.get(2).map_or("", |m| m.as_str());
    if ZERO_LIMIT_PATTERN.is_match(body) {
        return false;
    }
    let Some(delimiter) = caps.get(3) else {
        return false;
    };
    let predicate = &text[delimiter.end()..];

    let markers = keyword_positions(predicate, ORDER_BY);
    let (filter, sort) = match markers.as_slice() {
        [] => (predicate, None),
        [at] => (&predicate[..*at], Some(&predicate[at + ORDER_BY.len()..])),
        _ => return false,
    };

    let filter = match strip_marker(filter, &ALL_IGNORE_CASE) {
        ("", _) => filter,
        (stripped, _) => stripped,
    };

    if filter.is_empty() {
        if sort.is_none() {
            return false;
        }
    } else {
        let words_ok = split_keyword(filter, OR)
            .into_iter()
            .flat_map(|group| split_keyword(group, AND))
            .all(starts_with_upper);
        if !words_ok {
            return false;
        }
    }

    match sort {
        None => true,
        Some(sort) => {
            let terms = split_after_directions(sort);
            !terms.is_empty()
                && terms
                    .into_iter()
                    .all(|term| starts_with_upper(Direction::strip_suffix(term).0))
        }
    }
}
