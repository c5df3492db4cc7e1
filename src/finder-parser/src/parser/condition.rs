//! Single conditions and `And`-joined groups

use crate::ast::{Condition, Conjunction};
use crate::error::{ParseError, Result};
use crate::keywords::{extract_operator, AND, IGNORE_CASE};

use super::properties::Resolver;
use super::tokens::{split_keyword, strip_marker};

/// Parse one condition fragment such as `LastNameStartingWithIgnoreCase`.
///
/// An unknown property leaves the condition empty. The only error is a
/// case-folding marker on a property that is not text.
pub(crate) fn parse_condition(fragment: &str, resolver: &Resolver<'_>) -> Result<Condition> {
    let (body, marker) = strip_marker(fragment, &IGNORE_CASE);

    let Some(property) = resolver.resolve(body) else {
        return Ok(Condition::default());
    };

    let leaf = property.property();
    if marker.is_some() && !leaf.is_textual() {
        return Err(ParseError::IgnoreCaseNotSupported {
            property: property.spelling().to_string(),
            type_name: leaf.declared_type().to_string(),
        });
    }

    let remaining = body.get(property.spelling().len()..).unwrap_or_default();
    let (operator, keyword) = extract_operator(remaining, leaf.category());

    Ok(Condition {
        operator: keyword.map(|keyword| (operator, keyword)),
        property: Some(property),
        ignore_case: marker,
    })
}

/// Parse an `And`-joined group. Every condition but the last must resolve.
pub(crate) fn parse_conjunction(fragment: &str, resolver: &Resolver<'_>) -> Result<Conjunction> {
    let pieces = split_keyword(fragment, AND);
    let last = pieces.len() - 1;

    let mut conditions = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        let condition = parse_condition(piece, resolver)?;
        if i < last && !condition.is_complete() {
            return Err(ParseError::DanglingAnd {
                fragment: fragment.to_string(),
            });
        }
        conditions.push(condition);
    }

    Ok(Conjunction { conditions })
}
