//! Filter predicates and sort clauses

use crate::ast::{Conjunction, OrderBy, Predicate, SortTerm};
use crate::error::{ParseError, Result};
use crate::keywords::{Direction, ALL_IGNORE_CASE, AND, OR, ORDER_BY};

use super::condition::parse_conjunction;
use super::properties::Resolver;
use super::tokens::{keyword_positions, split_after_directions, split_keyword, strip_marker};

/// Parse everything after the `By` delimiter.
///
/// `OrderBy` is tried as the sort-clause marker first. When that leaves an
/// unfinished condition in front of it, the whole text is parsed again as a
/// filter so that a property spelled `Order...` can still resolve.
pub(crate) fn parse_predicate(text: &str, resolver: &Resolver<'_>) -> Result<Predicate> {
    let markers = keyword_positions(text, ORDER_BY);
    if markers.len() > 1 {
        return Err(ParseError::MultipleOrderBy {
            count: markers.len(),
        });
    }

    let Some(&at) = markers.first() else {
        return parse_filter(text, resolver, false);
    };

    let filter_text = &text[..at];
    let sort_text = &text[at + ORDER_BY.len()..];

    match parse_filter(filter_text, resolver, true) {
        Ok(mut predicate) => {
            predicate.order_by = Some(parse_order_by(sort_text, resolver)?);
            Ok(predicate)
        }
        Err(err @ ParseError::IncompleteBeforeOrderBy { .. }) => {
            match parse_filter(text, resolver, false) {
                Ok(predicate) if predicate.last_condition().is_some_and(|c| c.is_complete()) => {
                    log::trace!("'{text}' resolved with OrderBy as part of a property");
                    Ok(predicate)
                }
                _ => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

/// Parse the `Or`-joined filter part, with an optional trailing
/// whole-predicate case-folding marker
fn parse_filter(text: &str, resolver: &Resolver<'_>, sorted: bool) -> Result<Predicate> {
    let text = if sorted {
        text
    } else {
        strip_typed_join(text, resolver)
    };

    let (body, all_ignore_case) = match strip_marker(text, &ALL_IGNORE_CASE) {
        ("", _) => (text, None),
        stripped => stripped,
    };

    if body.is_empty() {
        return Ok(Predicate {
            groups: Vec::new(),
            all_ignore_case,
            order_by: None,
        });
    }

    let pieces = split_keyword(body, OR);
    let last = pieces.len() - 1;

    let mut groups: Vec<Conjunction> = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        if i < last && piece.is_empty() {
            return Err(ParseError::DanglingOr {
                fragment: body.to_string(),
            });
        }

        let group = parse_conjunction(piece, resolver)?;
        // `NameAndOrAge`: the join before `Or` has nothing on its right
        if i < last && group.conditions.len() > 1 && !group.is_complete() {
            return Err(ParseError::DanglingAnd {
                fragment: piece.to_string(),
            });
        }
        groups.push(group);
    }

    let predicate = Predicate {
        groups,
        all_ignore_case,
        order_by: None,
    };

    if sorted && !predicate.last_condition().is_some_and(|c| c.is_complete()) {
        return Err(ParseError::IncompleteBeforeOrderBy {
            fragment: text.to_string(),
        });
    }

    Ok(predicate)
}

/// Drop a join keyword that ends the text in a property position when it
/// also starts a property name, so `AndAnd` reads as `And` plus the first
/// letters of `android`
fn strip_typed_join<'t>(text: &'t str, resolver: &Resolver<'_>) -> &'t str {
    for keyword in [AND, OR] {
        let Some(head) = text.strip_suffix(keyword) else {
            continue;
        };
        let in_slot = head.is_empty() || head.ends_with(AND) || head.ends_with(OR);
        if in_slot && resolver.is_property_prefix(keyword) {
            log::trace!("'{keyword}' at the end of '{text}' read as a property being typed");
            return head;
        }
    }
    text
}

/// Parse the terms following `OrderBy`
pub(crate) fn parse_order_by(text: &str, resolver: &Resolver<'_>) -> Result<OrderBy> {
    let pieces = split_after_directions(text);
    if pieces.is_empty() {
        return Ok(OrderBy {
            terms: vec![SortTerm::default()],
        });
    }

    let last = pieces.len() - 1;
    let mut terms = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        let (name, direction) = Direction::strip_suffix(piece);
        let property = resolver.resolve(name);
        if let (Some(direction), None) = (direction, &property) {
            // `Desc` on the way to `Description`
            if i == last && resolver.is_property_prefix(piece) {
                terms.push(SortTerm::default());
                continue;
            }
            return Err(ParseError::DirectionWithoutProperty {
                direction: direction.to_string(),
                fragment: piece.to_string(),
            });
        }
        terms.push(SortTerm {
            property,
            direction,
        });
    }

    Ok(OrderBy { terms })
}
