//! Subject (query head) parsing

use std::num::NonZeroU32;

use crate::ast::{Limit, QueryKind, Subject};
use crate::error::{ParseError, Result};
use crate::keywords::{DISTINCT, FIRST, TOP};

use super::properties::Resolver;
use super::tokens::{LIMIT_PATTERN, SUBJECT_PATTERN};

/// Parse the subject at the start of `text`.
///
/// Returns the subject and the text following the `By` delimiter. When the
/// delimiter has not been typed yet the subject is incomplete and the
/// remainder is empty.
pub(crate) fn parse_subject<'t>(text: &'t str, resolver: &Resolver<'_>) -> Result<(Subject, &'t str)> {
    if let Some(caps) = SUBJECT_PATTERN.captures(text) {
        let kind = QueryKind::from_keyword(&caps[1]);
        let body = caps.get(2).map_or("", |m| m.as_str());
        let rest = caps.get(3).map_or("", |m| &text[m.end()..]);

        let mut subject = parse_body(kind, body, resolver)?;
        subject.complete = true;
        return Ok((subject, rest));
    }

    for kind in QueryKind::ALL {
        if let Some(body) = text.strip_prefix(kind.keyword()) {
            return Ok((parse_body(Some(kind), body, resolver)?, ""));
        }
    }

    Ok((Subject::default(), ""))
}

/// Parse `[Distinct][(First|Top)[N]][Property]` following the query kind
fn parse_body(kind: Option<QueryKind>, body: &str, resolver: &Resolver<'_>) -> Result<Subject> {
    let mut subject = Subject {
        kind,
        ..Subject::default()
    };

    if kind.is_some_and(QueryKind::is_count) {
        subject.projection = if body.is_empty() { None } else { resolver.resolve(body) };
        return Ok(subject);
    }

    let mut rest = body;
    if let Some(after) = rest.strip_prefix(DISTINCT) {
        subject.distinct = true;
        rest = after;
    }

    let mut limit_text = "";
    let mut limit_digits = None;
    if let Some(caps) = LIMIT_PATTERN.captures(rest) {
        let keyword = if &caps[1] == FIRST { FIRST } else { TOP };
        limit_text = caps.get(0).map_or("", |m| m.as_str());
        limit_digits = Some((keyword, caps.get(2).map_or("", |m| m.as_str())));
        rest = &rest[limit_text.len()..];
    }

    if !rest.is_empty() {
        subject.projection = resolver.resolve(rest);
    }

    // `TopScore` or `DistinctRegion` may be a property rather than a marker
    if subject.projection.is_none() && !rest.is_empty() {
        if limit_digits.is_some() {
            if let Some(property) = resolver.resolve(&format!("{limit_text}{rest}")) {
                subject.projection = Some(property);
                limit_digits = None;
            }
        }
        if subject.projection.is_none() && subject.distinct {
            if let Some(property) = resolver.resolve(&format!("{DISTINCT}{limit_text}{rest}")) {
                subject.projection = Some(property);
                subject.distinct = false;
                limit_digits = None;
            }
        }
    }

    if let Some((keyword, digits)) = limit_digits {
        subject.limit = Some(parse_limit(keyword, digits)?);
    }

    Ok(subject)
}

fn parse_limit(keyword: &'static str, digits: &str) -> Result<Limit> {
    if digits.is_empty() {
        return Ok(Limit { keyword, cap: None });
    }

    let value: u32 = digits.parse().map_err(|_| ParseError::InvalidLimit {
        digits: digits.to_string(),
    })?;
    let cap = NonZeroU32::new(value).ok_or(ParseError::ZeroLimit)?;
    Ok(Limit {
        keyword,
        cap: Some(cap),
    })
}
