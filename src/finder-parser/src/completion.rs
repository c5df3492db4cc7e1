//! Completion candidates for partially typed expressions
//!
//! Every candidate is a full expression string: the canonical text of what has
//! been resolved so far followed by one continuation. Callers can therefore
//! replace the typed text in place.
//!
//! `First`/`Top` are still offered after `Distinct`, since `findDistinctTop3By`
//! parses; `Distinct` is not offered once a limit is present.

use finder_schema::Property;
use finder_shared::naming::{capitalize_first, uncapitalize_first};
use indexmap::IndexSet;

use crate::ast::{Condition, Predicate, PropertyRef, QueryKind, SortTerm, Subject};
use crate::keywords::{
    lookup_operators, Direction, ALL_IGNORE_CASE, AND, BY, DISTINCT, FIRST, IGNORE_CASE, OR,
    ORDER_BY, TOP,
};
use crate::parser::Resolver;

/// Ordered, de-duplicated candidate list
#[derive(Default)]
struct Candidates(IndexSet<String>);

impl Candidates {
    fn push(&mut self, candidate: String) {
        self.0.insert(candidate);
    }

    fn extend<'p>(&mut self, prefix: &str, properties: impl IntoIterator<Item = &'p Property>) {
        for property in properties {
            self.push(format!("{prefix}{}", capitalize_first(property.name())));
        }
    }
}

/// Continuations for an expression parsed into `subject` and `predicate`
pub(crate) fn suggest(subject: &Subject, predicate: &Predicate, resolver: &Resolver<'_>) -> Vec<String> {
    let mut out = Candidates::default();
    if subject.is_complete() {
        suggest_predicate(&mut out, &subject.to_string(), predicate, resolver);
    } else {
        suggest_subject(&mut out, subject, resolver);
    }
    out.0.into_iter().collect()
}

fn suggest_subject(out: &mut Candidates, subject: &Subject, resolver: &Resolver<'_>) {
    let Some(kind) = subject.kind() else {
        for kind in QueryKind::ALL {
            out.push(kind.keyword().to_string());
        }
        return;
    };

    let head = subject.head();
    let mut base = head.clone();
    if let Some(projection) = subject.projection() {
        base.push_str(projection.spelling());
    }
    out.push(format!("{base}{BY}"));

    if subject.projection().is_some() {
        return;
    }

    let root = resolver.root();
    let root = root.as_deref().unwrap_or_default();
    out.extend(&head, root);

    if kind.is_count() {
        return;
    }
    if !subject.is_distinct() && subject.limit().is_none() {
        out.push(format!("{head}{DISTINCT}"));
    }
    if subject.limit().is_none() {
        out.push(format!("{head}{FIRST}"));
        out.push(format!("{head}{TOP}"));
    }

    // `findDistinct` typed, but `distinctRegion` was meant
    if subject.is_distinct() && subject.limit().is_none() {
        let marker = uncapitalize_first(DISTINCT);
        for property in root {
            if let Some(stripped) = property.name().strip_prefix(marker.as_str()) {
                if !stripped.is_empty() {
                    out.push(format!("{head}{}", capitalize_first(stripped)));
                }
            }
        }
    }
}

fn suggest_predicate(out: &mut Candidates, subject: &str, predicate: &Predicate, resolver: &Resolver<'_>) {
    if let Some(order_by) = predicate.order_by() {
        let sorted = format!("{subject}{}{ORDER_BY}", predicate.filter_text());
        suggest_sort(out, &sorted, order_by.terms(), resolver);
        return;
    }

    let full = format!("{subject}{}", predicate.filter_text());
    let last_resolved = predicate
        .last_condition()
        .is_some_and(|condition| condition.property().is_some());
    if predicate.all_ignore_case_keyword().is_some() && last_resolved {
        out.push(full.clone());
        out.push(format!("{full}{ORDER_BY}"));
        return;
    }

    let root = resolver.root();
    let root = root.as_deref().unwrap_or_default();
    let groups = predicate.groups();
    let earlier: Vec<String> = groups
        .iter()
        .take(groups.len().saturating_sub(1))
        .map(ToString::to_string)
        .collect();
    let siblings: &[Condition] = groups
        .last()
        .and_then(|group| group.conditions().split_last())
        .map(|(_, siblings)| siblings)
        .unwrap_or_default();

    let mut prefix = subject.to_string();
    if !earlier.is_empty() {
        prefix.push_str(&earlier.join(OR));
        prefix.push_str(OR);
    }
    for sibling in siblings {
        prefix.push_str(&sibling.to_string());
        prefix.push_str(AND);
    }

    let resolved = predicate
        .last_condition()
        .and_then(|condition| condition.property().map(|property| (condition, property)));
    let Some((condition, property)) = resolved else {
        let used: Vec<&str> = siblings
            .iter()
            .filter_map(|c| c.property().map(|p| p.root().name()))
            .collect();
        out.extend(&prefix, root.iter().filter(|p| !used.contains(&p.name())));

        // `NameOr` may still become `NameOrderBy`
        if !earlier.is_empty() && siblings.is_empty() {
            out.push(format!("{subject}{}{ORDER_BY}", earlier.join(OR)));
        }
        return;
    };

    out.push(full.clone());
    out.push(format!("{full}{ORDER_BY}"));
    out.push(format!("{full}{AND}"));
    out.push(format!("{full}{OR}"));
    for marker in ALL_IGNORE_CASE {
        out.push(format!("{full}{marker}"));
    }

    if condition.ignore_case_keyword().is_some() {
        return;
    }

    let base = format!("{prefix}{}", property.spelling());
    let typed = condition.operator_keyword();
    for operator in lookup_operators(property.property().category()) {
        for keyword in operator.keywords() {
            let extends = typed.map_or(true, |t| keyword.len() > t.len() && keyword.starts_with(t));
            if extends {
                out.push(format!("{base}{keyword}"));
            }
        }
    }

    if property.property().is_textual() {
        for marker in IGNORE_CASE {
            out.push(format!("{full}{marker}"));
        }
    }

    if typed.is_none() {
        suggest_related(out, &base, property, resolver);

        // `Name` may still become `NameCode`
        let spelled = uncapitalize_first(property.spelling());
        out.extend(
            &prefix,
            root.iter()
                .filter(|p| p.name().len() > spelled.len() && p.name().starts_with(spelled.as_str())),
        );
    }
}

fn suggest_sort(out: &mut Candidates, sorted: &str, terms: &[SortTerm], resolver: &Resolver<'_>) {
    let root = resolver.root();
    let root = root.as_deref().unwrap_or_default();
    let Some((last, earlier)) = terms.split_last() else {
        out.extend(sorted, root);
        return;
    };

    let prefix = format!(
        "{sorted}{}",
        earlier.iter().map(ToString::to_string).collect::<String>()
    );
    let mut used: Vec<&str> = earlier
        .iter()
        .filter_map(|t| t.property().map(PropertyRef::spelling))
        .collect();

    let Some(property) = last.property() else {
        out.extend(&prefix, root.iter().filter(|p| !used.contains(&capitalize_first(p.name()).as_str())));
        return;
    };

    let full = format!("{prefix}{property}");
    match last.direction() {
        None => {
            out.push(full.clone());
            for direction in Direction::ALL {
                out.push(format!("{full}{direction}"));
            }
            suggest_related(out, &full, property, resolver);
        }
        Some(direction) => {
            let full = format!("{full}{direction}");
            out.push(full.clone());
            used.push(property.spelling());
            out.extend(&full, root.iter().filter(|p| !used.contains(&capitalize_first(p.name()).as_str())));
        }
    }
}

fn suggest_related(out: &mut Candidates, base: &str, property: &PropertyRef, resolver: &Resolver<'_>) {
    if !resolver.can_descend(property) {
        return;
    }
    if let Some(related) = resolver.related(property.property()) {
        out.extend(base, related.iter());
    }
}
