//! Structured form of a finder expression
//!
//! Every node renders back to its canonical spelling through `Display`. For a
//! well-formed expression the rendering of the whole tree equals the text it
//! was compiled from.

use std::fmt;
use std::num::NonZeroU32;

use finder_schema::{Property, TypeRef};
use finder_shared::naming::uncapitalize_first;
use serde::Serialize;

use crate::keywords::{
    CaseFolding, Direction, Operator, AND, BY, DISTINCT, OR, ORDER_BY,
};

/// A resolved, possibly nested, property reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRef {
    /// Properties traversed from the root entity to the leaf
    pub(crate) segments: Vec<Property>,
    /// Text consumed from the expression (`CustomerCity`)
    pub(crate) spelling: String,
    /// Whether the leaf itself points at another entity
    pub(crate) relation: bool,
}

impl PropertyRef {
    /// The leaf property; operator applicability is judged on it
    pub fn property(&self) -> &Property {
        // segments is never empty: a reference always matches at least one property
        &self.segments[self.segments.len() - 1]
    }

    /// The property of the root entity where the path starts
    pub fn root(&self) -> &Property {
        &self.segments[0]
    }

    /// Every property on the path, root first
    pub fn segments(&self) -> &[Property] {
        &self.segments
    }

    /// Property names on the path (`["customer", "city"]`)
    pub fn path(&self) -> Vec<&str> {
        self.segments.iter().map(Property::name).collect()
    }

    /// Canonical spelling inside an expression
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Whether the reference crosses at least one relation
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Whether the leaf is itself a relation to another entity
    pub fn is_relation(&self) -> bool {
        self.relation
    }

    /// Name used for a bound parameter (`customerCity`)
    pub fn parameter_name(&self) -> String {
        uncapitalize_first(&self.spelling)
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spelling)
    }
}

/// One filter term: property, operator and case folding
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Condition {
    pub(crate) property: Option<PropertyRef>,
    pub(crate) operator: Option<(Operator, &'static str)>,
    pub(crate) ignore_case: Option<&'static str>,
}

impl Condition {
    /// Resolved property, if any
    pub fn property(&self) -> Option<&PropertyRef> {
        self.property.as_ref()
    }

    /// Operator; [`Operator::Equals`] when none was written
    pub fn operator(&self) -> Operator {
        self.operator.map_or(Operator::Equals, |(op, _)| op)
    }

    /// Operator keyword as written, if any
    pub fn operator_keyword(&self) -> Option<&'static str> {
        self.operator.map(|(_, keyword)| keyword)
    }

    /// Case-folding marker as written, if any
    pub fn ignore_case_keyword(&self) -> Option<&'static str> {
        self.ignore_case
    }

    /// Case folding requested by this condition alone
    pub fn case_folding(&self) -> CaseFolding {
        if self.ignore_case.is_some() {
            CaseFolding::Always
        } else {
            CaseFolding::Never
        }
    }

    /// Whether the condition names a property
    pub fn is_complete(&self) -> bool {
        self.property.is_some()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(property) = &self.property else {
            return Ok(());
        };
        write!(f, "{property}")?;
        if let Some(keyword) = self.operator_keyword() {
            write!(f, "{keyword}")?;
        }
        if let Some(marker) = self.ignore_case {
            write!(f, "{marker}")?;
        }
        Ok(())
    }
}

/// Conditions joined by `And`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Conjunction {
    pub(crate) conditions: Vec<Condition>,
}

impl Conjunction {
    /// Conditions in written order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether every condition names a property
    pub fn is_complete(&self) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(Condition::is_complete)
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.conditions, AND)
    }
}

/// One property + direction pair of a sort clause
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SortTerm {
    pub(crate) property: Option<PropertyRef>,
    pub(crate) direction: Option<Direction>,
}

impl SortTerm {
    /// Property sorted on, if resolved
    pub fn property(&self) -> Option<&PropertyRef> {
        self.property.as_ref()
    }

    /// Explicit direction, if written
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

impl fmt::Display for SortTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(property) = &self.property else {
            return Ok(());
        };
        write!(f, "{property}")?;
        if let Some(direction) = self.direction {
            write!(f, "{direction}")?;
        }
        Ok(())
    }
}

/// The `OrderBy...` suffix
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OrderBy {
    pub(crate) terms: Vec<SortTerm>,
}

impl OrderBy {
    /// Sort terms in priority order
    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }

    /// Whether every term names a property
    pub fn is_complete(&self) -> bool {
        !self.terms.is_empty() && self.terms.iter().all(|t| t.property.is_some())
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ORDER_BY}")?;
        write_joined(f, &self.terms, "")
    }
}

/// Filter and sort part of an expression, everything after `By`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Predicate {
    pub(crate) groups: Vec<Conjunction>,
    pub(crate) all_ignore_case: Option<&'static str>,
    pub(crate) order_by: Option<OrderBy>,
}

impl Predicate {
    /// Conjunction groups joined by `Or`
    pub fn groups(&self) -> &[Conjunction] {
        &self.groups
    }

    /// Every condition, group by group
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.groups.iter().flat_map(|g| g.conditions.iter())
    }

    /// The condition being typed last, if any
    pub fn last_condition(&self) -> Option<&Condition> {
        self.groups.last().and_then(|g| g.conditions.last())
    }

    /// Sort clause, if present
    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    /// Whole-predicate case folding
    pub fn case_folding(&self) -> CaseFolding {
        if self.all_ignore_case.is_some() {
            CaseFolding::WhenPossible
        } else {
            CaseFolding::Never
        }
    }

    /// Whole-predicate case-folding marker as written, if any
    pub fn all_ignore_case_keyword(&self) -> Option<&'static str> {
        self.all_ignore_case
    }

    /// Whether the filter and sort clause satisfy the grammar.
    ///
    /// An empty filter is only complete when a sort clause follows it.
    pub fn is_complete(&self) -> bool {
        let filter_complete = if self.groups.is_empty() {
            self.order_by.is_some()
        } else {
            self.groups.iter().all(Conjunction::is_complete)
        };
        filter_complete && self.order_by.as_ref().map_or(true, OrderBy::is_complete)
    }

    /// Canonical filter text without the sort clause
    pub(crate) fn filter_text(&self) -> String {
        let mut text = self
            .groups
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(OR);
        if let Some(marker) = self.all_ignore_case {
            text.push_str(marker);
        }
        text
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter_text())?;
        if let Some(order_by) = &self.order_by {
            write!(f, "{order_by}")?;
        }
        Ok(())
    }
}

/// Leading query keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryKind {
    /// `find`
    Find,
    /// `read`
    Read,
    /// `query`
    Query,
    /// `count`
    Count,
}

impl QueryKind {
    /// All query kinds in suggestion order
    pub const ALL: [QueryKind; 4] = [
        QueryKind::Find,
        QueryKind::Read,
        QueryKind::Query,
        QueryKind::Count,
    ];

    /// Spelling at the start of an expression
    pub fn keyword(self) -> &'static str {
        match self {
            QueryKind::Find => "find",
            QueryKind::Read => "read",
            QueryKind::Query => "query",
            QueryKind::Count => "count",
        }
    }

    /// Look a query kind up by its spelling
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Whether the kind projects a count instead of entities
    pub fn is_count(self) -> bool {
        self == QueryKind::Count
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// `First` / `Top` marker with its optional cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limit {
    pub(crate) keyword: &'static str,
    pub(crate) cap: Option<NonZeroU32>,
}

impl Limit {
    /// Marker as written
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Explicit cap, if written
    pub fn cap(&self) -> Option<NonZeroU32> {
        self.cap
    }

    /// Maximum number of results; a bare marker means one
    pub fn max_results(&self) -> u32 {
        self.cap.map_or(1, NonZeroU32::get)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword)?;
        if let Some(cap) = self.cap {
            write!(f, "{cap}")?;
        }
        Ok(())
    }
}

/// Head of an expression, everything up to and including `By`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Subject {
    pub(crate) kind: Option<QueryKind>,
    pub(crate) distinct: bool,
    pub(crate) limit: Option<Limit>,
    pub(crate) projection: Option<PropertyRef>,
    pub(crate) complete: bool,
}

impl Subject {
    /// Query kind, if one was typed
    pub fn kind(&self) -> Option<QueryKind> {
        self.kind
    }

    /// `Distinct` marker present
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Result limit, if present
    pub fn limit(&self) -> Option<Limit> {
        self.limit
    }

    /// Projected property, if present
    pub fn projection(&self) -> Option<&PropertyRef> {
        self.projection.as_ref()
    }

    /// Whether the subject matched its grammar through the `By` delimiter
    pub fn is_complete(&self) -> bool {
        self.complete && self.kind.is_some()
    }

    /// Query kind plus markers, without projection or delimiter
    pub(crate) fn head(&self) -> String {
        let mut head = self.kind.map(QueryKind::keyword).unwrap_or_default().to_string();
        if self.distinct {
            head.push_str(DISTINCT);
        }
        if let Some(limit) = self.limit {
            head.push_str(&limit.to_string());
        }
        head
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_none() {
            return Ok(());
        }
        write!(f, "{}", self.head())?;
        if let Some(projection) = &self.projection {
            write!(f, "{projection}")?;
        }
        if self.complete {
            write!(f, "{BY}")?;
        }
        Ok(())
    }
}

/// One value bound by a finder method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinderParameter {
    /// Declared type of the bound value
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Parameter name, suffixed when a property is bound more than once
    pub name: String,
}

impl fmt::Display for FinderParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_ref, self.name)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{separator}")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
