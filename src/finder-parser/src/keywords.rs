//! Keyword and operator tables
//!
//! Every token of the finder grammar that is not a property name lives here:
//! the structural keywords, the comparison operators with their spellings,
//! arity and applicable type categories, and the sort-direction and
//! case-folding enums.

use std::fmt;

use finder_schema::TypeCategory;
use serde::Serialize;

/// Separates the subject from the predicate
pub const BY: &str = "By";
/// Subject marker requesting distinct results
pub const DISTINCT: &str = "Distinct";
/// Result-limiting subject marker
pub const FIRST: &str = "First";
/// Result-limiting subject marker
pub const TOP: &str = "Top";
/// Joins conditions inside a conjunction group
pub const AND: &str = "And";
/// Joins conjunction groups
pub const OR: &str = "Or";
/// Introduces the sort clause
pub const ORDER_BY: &str = "OrderBy";
/// Per-condition case-folding marker spellings
pub const IGNORE_CASE: [&str; 2] = ["IgnoreCase", "IgnoringCase"];
/// Whole-predicate case-folding marker spellings
pub const ALL_IGNORE_CASE: [&str; 2] = ["AllIgnoreCase", "AllIgnoringCase"];

const ANY: &[TypeCategory] = &[
    TypeCategory::Text,
    TypeCategory::Boolean,
    TypeCategory::Temporal,
    TypeCategory::Numeric,
    TypeCategory::Spatial,
    TypeCategory::Other,
];
const NON_BOOLEAN: &[TypeCategory] = &[
    TypeCategory::Text,
    TypeCategory::Temporal,
    TypeCategory::Numeric,
    TypeCategory::Spatial,
    TypeCategory::Other,
];
const ORDERED: &[TypeCategory] = &[TypeCategory::Numeric, TypeCategory::Temporal];
const TEMPORAL: &[TypeCategory] = &[TypeCategory::Temporal];
const TEXT: &[TypeCategory] = &[TypeCategory::Text];
const BOOLEAN: &[TypeCategory] = &[TypeCategory::Boolean];
const SPATIAL: &[TypeCategory] = &[TypeCategory::Spatial];

/// Static description of one operator
#[derive(Debug)]
pub struct OperatorSpec {
    /// Number of values the operator binds
    pub arity: usize,
    /// Spellings; the first is the qualified one, the rest are aliases
    pub keywords: &'static [&'static str],
    /// Type categories the operator applies to
    pub categories: &'static [TypeCategory],
}

/// Comparison applied to a property inside a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// Value lies between two bounds
    Between,
    /// Value is present
    IsNotNull,
    /// Value is absent
    IsNull,
    /// Strictly less than
    LessThan,
    /// Less than or equal
    LessThanEqual,
    /// Strictly greater than
    GreaterThan,
    /// Greater than or equal
    GreaterThanEqual,
    /// Temporal value before
    Before,
    /// Temporal value after
    After,
    /// Negated pattern match
    NotLike,
    /// Pattern match
    Like,
    /// Text prefix match
    StartingWith,
    /// Text suffix match
    EndingWith,
    /// Negated substring match
    NotContaining,
    /// Substring match
    Containing,
    /// Value not in a collection
    NotIn,
    /// Value in a collection
    In,
    /// Spatial proximity
    Near,
    /// Spatial containment
    Within,
    /// Regular expression match
    Regex,
    /// Boolean is true
    True,
    /// Boolean is false
    False,
    /// Inequality
    NotEquals,
    /// Equality; implied when no operator keyword is written
    Equals,
}

impl Operator {
    /// All operators in precedence order.
    ///
    /// When two keywords of equal length match, the operator listed first
    /// wins, so negated and null-check forms come before the plain ones.
    pub const ALL: [Operator; 24] = [
        Operator::Between,
        Operator::IsNotNull,
        Operator::IsNull,
        Operator::LessThan,
        Operator::LessThanEqual,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::Before,
        Operator::After,
        Operator::NotLike,
        Operator::Like,
        Operator::StartingWith,
        Operator::EndingWith,
        Operator::NotContaining,
        Operator::Containing,
        Operator::NotIn,
        Operator::In,
        Operator::Near,
        Operator::Within,
        Operator::Regex,
        Operator::True,
        Operator::False,
        Operator::NotEquals,
        Operator::Equals,
    ];

    /// Keywords, arity and applicability of this operator
    pub fn spec(self) -> &'static OperatorSpec {
        macro_rules! spec {
            ($arity:expr, [$($kw:literal),+], $categories:expr) => {{
                static SPEC: OperatorSpec = OperatorSpec {
                    arity: $arity,
                    keywords: &[$($kw),+],
                    categories: $categories,
                };
                &SPEC
            }};
        }

        match self {
            Operator::Between => spec!(2, ["IsBetween", "Between"], ORDERED),
            Operator::IsNotNull => spec!(0, ["IsNotNull", "NotNull"], ANY),
            Operator::IsNull => spec!(0, ["IsNull", "Null"], ANY),
            Operator::LessThan => spec!(1, ["IsLessThan", "LessThan"], ORDERED),
            Operator::LessThanEqual => spec!(1, ["IsLessThanEqual", "LessThanEqual"], ORDERED),
            Operator::GreaterThan => spec!(1, ["IsGreaterThan", "GreaterThan"], ORDERED),
            Operator::GreaterThanEqual => {
                spec!(1, ["IsGreaterThanEqual", "GreaterThanEqual"], ORDERED)
            }
            Operator::Before => spec!(1, ["IsBefore", "Before"], TEMPORAL),
            Operator::After => spec!(1, ["IsAfter", "After"], TEMPORAL),
            Operator::NotLike => spec!(1, ["IsNotLike", "NotLike"], TEXT),
            Operator::Like => spec!(1, ["IsLike", "Like"], TEXT),
            Operator::StartingWith => {
                spec!(1, ["IsStartingWith", "StartingWith", "StartsWith"], TEXT)
            }
            Operator::EndingWith => spec!(1, ["IsEndingWith", "EndingWith", "EndsWith"], TEXT),
            Operator::NotContaining => {
                spec!(1, ["IsNotContaining", "NotContaining", "NotContains"], TEXT)
            }
            Operator::Containing => spec!(1, ["IsContaining", "Containing", "Contains"], TEXT),
            Operator::NotIn => spec!(1, ["IsNotIn", "NotIn"], NON_BOOLEAN),
            Operator::In => spec!(1, ["IsIn", "In"], NON_BOOLEAN),
            Operator::Near => spec!(1, ["IsNear", "Near"], SPATIAL),
            Operator::Within => spec!(1, ["IsWithin", "Within"], SPATIAL),
            Operator::Regex => spec!(1, ["MatchesRegex", "Matches", "Regex"], TEXT),
            Operator::True => spec!(0, ["IsTrue", "True"], BOOLEAN),
            Operator::False => spec!(0, ["IsFalse", "False"], BOOLEAN),
            Operator::NotEquals => spec!(1, ["IsNot", "Not"], ANY),
            Operator::Equals => spec!(1, ["Equals", "Is"], ANY),
        }
    }

    /// Number of values bound by this operator
    pub fn arity(self) -> usize {
        self.spec().arity
    }

    /// All spellings, qualified first
    pub fn keywords(self) -> &'static [&'static str] {
        self.spec().keywords
    }

    /// The qualified spelling (`IsGreaterThan`)
    pub fn qualified_keyword(self) -> &'static str {
        self.spec().keywords[0]
    }

    /// Whether the operator may be applied to a property of `category`
    pub fn applies_to(self, category: TypeCategory) -> bool {
        self.spec().categories.contains(&category)
    }

    /// Whether the operator binds a collection rather than a scalar
    pub fn binds_collection(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_keyword())
    }
}

/// Operators applicable to `category`, in precedence order
pub fn lookup_operators(category: TypeCategory) -> Vec<Operator> {
    Operator::ALL
        .iter()
        .copied()
        .filter(|op| op.applies_to(category))
        .collect()
}

/// Find the operator spelled at the start of `remaining`.
///
/// The longest applicable keyword that is a prefix of `remaining` wins. When
/// nothing matches the implicit [`Operator::Equals`] is returned with no
/// consumed keyword.
pub fn extract_operator(remaining: &str, category: TypeCategory) -> (Operator, Option<&'static str>) {
    let mut best: Option<(Operator, &'static str)> = None;

    for op in lookup_operators(category) {
        for &keyword in op.keywords() {
            let longer = best.map_or(true, |(_, current)| keyword.len() > current.len());
            if longer && remaining.starts_with(keyword) {
                best = Some((op, keyword));
            }
        }
    }

    match best {
        Some((op, keyword)) => (op, Some(keyword)),
        None => (Operator::Equals, None),
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl Direction {
    /// Both directions, ascending first
    pub const ALL: [Direction; 2] = [Direction::Asc, Direction::Desc];

    /// Spelling inside an expression
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "Asc",
            Direction::Desc => "Desc",
        }
    }

    /// Split a trailing direction keyword off `text`
    pub fn strip_suffix(text: &str) -> (&str, Option<Direction>) {
        for direction in Self::ALL {
            if let Some(head) = text.strip_suffix(direction.keyword()) {
                return (head, Some(direction));
            }
        }
        (text, None)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Case-folding mode of a condition or a whole predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CaseFolding {
    /// Compare as written
    #[default]
    Never,
    /// Always fold case; only valid on text properties
    Always,
    /// Fold case on every text property of the predicate
    WhenPossible,
}
