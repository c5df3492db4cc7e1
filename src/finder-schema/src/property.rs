//! Property descriptors and type references
//!
//! A [`Property`] is what the host type system hands the compiler for each
//! field of an entity. Its [`TypeCategory`] decides which operators apply.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A declared type, possibly generic (`List<String>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    name: String,
    parameters: Vec<TypeRef>,
}

impl TypeRef {
    /// A non-generic type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// A generic type with the given parameters
    pub fn generic(name: impl Into<String>, parameters: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// `List<element>`
    pub fn list_of(element: TypeRef) -> Self {
        Self::generic("List", vec![element])
    }

    /// Parse a type written as `Name` or `Name<P1, P2>`
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        match all_consuming(type_ref).parse(input) {
            Ok((_, parsed)) => Ok(parsed),
            Err(_) => Err(SchemaError::InvalidType(input.to_string())),
        }
    }

    /// Full type name, without generic parameters
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without any package/module qualifier (`java.util.Date` -> `Date`)
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(['.', ':'])
            .next()
            .unwrap_or(self.name.as_str())
    }

    /// Generic parameters
    pub fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    /// Whether this type is a collection of values
    pub fn is_collection(&self) -> bool {
        matches!(
            self.simple_name(),
            "List"
                | "Set"
                | "Collection"
                | "Iterable"
                | "SortedSet"
                | "Vec"
                | "VecDeque"
                | "HashSet"
                | "BTreeSet"
        )
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "<")?;
            for (i, param) in self.parameters.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

fn type_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '$')).parse(input)
}

fn type_ref(input: &str) -> IResult<&str, TypeRef> {
    map(
        (
            preceded(multispace0, type_name),
            opt(preceded(
                multispace0,
                delimited(
                    char('<'),
                    separated_list1(char(','), type_ref),
                    preceded(multispace0, char('>')),
                ),
            )),
            multispace0,
        ),
        |(name, parameters, _)| TypeRef::generic(name, parameters.unwrap_or_default()),
    )
    .parse(input)
}

/// Coarse data-type category used for operator applicability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    /// Strings and characters
    Text,
    /// Booleans
    Boolean,
    /// Dates, times and instants
    Temporal,
    /// Integer, floating point and decimal numbers
    Numeric,
    /// Geometric values (points, shapes, distances)
    Spatial,
    /// Everything else, including related entities and enums
    Other,
}

impl TypeCategory {
    /// Infer the category from a declared type
    pub fn infer(declared: &TypeRef) -> Self {
        match declared.simple_name() {
            "String" | "str" | "char" | "Character" | "CharSequence" | "Text" => Self::Text,
            "boolean" | "Boolean" | "bool" => Self::Boolean,
            "Date" | "LocalDate" | "LocalDateTime" | "LocalTime" | "Instant" | "Calendar"
            | "GregorianCalendar" | "Timestamp" | "ZonedDateTime" | "OffsetDateTime"
            | "DateTime" | "NaiveDate" | "NaiveDateTime" | "NaiveTime" | "Time" => Self::Temporal,
            "byte" | "short" | "int" | "long" | "float" | "double" | "Byte" | "Short"
            | "Integer" | "Long" | "Float" | "Double" | "BigDecimal" | "BigInteger" | "Number"
            | "Decimal" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16"
            | "u32" | "u64" | "u128" | "usize" | "f32" | "f64" => Self::Numeric,
            "Point" | "Polygon" | "Circle" | "Box" | "Distance" | "Geometry" | "GeoJsonPoint" => {
                Self::Spatial
            }
            _ => Self::Other,
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Temporal => "temporal",
            Self::Numeric => "numeric",
            Self::Spatial => "spatial",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// One property of an entity, as supplied by the host type system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type")]
    declared_type: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<TypeCategory>,
    #[serde(default, skip_serializing_if = "is_false")]
    multivalued: bool,
    #[serde(default, rename = "identifier", skip_serializing_if = "is_false")]
    identifier_or_version: bool,
}

impl Property {
    /// Create a property, parsing `declared_type` as a type reference.
    ///
    /// A type string that does not parse is kept verbatim as a plain name.
    pub fn new(name: impl Into<String>, declared_type: &str) -> Self {
        let declared_type =
            TypeRef::parse(declared_type).unwrap_or_else(|_| TypeRef::new(declared_type));
        Self::with_type(name, declared_type)
    }

    /// Create a property from an already-built type reference
    pub fn with_type(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            category: None,
            multivalued: false,
            identifier_or_version: false,
        }
    }

    /// Override the inferred type category
    #[must_use]
    pub fn with_category(mut self, category: TypeCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Mark the property as multi-valued
    #[must_use]
    pub fn multivalued(mut self) -> Self {
        self.multivalued = true;
        self
    }

    /// Mark the property as an identifier or version field
    #[must_use]
    pub fn identifier(mut self) -> Self {
        self.identifier_or_version = true;
        self
    }

    /// Property name, as declared (`lastName`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    /// Explicit category, or the one inferred from the declared type
    pub fn category(&self) -> TypeCategory {
        self.category
            .unwrap_or_else(|| TypeCategory::infer(&self.declared_type))
    }

    /// Text property
    pub fn is_textual(&self) -> bool {
        self.category() == TypeCategory::Text
    }

    /// Boolean property
    pub fn is_boolean(&self) -> bool {
        self.category() == TypeCategory::Boolean
    }

    /// Date/time property
    pub fn is_temporal(&self) -> bool {
        self.category() == TypeCategory::Temporal
    }

    /// Numeric property
    pub fn is_numeric(&self) -> bool {
        self.category() == TypeCategory::Numeric
    }

    /// Holds several values (explicitly flagged or a collection type)
    pub fn is_multivalued(&self) -> bool {
        self.multivalued || self.declared_type.is_collection()
    }

    /// Identifier or version field
    pub fn is_identifier_or_version(&self) -> bool {
        self.identifier_or_version
    }

    /// Whether finder expressions may reference this property at all
    pub fn is_queryable(&self) -> bool {
        !self.is_identifier_or_version() && !self.is_multivalued()
    }
}
