//! finder-parser: Compiler for finder method names
//!
//! This crate turns camel-case finder names such as
//! `findDistinctByLastNameAndAgeGreaterThanOrderByAgeDesc` into a structured
//! query description, checks them against an entity's properties, and lists
//! the valid continuations of a partially typed name.
//!
//! # Features
//!
//! - **Schema-aware resolution**: property names are matched longest-first,
//!   following relations into related entities
//! - **Round-trip validation**: a valid expression rebuilds to exactly the
//!   text it was compiled from
//! - **Incremental completion**: every prefix yields the full expressions
//!   that may follow it
//! - **Bound parameters**: the typed values a finder method would take
//!
//! # Quick Start
//!
//! ```rust
//! use finder_parser::FinderExpression;
//! use finder_schema::{Property, Schema};
//!
//! let schema = Schema::new().with_entity(
//!     "Person",
//!     vec![Property::new("lastName", "String"), Property::new("age", "int")],
//! );
//!
//! let expr = FinderExpression::compile(
//!     "findDistinctByLastNameAndAgeGreaterThanOrderByAgeDesc",
//!     "Person",
//!     &schema,
//! )?;
//! assert!(expr.is_valid());
//! assert!(expr.is_distinct());
//!
//! let params = expr.bound_parameter_list();
//! assert_eq!(params[0].name, "lastName");
//! assert_eq!(params[1].to_string(), "int age");
//! # Ok::<(), finder_parser::ParseError>(())
//! ```
//!
//! # Completion
//!
//! Unknown names are not errors. They leave a gap that shows up as an invalid
//! expression with suggestions:
//!
//! ```rust
//! use finder_parser::FinderExpression;
//! use finder_schema::{Property, Schema};
//!
//! let schema = Schema::new().with_entity("Person", vec![Property::new("age", "int")]);
//! let expr = FinderExpression::compile("findByAgeGreater", "Person", &schema)?;
//! assert!(!expr.is_valid());
//! assert!(expr.suggestions_for_input().contains(&"findByAgeGreaterThan"));
//! # Ok::<(), finder_parser::ParseError>(())
//! ```
//!
//! # Error Handling
//!
//! Structural mistakes are rejected at compile time:
//!
//! ```rust
//! use finder_parser::{FinderExpression, ParseError};
//! use finder_schema::{Property, Schema};
//!
//! let schema = Schema::new().with_entity("Person", vec![Property::new("name", "String")]);
//! match FinderExpression::compile("findTop0ByName", "Person", &schema) {
//!     Err(ParseError::ZeroLimit) => {}
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

pub mod ast;
pub mod compiler;
mod completion;
pub mod error;
pub mod expression;
pub mod keywords;
mod parser;
#[cfg(test)]
mod tests;

pub use ast::{
    Condition, Conjunction, FinderParameter, Limit, OrderBy, Predicate, PropertyRef, QueryKind,
    SortTerm, Subject,
};
pub use compiler::{CacheStats, CompilerConfig, FinderCompiler};
pub use error::{ParseError, Result};
pub use expression::FinderExpression;
pub use keywords::{extract_operator, lookup_operators, CaseFolding, Direction, Operator};

use finder_schema::PropertySource;

/// Compile `text` against the properties of `entity` with default settings
pub fn compile(text: &str, entity: &str, properties: &dyn PropertySource) -> Result<FinderExpression> {
    FinderExpression::compile(text, entity, properties)
}
