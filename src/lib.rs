//! finderq: compile, validate and complete repository finder method names
//!
//! This is the facade crate of the finderq workspace. It re-exports the
//! member crates so applications can depend on a single package:
//!
//! - [`schema`]: entity property snapshots ([`Schema`], [`Property`],
//!   [`PropertySource`])
//! - [`parser`]: the finder compiler ([`FinderExpression`],
//!   [`FinderCompiler`])
//! - [`shared`]: version metadata and naming helpers
//!
//! ```rust
//! use finderq::{FinderExpression, Property, Schema};
//!
//! let schema = Schema::new().with_entity("Book", vec![Property::new("title", "String")]);
//! let expr = FinderExpression::compile("findFirst5ByTitleContaining", "Book", &schema)?;
//! assert_eq!(expr.max_results(), Some(5));
//! # Ok::<(), finderq::ParseError>(())
//! ```

pub use finder_parser as parser;
pub use finder_schema as schema;
pub use finder_shared as shared;

pub use finder_parser::{
    compile, CacheStats, CompilerConfig, FinderCompiler, FinderExpression, FinderParameter,
    Operator, ParseError, QueryKind,
};
pub use finder_schema::{Property, PropertySource, Schema, SchemaError, TypeCategory, TypeRef};
pub use finder_shared::VERSION;
