//! finder-schema: Entity property snapshots for the finderq compiler
//!
//! The finder compiler never talks to a host type system directly. Instead it
//! asks a [`PropertySource`] for the ordered property list of an entity, and
//! treats any property whose declared type is itself a known entity as a
//! relation that can be traversed.
//!
//! [`Schema`] is the in-memory snapshot used by the CLI and the tests. It can
//! be built in code or loaded from JSON, TOML or YAML:
//!
//! ```rust
//! use finder_schema::{Property, PropertySource, Schema};
//!
//! let schema = Schema::new()
//!     .with_entity("Order", vec![
//!         Property::new("number", "String"),
//!         Property::new("customer", "Customer"),
//!     ])
//!     .with_entity("Customer", vec![Property::new("city", "String")]);
//!
//! let props = schema.properties("Order").unwrap();
//! assert_eq!(props.len(), 2);
//! assert!(schema.is_relation(&props[1]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod error;
pub mod property;
pub mod schema;

pub use error::{Result, SchemaError};
pub use property::{Property, TypeCategory, TypeRef};
pub use schema::Schema;

/// Read-only access to entity property lists.
///
/// Implementations must return properties in a stable order and must already
/// exclude identifier/version and multi-valued properties; the compiler does
/// not filter them again.
pub trait PropertySource {
    /// Properties of `entity`, or `None` when `entity` is not a known entity type.
    fn properties(&self, entity: &str) -> Option<Vec<Property>>;

    /// Whether `property` points at another entity.
    fn is_relation(&self, property: &Property) -> bool {
        self.properties(property.declared_type().name()).is_some()
    }
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn properties(&self, entity: &str) -> Option<Vec<Property>> {
        (**self).properties(entity)
    }
}

impl<T: PropertySource + ?Sized> PropertySource for Box<T> {
    fn properties(&self, entity: &str) -> Option<Vec<Property>> {
        (**self).properties(entity)
    }
}

impl<T: PropertySource + ?Sized> PropertySource for std::sync::Arc<T> {
    fn properties(&self, entity: &str) -> Option<Vec<Property>> {
        (**self).properties(entity)
    }
}
