//! Property resolution against a schema snapshot

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use finder_schema::{Property, PropertySource};
use finder_shared::naming::{capitalize_first, uncapitalize_first};

use crate::ast::PropertyRef;

/// Compile-local view of a [`PropertySource`].
///
/// Property lists are fetched at most once per entity for the lifetime of
/// one compile. Relation traversal stops after `max_depth` hops, which also
/// bounds cyclic relations.
pub(crate) struct Resolver<'a> {
    source: &'a dyn PropertySource,
    entity: String,
    max_depth: usize,
    cache: RefCell<HashMap<String, Option<Rc<[Property]>>>>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(source: &'a dyn PropertySource, entity: &str, max_depth: usize) -> Self {
        Self {
            source,
            entity: entity.to_string(),
            max_depth,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Properties of `entity`, or `None` when it is not an entity
    pub(crate) fn properties(&self, entity: &str) -> Option<Rc<[Property]>> {
        if let Some(cached) = self.cache.borrow().get(entity) {
            return cached.clone();
        }

        log::trace!("fetching properties of {entity}");
        let fetched: Option<Rc<[Property]>> = self.source.properties(entity).map(Rc::from);
        self.cache
            .borrow_mut()
            .insert(entity.to_string(), fetched.clone());
        fetched
    }

    /// Properties of the entity the expression targets
    pub(crate) fn root(&self) -> Option<Rc<[Property]>> {
        self.properties(&self.entity)
    }

    /// Properties of the entity `property` points at, if it is a relation
    pub(crate) fn related(&self, property: &Property) -> Option<Rc<[Property]>> {
        self.properties(property.declared_type().name())
    }

    /// Whether completion may offer the related properties of `reference`
    pub(crate) fn can_descend(&self, reference: &PropertyRef) -> bool {
        reference.is_relation() && reference.segments().len() <= self.max_depth
    }

    /// Whether `text` is the start of a property name of the target entity
    pub(crate) fn is_property_prefix(&self, text: &str) -> bool {
        let text = uncapitalize_first(text);
        self.root()
            .is_some_and(|root| root.iter().any(|p| p.name().starts_with(text.as_str())))
    }

    /// Resolve the longest property path spelled at the start of `text`
    pub(crate) fn resolve(&self, text: &str) -> Option<PropertyRef> {
        let root = self.root()?;
        let (segments, spelling) = self.resolve_in(&uncapitalize_first(text), &root, 0)?;
        let leaf = segments.last()?;
        let relation = self.related(leaf).is_some();
        Some(PropertyRef {
            segments,
            spelling,
            relation,
        })
    }

    fn resolve_in(
        &self,
        text: &str,
        properties: &[Property],
        depth: usize,
    ) -> Option<(Vec<Property>, String)> {
        let mut best: Option<&Property> = None;
        for property in properties {
            let name = property.name();
            if name.is_empty() || !text.starts_with(name) {
                continue;
            }
            if name.len() == text.len() {
                best = Some(property);
                break;
            }
            if best.map_or(true, |current| name.len() > current.name().len()) {
                best = Some(property);
            }
        }

        let matched = best?;
        let mut segments = vec![matched.clone()];
        let mut spelling = capitalize_first(matched.name());

        let rest = &text[matched.name().len()..];
        if !rest.is_empty() && depth < self.max_depth {
            if let Some(related) = self.related(matched) {
                log::trace!("descending into {} for '{rest}'", matched.declared_type());
                if let Some((nested, nested_spelling)) =
                    self.resolve_in(&uncapitalize_first(rest), &related, depth + 1)
                {
                    segments.extend(nested);
                    spelling.push_str(&nested_spelling);
                }
            }
        }

        Some((segments, spelling))
    }
}
