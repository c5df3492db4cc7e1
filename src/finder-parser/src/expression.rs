//! Compiled finder expressions

use std::collections::HashMap;
use std::fmt;

use finder_schema::{PropertySource, TypeRef};
use serde::Serialize;

use crate::ast::{FinderParameter, Predicate, QueryKind, Subject};
use crate::compiler::CompilerConfig;
use crate::completion;
use crate::error::{ParseError, Result};
use crate::parser::{self, Resolver};

/// One finder expression compiled against a schema snapshot.
///
/// The expression is immutable once built. Completion candidates are worked
/// out during compilation, so nothing here needs the schema again and the
/// value can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinderExpression {
    source: String,
    entity: String,
    subject: Subject,
    predicate: Predicate,
    suggestions: Vec<String>,
}

impl FinderExpression {
    /// Compile `text` against the properties of `entity`
    pub fn compile(text: &str, entity: &str, properties: &dyn PropertySource) -> Result<Self> {
        Self::compile_with_config(text, entity, properties, &CompilerConfig::default())
    }

    /// Compile with explicit compiler settings
    pub fn compile_with_config(
        text: &str,
        entity: &str,
        properties: &dyn PropertySource,
        config: &CompilerConfig,
    ) -> Result<Self> {
        let resolver = Resolver::new(properties, entity, config.max_relation_depth);
        if resolver.root().is_none() {
            return Err(ParseError::UnknownEntity {
                entity: entity.to_string(),
            });
        }

        let (subject, rest) = parser::parse_subject(text, &resolver)?;
        let predicate = if subject.is_complete() {
            parser::parse_predicate(rest, &resolver)?
        } else {
            Predicate::default()
        };
        let suggestions = completion::suggest(&subject, &predicate, &resolver);

        let expression = Self {
            source: text.to_string(),
            entity: entity.to_string(),
            subject,
            predicate,
            suggestions,
        };

        log::debug!(
            "compiled '{}' for {}: valid={}, {} suggestions",
            expression.source,
            expression.entity,
            expression.is_valid(),
            expression.suggestions.len()
        );

        Ok(expression)
    }

    /// Grammar-only check that needs no schema
    pub fn is_valid_shape(text: &str) -> bool {
        parser::check_shape(text)
    }

    /// Whether the expression is complete and spelled canonically
    pub fn is_valid(&self) -> bool {
        self.is_complete() && self.to_canonical_string() == self.source
    }

    /// Whether subject and predicate both satisfy their grammar
    pub fn is_complete(&self) -> bool {
        self.subject.is_complete() && self.predicate.is_complete()
    }

    /// Text rebuilt from the resolved structure
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    /// Candidate full expressions continuing what has been typed
    pub fn suggest_next(&self) -> &[String] {
        &self.suggestions
    }

    /// Candidates that extend the typed text as-is
    pub fn suggestions_for_input(&self) -> Vec<&str> {
        self.suggestions
            .iter()
            .map(String::as_str)
            .filter(|candidate| candidate.starts_with(self.source.as_str()))
            .collect()
    }

    /// Upper bound on the number of results, when limited
    pub fn max_results(&self) -> Option<u32> {
        self.subject.limit().map(|limit| limit.max_results())
    }

    /// Whether duplicates are removed from the results
    pub fn is_distinct(&self) -> bool {
        self.subject.is_distinct()
    }

    /// Whether the expression counts instead of loading entities
    pub fn is_count(&self) -> bool {
        self.query_kind().is_some_and(QueryKind::is_count)
    }

    /// The leading query keyword, once typed
    pub fn query_kind(&self) -> Option<QueryKind> {
        self.subject.kind()
    }

    /// Values a finder method built from this expression binds, in order.
    ///
    /// A property bound more than once gets numbered names (`age1`, `age2`).
    pub fn bound_parameter_list(&self) -> Vec<FinderParameter> {
        let mut bound: Vec<(TypeRef, String)> = Vec::new();
        for condition in self.predicate.conditions() {
            let Some(property) = condition.property() else {
                continue;
            };
            let operator = condition.operator();
            let leaf = property.property().declared_type();
            let type_ref = if operator.binds_collection() {
                TypeRef::list_of(leaf.clone())
            } else {
                leaf.clone()
            };
            for _ in 0..operator.arity() {
                bound.push((type_ref.clone(), property.parameter_name()));
            }
        }

        let mut totals: HashMap<&str, usize> = HashMap::new();
        for (_, name) in &bound {
            *totals.entry(name.as_str()).or_default() += 1;
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut parameters = Vec::with_capacity(bound.len());
        for (type_ref, name) in &bound {
            let name = if totals.get(name.as_str()).copied().unwrap_or(0) > 1 {
                let index = seen.entry(name.clone()).or_default();
                *index += 1;
                format!("{name}{index}")
            } else {
                name.clone()
            };
            parameters.push(FinderParameter {
                type_ref: type_ref.clone(),
                name,
            });
        }
        parameters
    }

    /// The text the expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The entity the expression was compiled against
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Parsed subject
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Parsed predicate
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl fmt::Display for FinderExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subject)?;
        if self.subject.is_complete() {
            write!(f, "{}", self.predicate)?;
        }
        Ok(())
    }
}
