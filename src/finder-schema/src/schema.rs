//! In-memory schema snapshot
//!
//! A [`Schema`] maps entity names to their ordered property lists. It is the
//! read-only snapshot a compile runs against; refreshing the schema means
//! building a new `Schema`, never mutating one that is in use.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::property::Property;
use crate::PropertySource;

/// Ordered entity → properties snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    entities: IndexMap<String, Vec<Property>>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Schema::insert_entity`]
    #[must_use]
    pub fn with_entity(mut self, name: impl Into<String>, properties: Vec<Property>) -> Self {
        self.insert_entity(name, properties);
        self
    }

    /// Add or replace an entity
    pub fn insert_entity(&mut self, name: impl Into<String>, properties: Vec<Property>) {
        self.entities.insert(name.into(), properties);
    }

    /// Entity names in declaration order
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Whether `name` is a declared entity
    pub fn contains_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// All declared properties of an entity, including the ones the
    /// compiler never sees (identifiers, versions, collections)
    pub fn declared_properties(&self, entity: &str) -> Option<&[Property]> {
        self.entities.get(entity).map(Vec::as_slice)
    }

    /// Parse a JSON schema document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(content)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse a TOML schema document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let schema: Schema = toml::from_str(content)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse a YAML schema document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let schema: Schema = serde_yaml::from_str(content)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load a schema file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        log::debug!("loading {} schema from {}", extension, path.display());

        match extension {
            "json" => Self::from_json_str(&content),
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            other => Err(SchemaError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Reject entities that declare the same property twice
    pub fn validate(&self) -> Result<()> {
        for (entity, properties) in &self.entities {
            let mut seen = HashSet::new();
            for property in properties {
                if !seen.insert(property.name()) {
                    return Err(SchemaError::DuplicateProperty {
                        entity: entity.clone(),
                        property: property.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl PropertySource for Schema {
    fn properties(&self, entity: &str) -> Option<Vec<Property>> {
        self.entities.get(entity).map(|properties| {
            properties
                .iter()
                .filter(|p| p.is_queryable())
                .cloned()
                .collect()
        })
    }
}
