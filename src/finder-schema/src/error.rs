//! Error types for schema snapshots

use std::path::PathBuf;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while loading or validating a schema snapshot
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be read
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        /// Path of the schema file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Invalid JSON schema document
    #[error("Invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid TOML schema document
    #[error("Invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid YAML schema document
    #[error("Invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension does not name a supported format
    #[error("Unsupported schema file format: {0}")]
    UnsupportedFormat(String),

    /// A type name could not be parsed
    #[error("Invalid type reference '{0}'")]
    InvalidType(String),

    /// The same property name appears twice on one entity
    #[error("Entity '{entity}' declares property '{property}' more than once")]
    DuplicateProperty {
        /// Entity name
        entity: String,
        /// Repeated property name
        property: String,
    },
}
