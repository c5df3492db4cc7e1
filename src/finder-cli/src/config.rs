//! Configuration management for finderq
//!
//! Settings are layered: built-in defaults, then the first configuration
//! file found, then `FINDERQ_*` environment variables, then command-line
//! flags. Later layers override earlier ones field by field.

use crate::cli::CliConfig;
use finder_parser::CompilerConfig;
use finder_shared::error::config_error;
use finder_shared::naming::is_blank;
use finder_shared::Result;

use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 4] = ["finderq.toml", ".finderq.toml", "finderq.yaml", ".finderq.yaml"];

/// Deepest relation traversal `validate_config` accepts
const MAX_SANE_RELATION_DEPTH: usize = 16;

/// Main configuration structure for the finderq binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler settings
    pub compiler: CompilerConfig,
    /// Which schema and entity to compile against
    pub schema: SchemaConfig,
    /// Debug and diagnostic configuration
    pub debug: DebugConfig,
}

/// Schema selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Schema snapshot file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Default entity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

/// Debug and diagnostic configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log verbosity (0 = warn, 1 = info, 2 = debug, 3+ = trace)
    pub verbosity: u8,
}

impl Config {
    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Load configuration from the discovered file and the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            log::info!("using config file {}", config_path.display());
            config.merge_file(&config_path)?;
        }

        config.merge_env()?;

        Ok(config)
    }

    /// Find a configuration file in the working directory, then in
    /// `~/.config/finderq/`
    pub(crate) fn find_config_file() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let user_dir = dirs::home_dir().map(|home| home.join(".config").join("finderq"));
        Self::find_config_file_in(&current_dir, user_dir.as_deref())
    }

    fn find_config_file_in(current_dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
        std::iter::once(current_dir)
            .chain(user_dir)
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.exists())
    }

    /// Merge configuration from file
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file {}: {e}", path.display())))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "toml" => toml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid TOML config: {e}")))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid YAML config: {e}")))?,
            _ => return Err(config_error("Unsupported config file format")),
        };
        self.merge(file_config);

        Ok(())
    }

    /// Merge configuration from environment variables
    fn merge_env(&mut self) -> Result<()> {
        self.merge_env_with_reader(|key| std::env::var(key).ok())
    }

    /// Merge configuration from environment variables with custom reader
    fn merge_env_with_reader<F>(&mut self, env_reader: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env_reader("FINDERQ_SCHEMA") {
            self.schema.path = Some(PathBuf::from(val));
        }

        if let Some(val) = env_reader("FINDERQ_ENTITY") {
            self.schema.entity = Some(val);
        }

        if let Some(val) = env_reader("FINDERQ_MAX_RELATION_DEPTH") {
            match val.parse() {
                Ok(depth) => self.compiler.max_relation_depth = depth,
                Err(_) => log::warn!("ignoring FINDERQ_MAX_RELATION_DEPTH={val}"),
            }
        }

        if let Some(val) = env_reader("FINDERQ_CACHE_CAPACITY") {
            match val.parse() {
                Ok(capacity) => self.compiler.cache_capacity = capacity,
                Err(_) => log::warn!("ignoring FINDERQ_CACHE_CAPACITY={val}"),
            }
        }

        if let Some(val) = env_reader("FINDERQ_VERBOSITY") {
            match val.parse() {
                Ok(level) => self.debug.verbosity = level,
                Err(_) => log::warn!("ignoring FINDERQ_VERBOSITY={val}"),
            }
        }

        Ok(())
    }

    /// Merge another config into this one, keeping values it leaves at
    /// their defaults
    fn merge(&mut self, other: Config) {
        let compiler_defaults = CompilerConfig::default();
        if other.compiler.max_relation_depth != compiler_defaults.max_relation_depth {
            self.compiler.max_relation_depth = other.compiler.max_relation_depth;
        }
        if other.compiler.cache_capacity != compiler_defaults.cache_capacity {
            self.compiler.cache_capacity = other.compiler.cache_capacity;
        }

        if other.schema.path.is_some() {
            self.schema.path = other.schema.path;
        }
        if other.schema.entity.is_some() {
            self.schema.entity = other.schema.entity;
        }

        if other.debug.verbosity != 0 {
            self.debug.verbosity = other.debug.verbosity;
        }
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli_config: &CliConfig) -> Result<()> {
        if let Some(path) = &cli_config.config_file {
            self.merge_file(path)?;
        }
        if let Some(schema) = &cli_config.schema {
            self.schema.path = Some(schema.clone());
        }
        if let Some(entity) = &cli_config.entity {
            self.schema.entity = Some(entity.clone());
        }
        if let Some(depth) = cli_config.max_relation_depth {
            self.compiler.max_relation_depth = depth;
        }
        if cli_config.verbose > 0 {
            self.debug.verbosity = cli_config.verbose;
        }
        Ok(())
    }

    /// The schema file, or an error naming the ways to supply one
    pub fn schema_path(&self) -> Result<&Path> {
        self.schema
            .path
            .as_deref()
            .ok_or_else(|| config_error("No schema file given (use --schema or FINDERQ_SCHEMA)"))
    }

    /// The entity, or an error naming the ways to supply one
    pub fn entity(&self) -> Result<&str> {
        match self.schema.entity.as_deref() {
            Some(entity) if !is_blank(entity) => Ok(entity.trim()),
            _ => Err(config_error("No entity given (use --entity or FINDERQ_ENTITY)")),
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| config_error(format!("Failed to serialize config: {e}")))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| config_error(format!("Failed to serialize config: {e}")))?,
            _ => return Err(config_error("Unsupported config file format")),
        };

        fs::write(path, content)
            .map_err(|e| config_error(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

/// Create a default config file template
pub fn create_default_config_file(path: &Path) -> Result<()> {
    Config::default().save(path)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.compiler.cache_capacity == 0 {
        return Err(config_error("Cache capacity must be greater than 0"));
    }

    if config.compiler.max_relation_depth > MAX_SANE_RELATION_DEPTH {
        return Err(config_error(format!(
            "Relation depth {} seems unreasonably high (at most {MAX_SANE_RELATION_DEPTH})",
            config.compiler.max_relation_depth
        )));
    }

    if let Some(path) = &config.schema.path {
        if !path.exists() {
            log::warn!("schema file does not exist: {}", path.display());
        }
    }

    Ok(())
}
