//! Command-line interface for finderq
//!
//! Argument definitions for the `finderq` binary and the flattened
//! [`CliConfig`] the rest of the program reads them through.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// finderq - check and complete repository finder method names
///
/// finderq compiles finder names such as `findByLastNameOrderByAgeDesc`
/// against an entity schema, reports whether they are valid and lists what
/// may be typed next.
#[derive(Parser, Debug)]
#[command(name = "finderq")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Validate finder names against the Person entity\n  \
    finderq -s schema.json -e Person check findByLastName findByAgeGreaterThan\n\n  \
    # List continuations of a partially typed name\n  \
    finderq -s schema.json -e Person suggest findByAgeGre\n\n  \
    # Show the parameters a finder method binds\n  \
    finderq -s schema.json -e Person params findByAgeBetweenAndNameIn")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Schema snapshot (JSON, TOML or YAML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub schema: Option<PathBuf>,

    /// Entity the expressions are compiled against
    #[arg(short, long, value_name = "NAME", global = true)]
    pub entity: Option<String>,

    /// Configuration file to merge over the discovered one
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// How many relations a property path may cross
    #[arg(long, value_name = "N", global = true)]
    pub max_relation_depth: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON document
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate finder expressions
    #[command(after_help = "EXAMPLES:\n  \
        finderq check findByName findDistinctByAgeOrderByNameAsc\n  \
        finderq --format json check findByNam")]
    Check {
        /// Expressions to validate
        #[arg(required = true, value_name = "EXPR")]
        expressions: Vec<String>,
    },

    /// List completions for a partial expression
    #[command(after_help = "EXAMPLES:\n  \
        finderq suggest find\n  \
        finderq suggest findByAddress --all")]
    Suggest {
        /// Partially typed expression (empty for the start of a name)
        #[arg(default_value = "", value_name = "PREFIX")]
        prefix: String,

        /// Include candidates that rewrite what has been typed
        #[arg(long)]
        all: bool,
    },

    /// Show the parameters a finder method binds
    Params {
        /// Expression to inspect
        #[arg(value_name = "EXPR")]
        expression: String,
    },

    /// List the entities of a schema and their queryable properties
    Entities,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version and build information
    Version,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Path of the new file (.toml or .yaml)
        #[arg(default_value = "finderq.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check that a configuration file loads and validates
    Check {
        /// Configuration file to check
        path: PathBuf,
    },
}

/// Command-line settings that take part in configuration layering
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Schema file from `--schema`
    pub schema: Option<PathBuf>,
    /// Entity from `--entity`
    pub entity: Option<String>,
    /// Explicit config file from `--config`
    pub config_file: Option<PathBuf>,
    /// Relation depth from `--max-relation-depth`
    pub max_relation_depth: Option<usize>,
    /// Number of `-v` flags
    pub verbose: u8,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            schema: cli.schema.clone(),
            entity: cli.entity.clone(),
            config_file: cli.config.clone(),
            max_relation_depth: cli.max_relation_depth,
            verbose: cli.verbose,
        }
    }
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
#[allow(dead_code)]
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
