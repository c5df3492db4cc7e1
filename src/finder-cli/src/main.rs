mod cli;
mod config;

use crate::cli::{parse_args, CliConfig, Commands, ConfigCommands, OutputFormat};
use crate::config::{create_default_config_file, validate_config, Config};
use clap::CommandFactory;
use clap_complete::generate;
use finder_parser::{FinderCompiler, ParseError};
use finder_schema::{Property, PropertySource, Schema};
use finder_shared::error::{config_error, schema_error};
use finder_shared::{BuildInfo, Result};
use serde::Serialize;
use std::io;
use std::path::Path;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args();
    let cli_config = CliConfig::from(&args);

    let mut config = Config::load()?;
    config.apply_cli(&cli_config)?;
    validate_config(&config)?;

    setup_logging(&config);

    handle_command(args.command, args.format, &config)
}

fn handle_command(command: Commands, format: OutputFormat, config: &Config) -> Result<()> {
    match command {
        Commands::Check { expressions } => check_expressions(&expressions, format, config),
        Commands::Suggest { prefix, all } => suggest(&prefix, all, format, config),
        Commands::Params { expression } => show_parameters(&expression, format, config),
        Commands::Entities => list_entities(format, config),
        Commands::Completions { shell } => generate_completions(shell),
        Commands::Config { command } => handle_config_command(command, config),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn setup_logging(config: &Config) {
    let log_level = match config.debug.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}

fn print_version() {
    let info = BuildInfo {
        name: "finderq",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH"),
        build_date: option_env!("BUILD_DATE"),
        rust_version: option_env!("RUSTC_VERSION"),
    };
    print!("{info}");
}

fn load_schema(config: &Config) -> Result<Schema> {
    let path = config.schema_path()?;
    Schema::load(path).map_err(|e| schema_error(e.to_string()))
}

/// Compiler over the configured schema, plus the configured entity
fn open_compiler(config: &Config) -> Result<(FinderCompiler<Schema>, String)> {
    let schema = load_schema(config)?;
    let entity = config.entity()?.to_string();
    if !schema.contains_entity(&entity) {
        return Err(schema_error(format!("Unknown entity '{entity}'")));
    }
    Ok((FinderCompiler::with_config(schema, config.compiler.clone()), entity))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    expression: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
}

fn check_expressions(expressions: &[String], format: OutputFormat, config: &Config) -> Result<()> {
    let (mut compiler, entity) = open_compiler(config)?;

    let mut reports = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let report = match compiler.compile(expression, &entity) {
            Ok(compiled) => {
                let valid = compiled.is_valid();
                let suggestions = if valid {
                    Vec::new()
                } else {
                    compiled
                        .suggestions_for_input()
                        .into_iter()
                        .map(str::to_string)
                        .collect()
                };
                CheckReport {
                    expression,
                    valid,
                    canonical: Some(compiled.to_canonical_string()),
                    error: None,
                    suggestions,
                }
            }
            Err(e @ ParseError::UnknownEntity { .. }) => return Err(e.into()),
            Err(e) => CheckReport {
                expression,
                valid: false,
                canonical: None,
                error: Some(e.to_string()),
                suggestions: Vec::new(),
            },
        };
        reports.push(report);
    }

    match format {
        OutputFormat::Json => print_json(&reports)?,
        OutputFormat::Text => {
            for report in &reports {
                print_check_report(report);
            }
        }
    }

    let invalid = reports.iter().filter(|report| !report.valid).count();
    log::info!("checked {} expressions, {} invalid", reports.len(), invalid);
    if invalid > 0 {
        return Err(anyhow::anyhow!(
            "{invalid} of {} expressions are invalid",
            reports.len()
        ));
    }
    Ok(())
}

fn print_check_report(report: &CheckReport<'_>) {
    if let Some(error) = &report.error {
        println!("{}: error: {error}", report.expression);
        return;
    }
    if report.valid {
        println!("{}: valid", report.expression);
        return;
    }

    match report.canonical.as_deref() {
        Some(canonical) if canonical != report.expression => {
            println!("{}: invalid (read as {canonical})", report.expression);
        }
        _ => println!("{}: invalid", report.expression),
    }
    for suggestion in &report.suggestions {
        println!("  {suggestion}");
    }
}

fn suggest(prefix: &str, all: bool, format: OutputFormat, config: &Config) -> Result<()> {
    let (mut compiler, entity) = open_compiler(config)?;
    let compiled = compiler.compile(prefix, &entity)?;

    let candidates: Vec<&str> = if all {
        compiled.suggest_next().iter().map(String::as_str).collect()
    } else {
        compiled.suggestions_for_input()
    };

    match format {
        OutputFormat::Json => print_json(&candidates)?,
        OutputFormat::Text => {
            for candidate in candidates {
                println!("{candidate}");
            }
        }
    }
    Ok(())
}

fn show_parameters(expression: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let (mut compiler, entity) = open_compiler(config)?;
    let compiled = compiler.compile(expression, &entity)?;
    if !compiled.is_valid() {
        log::warn!("'{expression}' is not a valid finder name, showing the parameters of what resolved");
    }

    let parameters = compiled.bound_parameter_list();
    match format {
        OutputFormat::Json => print_json(&parameters)?,
        OutputFormat::Text => {
            for parameter in &parameters {
                println!("{parameter}");
            }
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct EntityReport<'a> {
    name: &'a str,
    properties: Vec<Property>,
}

fn list_entities(format: OutputFormat, config: &Config) -> Result<()> {
    let schema = load_schema(config)?;
    let entities: Vec<EntityReport<'_>> = schema
        .entity_names()
        .map(|name| EntityReport {
            name,
            properties: schema.properties(name).unwrap_or_default(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&entities)?,
        OutputFormat::Text => {
            for entity in &entities {
                println!("{}", entity.name);
                for property in &entity.properties {
                    println!("  {}: {} ({})", property.name(), property.declared_type(), property.category());
                }
            }
        }
    }
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn handle_config_command(command: ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let yaml = serde_yaml::to_string(config)
                .map_err(|e| config_error(format!("Failed to serialize config: {e}")))?;
            println!("{yaml}");
            Ok(())
        }
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                return Err(config_error(format!(
                    "Config file already exists: {}",
                    path.display()
                )));
            }
            create_default_config_file(&path)?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
        ConfigCommands::Check { path } => check_config_file(&path),
    }
}

fn check_config_file(path: &Path) -> Result<()> {
    let config = Config::load_from_file(path)?;
    validate_config(&config)?;
    println!("Configuration is valid: {}", path.display());
    Ok(())
}
