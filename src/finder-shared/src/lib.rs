//! finder-shared: Shared types and utilities for finderq crates
//!
//! This crate contains the pieces every finderq crate needs: the common
//! `Result` alias, version metadata, and the camel-case naming helpers used
//! when property names are spliced into finder expressions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

/// Result type alias for application-level finderq operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information structure
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Binary or package name
    pub name: &'static str,
    /// Package version
    pub version: &'static str,
    /// Git commit hash (if available)
    pub git_hash: Option<&'static str>,
    /// Build timestamp (if available)
    pub build_date: Option<&'static str>,
    /// Rust compiler version (if available)
    pub rust_version: Option<&'static str>,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.name, self.version)?;

        if let Some(hash) = self.git_hash {
            writeln!(f, "Commit: {hash}")?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {date}")?;
        }

        if let Some(rust_ver) = self.rust_version {
            writeln!(f, "Rustc: {rust_ver}")?;
        }

        Ok(())
    }
}

/// Common error handling utilities
pub mod error {
    /// Create a configuration error
    pub fn config_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Configuration error: {}", msg.into())
    }

    /// Create a schema error
    pub fn schema_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Schema error: {}", msg.into())
    }
}

/// Camel-case naming helpers
pub mod naming {
    /// Check if a string is empty or whitespace-only
    #[must_use]
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }

    /// Capitalize the first character of a string
    ///
    /// Property names are spelled this way when they appear inside a
    /// finder expression (`lastName` becomes `LastName`).
    #[must_use]
    pub fn capitalize_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        }
    }

    /// Lower-case the first character of a string
    #[must_use]
    pub fn uncapitalize_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        }
    }

    /// Whether `s` begins with an upper-case letter
    #[must_use]
    pub fn starts_with_upper(s: &str) -> bool {
        s.chars().next().is_some_and(char::is_uppercase)
    }
}
