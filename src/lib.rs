#![warn(missing_docs)]

//! # Breadcrumbs - Path-Attached Warnings
//!
//! Breadcrumbs lets humans and automated agents attach machine-readable
//! warnings to file paths, directories, and glob patterns, and lets tooling
//! ask "does this path carry an active warning, and how severe?" before
//! acting on it.
//!
//! ## Architecture
//!
//! - [`matcher`]: pattern classification, path matching, and overlap
//!   analysis between patterns
//! - [`staleness`]: content-hash verdicts for exact-path records
//! - [`expiry`]: TTL and date expiration, session cleanup
//! - [`store`]: the `.breadcrumbs.json` persistence layer
//! - [`commands`]: CLI command implementations
//! - [`output`]: JSON result and error plumbing
//!
//! ## Example
//!
//! ```
//! use breadcrumbs::matcher::{Matcher, PatternSpec};
//! use std::path::Path;
//!
//! let matcher = Matcher::new("/repo");
//! let pattern = PatternSpec::classify("src/**/*.rs");
//! assert!(matcher.matches(&pattern, Path::new("src/api/handler.rs")));
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// CLI command implementations.
pub mod commands;

/// Expiration bookkeeping (absolute dates, TTLs, sessions).
pub mod expiry;

/// Pattern classification, path matching, and overlap analysis.
pub mod matcher;

/// Stored record types.
pub mod model;

/// JSON output and error plumbing.
pub mod output;

/// Content-hash staleness checking.
pub mod staleness;

/// The `.breadcrumbs.json` store.
pub mod store;

/// Suggestion text for matched warnings.
pub mod suggest;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Current version of the crumb binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Central context for command execution.
///
/// Holds the working directory and the discovered store path. The working
/// directory is captured once here and passed explicitly into the matcher,
/// so matching stays deterministic and testable without process-global
/// state.
#[derive(Debug, Clone)]
pub struct BreadcrumbContext {
    /// Working directory all relative paths resolve against.
    pub cwd: PathBuf,

    /// Discovered store file, if any ancestor (or the `BREADCRUMBS_FILE`
    /// override) carries one.
    pub store_path: Option<PathBuf>,
}

impl BreadcrumbContext {
    /// Creates a context from the process working directory, discovering
    /// the nearest store file.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("Could not determine working directory")?;
        let store_path = store::Store::discover(&cwd);
        Ok(Self { cwd, store_path })
    }

    /// Creates a context with explicit paths for testing.
    #[must_use]
    pub fn new_explicit(cwd: PathBuf, store_path: Option<PathBuf>) -> Self {
        Self { cwd, store_path }
    }

    /// The store path, or a `NO_CONFIG` error when none was discovered.
    ///
    /// # Errors
    ///
    /// Returns a `NO_CONFIG` [`output::CliError`] if no store exists.
    pub fn require_store(&self) -> Result<&Path> {
        self.store_path.as_deref().ok_or_else(|| {
            output::CliError::new(
                "NO_CONFIG",
                format!(
                    "No {} found. Run 'crumb init' first.",
                    store::STORE_FILE_NAME
                ),
            )
            .into()
        })
    }

    /// A matcher rooted at this context's working directory.
    #[must_use]
    pub fn matcher(&self) -> matcher::Matcher {
        matcher::Matcher::new(self.cwd.clone())
    }
}
