//! Command-line interface definitions for crumb.
//!
//! All argument parsing structures live here, using clap's derive macros.
//! Field-level documentation is provided via clap attributes, so missing_docs
//! is allowed for this module.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::model::{Severity, Source};

/// Main CLI structure for crumb.
#[derive(Parser)]
#[command(
    name = "crumb",
    version = crate::VERSION,
    about = "Attach machine-readable warnings to paths, directories, and globs",
    long_about = "Coordination between humans and agents via file-attached warnings.\n\
                  Results are printed as JSON on stdout; errors as JSON on stderr."
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new .breadcrumbs.json in the current directory
    Init {
        /// Overwrite an existing store file
        #[arg(short, long)]
        force: bool,
    },

    /// Add a breadcrumb warning to a path, directory, or glob
    Add {
        /// File path, directory (trailing /), or glob pattern
        path: String,

        /// Warning message
        message: String,

        /// Severity level
        #[arg(short, long, value_enum, default_value_t = Severity::Warn)]
        severity: Severity,

        /// Who is placing the warning (defaults by session presence)
        #[arg(long, value_enum, env = "BREADCRUMB_SOURCE")]
        source: Option<Source>,

        /// Expiration date (ISO 8601 or YYYY-MM-DD)
        #[arg(short, long)]
        expires: Option<String>,

        /// Time-to-live from now (e.g. 30m, 2h, 7d)
        #[arg(long, conflicts_with = "expires")]
        ttl: Option<String>,

        /// Session ID; the breadcrumb is removed when the session ends
        #[arg(long, env = "BREADCRUMB_SESSION")]
        session: Option<String>,

        /// Only show to humans, not agents
        #[arg(short = 'H', long, conflicts_with = "agent_only")]
        human_only: bool,

        /// Only show to agents, not humans
        #[arg(long)]
        agent_only: bool,

        /// Author attribution
        #[arg(short, long, env = "BREADCRUMB_AUTHOR")]
        author: Option<String>,

        /// Add even when the pattern overlaps existing breadcrumbs
        #[arg(short, long)]
        force: bool,
    },

    /// Edit an existing breadcrumb (message, severity, expiry; never the path)
    Edit {
        /// File path or breadcrumb ID (b_xxxxxx)
        target: String,

        /// New message (replaces existing)
        #[arg(short, long)]
        message: Option<String>,

        /// Append to the existing message
        #[arg(short, long, conflicts_with = "message")]
        append: Option<String>,

        /// New severity
        #[arg(short, long, value_enum)]
        severity: Option<Severity>,

        /// New expiration date (ISO 8601 or YYYY-MM-DD)
        #[arg(short, long)]
        expires: Option<String>,

        /// New time-to-live (e.g. 30m, 2h, 7d)
        #[arg(long, conflicts_with = "expires")]
        ttl: Option<String>,

        /// Remove expiration and TTL from the breadcrumb
        #[arg(long, conflicts_with_all = ["expires", "ttl"])]
        clear_expiration: bool,
    },

    /// Show details of a specific breadcrumb
    Show {
        /// Path of the breadcrumb to show
        path: Option<String>,

        /// Show by breadcrumb ID instead of path
        #[arg(short, long)]
        id: Option<String>,

        /// Human-readable output instead of JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Remove a breadcrumb
    Rm {
        /// Path of the breadcrumb to remove
        path: Option<String>,

        /// Remove by breadcrumb ID instead of path
        #[arg(short, long)]
        id: Option<String>,
    },

    /// Check a path for active breadcrumb warnings
    Check {
        /// File or directory path to check
        path: String,

        /// Recursively check all files under a directory
        #[arg(short, long)]
        recursive: bool,

        /// Filter warnings by audience
        #[arg(long, value_enum)]
        audience: Option<Source>,
    },

    /// List breadcrumbs
    Ls {
        /// Include expired breadcrumbs
        #[arg(short, long)]
        expired: bool,

        /// Filter by severity
        #[arg(short, long, value_enum)]
        severity: Option<Severity>,

        /// Human-readable output instead of JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Search breadcrumb messages
    Search {
        /// Search term or regex pattern
        query: String,

        /// Treat the query as a regular expression
        #[arg(short, long)]
        regex: bool,

        /// Case-insensitive search (default for plain queries)
        #[arg(short, long)]
        ignore_case: bool,

        /// Case-sensitive search (plain queries only)
        #[arg(short, long, conflicts_with = "ignore_case")]
        case_sensitive: bool,

        /// Include expired breadcrumbs
        #[arg(short, long)]
        expired: bool,

        /// Filter by severity
        #[arg(short, long, value_enum)]
        severity: Option<Severity>,

        /// Filter by path segment (matches whole directory or file names)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show breadcrumb coverage for a directory
    Coverage {
        /// Directory to analyze
        #[arg(default_value = ".")]
        path: String,

        /// Glob pattern selecting the files to check
        #[arg(short, long, default_value = "**/*")]
        glob: String,

        /// Include expired breadcrumbs in coverage
        #[arg(short, long)]
        expired: bool,

        /// Include the list of covered files
        #[arg(long)]
        show_covered: bool,

        /// Include the list of uncovered files
        #[arg(long)]
        show_uncovered: bool,

        /// Limit the number of files in each list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show an overview of active breadcrumbs
    Status,

    /// Remove all expired breadcrumbs
    Prune {
        /// Show what would be removed without removing
        #[arg(long)]
        dry_run: bool,
    },

    /// Check staleness of breadcrumbs against current file contents
    Verify {
        /// Optional path prefix to filter breadcrumbs
        path: Option<String>,

        /// Refresh stored hashes for checked breadcrumbs
        #[arg(short, long)]
        update: bool,

        /// Only report stale breadcrumbs
        #[arg(long)]
        stale_only: bool,
    },

    /// Remove breadcrumbs bound to a finished session
    SessionEnd {
        /// Session ID to clean up
        session_id: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
