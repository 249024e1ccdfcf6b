//! Command implementations.
//!
//! Every command prints its result as JSON on stdout; human-facing notices
//! (forced overrides, pretty listings) use colored text so they stay out of
//! the machine-readable stream.

pub mod add;
pub mod check;
pub mod coverage;
pub mod edit;
pub mod init;
pub mod ls;
pub mod prune;
pub mod rm;
pub mod search;
pub mod session_end;
pub mod show;
pub mod status;
pub mod verify;

use colored::Colorize;

/// Prints a warning notice on stderr, outside the JSON stream.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}
