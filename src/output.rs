//! JSON output plumbing.
//!
//! Results go to stdout as pretty-printed JSON; failures surface as
//! `{error, code, message}` objects on stderr so agent callers can branch on
//! the code without parsing prose.

use serde::Serialize;
use std::fmt;

/// Prints a serializable value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A command failure with a machine-readable code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Always true; marks the object as an error for stream consumers.
    pub error: bool,
    /// Stable error code, e.g. `NO_CONFIG` or `NOT_FOUND`.
    pub code: &'static str,
    /// Human-readable description.
    pub message: String,
    /// Structured payload, e.g. the overlap list behind an OVERLAPPING error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CliError {
    /// Builds an error carrying the given code and message.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            error: true,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches a structured payload to the error body.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The stderr representation of this error.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.message.clone())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

/// Shorthand for `Err(CliError::new(..).into())`.
pub fn fail<T>(code: &'static str, message: impl Into<String>) -> anyhow::Result<T> {
    Err(CliError::new(code, message).into())
}
