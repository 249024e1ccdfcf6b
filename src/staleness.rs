//! Content-hash staleness verdicts for stored breadcrumbs.
//!
//! A breadcrumb written against an exact file path records the file's
//! content hash at verification time; comparing that stored hash against a
//! fresh one tells whether the warning still describes the code it was
//! written about. Directory and glob patterns cover many files and are never
//! verifiable against a single hash.

use crate::matcher::PatternKind;
use crate::utils::hash;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Verdict of one staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Staleness {
    /// Stored hash matches the current file content.
    Verified,
    /// File content changed since the hash was recorded.
    Stale,
    /// No stored hash, non-exact pattern, or unreadable target.
    Unknown,
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verified => "verified",
            Self::Stale => "stale",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Compares a stored content hash against the file's current content.
///
/// The fresh hash is returned whenever it could be computed, even on
/// `Unknown`, so a caller with no stored hash can opportunistically backfill.
/// This function never mutates stored state; persisting the fresh hash is an
/// explicit operation of the store layer.
#[must_use]
pub fn check_staleness(
    stored: Option<&str>,
    path: &Path,
    kind: PatternKind,
) -> (Staleness, Option<String>) {
    if kind != PatternKind::Exact {
        return (Staleness::Unknown, None);
    }

    let Ok(fresh) = hash::hash_file(path) else {
        return (Staleness::Unknown, None);
    };

    match stored {
        None => (Staleness::Unknown, Some(fresh)),
        Some(stored) if stored == fresh => (Staleness::Verified, Some(fresh)),
        Some(_) => (Staleness::Stale, Some(fresh)),
    }
}
