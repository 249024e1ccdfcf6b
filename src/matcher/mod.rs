//! Pattern classification and path matching.
//!
//! A stored path string is classified once, at creation time, into one of
//! three kinds (exact file, directory prefix, glob) and the kind is persisted
//! alongside the raw string. Matching never re-derives the kind, so the
//! classification rules here must stay a pure function of the raw string.
//!
//! Glob matching is deterministic by construction: the working directory used
//! to resolve relative patterns is an explicit field of [`Matcher`], never
//! read from process-global state, and hidden files are always matched
//! (`require_literal_leading_dot = false`) rather than depending on any
//! environment toggle.

pub mod overlap;

use crate::utils::paths;
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Glob metacharacters that force a path string into the Glob kind.
const GLOB_CHARS: [char; 3] = ['*', '?', '['];

/// Classification of a stored path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// A single concrete file path.
    Exact,
    /// A directory prefix (raw string ends with a separator).
    Directory,
    /// A glob pattern containing `*`, `?`, or `[`.
    Glob,
}

impl PatternKind {
    /// Derives the kind from a raw path string.
    ///
    /// Total over any non-empty string; empty strings are rejected by the
    /// validation layer before reaching the engine.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if raw.contains(GLOB_CHARS) {
            Self::Glob
        } else if raw.ends_with('/') {
            Self::Directory
        } else {
            Self::Exact
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Directory => "directory",
            Self::Glob => "glob",
        };
        write!(f, "{name}")
    }
}

/// A raw path string plus its persisted kind: the unit of matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    /// The pattern exactly as the user entered it.
    pub raw: String,
    /// Kind derived at creation time.
    pub kind: PatternKind,
}

impl PatternSpec {
    /// Builds a spec from a raw string, deriving the kind.
    #[must_use]
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = PatternKind::classify(&raw);
        Self { raw, kind }
    }

    /// Builds a spec from a raw string and an already-persisted kind.
    #[must_use]
    pub fn new(raw: impl Into<String>, kind: PatternKind) -> Self {
        Self {
            raw: raw.into(),
            kind,
        }
    }
}

/// Decides whether a pattern matches a target path.
///
/// Carries the working directory explicitly so relative-glob resolution is
/// reproducible in tests without touching process state.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Base directory for resolving relative paths and patterns.
    cwd: PathBuf,
}

impl Matcher {
    /// Creates a matcher rooted at the given working directory.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Creates a matcher rooted at the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Could not determine working directory")?;
        Ok(Self::new(cwd))
    }

    /// The working directory this matcher resolves against.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolves a path against the matcher's cwd and normalizes it.
    #[must_use]
    pub fn normalize(&self, path: impl AsRef<Path>) -> PathBuf {
        paths::normalize(&self.cwd, path.as_ref())
    }

    /// Decides whether `spec` matches `target`.
    ///
    /// Both sides are normalized identically, so `./foo`, `foo`, and the
    /// absolute path to the same file are interchangeable. Malformed glob
    /// patterns match nothing.
    #[must_use]
    pub fn matches(&self, spec: &PatternSpec, target: &Path) -> bool {
        match spec.kind {
            PatternKind::Exact => self.normalize(target) == self.normalize(&spec.raw),
            PatternKind::Directory => {
                let dir = self.normalize(spec.raw.trim_end_matches('/'));
                // Component-wise prefix: "lib" never covers "libfoo"
                self.normalize(target).starts_with(&dir)
            }
            PatternKind::Glob => self.matches_glob(&spec.raw, target),
        }
    }

    fn matches_glob(&self, raw: &str, target: &Path) -> bool {
        let Ok(pattern) = Pattern::new(raw) else {
            return false;
        };
        let normalized = self.normalize(target);

        // Patterns without a separator apply to the basename alone, so
        // "*.ts" fires for src/a.ts and a.ts alike.
        if !raw.contains('/') {
            return normalized
                .file_name()
                .is_some_and(|name| pattern.matches_with(&name.to_string_lossy(), glob_options()));
        }

        pattern.matches_with(&self.relative_to_cwd(target, &normalized), glob_options())
    }

    /// Expresses a target relative to the cwd for glob comparison.
    ///
    /// Targets outside the cwd subtree fall back to the raw string as given,
    /// minus a leading `./`, which keeps relative inputs matchable even when
    /// they cannot be re-rooted.
    fn relative_to_cwd(&self, target: &Path, normalized: &Path) -> String {
        let base = paths::normalize(&self.cwd, Path::new(""));
        match normalized.strip_prefix(&base) {
            Ok(rel) => paths::to_slash(rel),
            Err(_) => paths::trim_dot_slash(&paths::to_slash(target)).to_string(),
        }
    }
}

/// Fixed glob semantics: `*` never crosses a separator, `**` spans any
/// depth, and dotfiles are matched unconditionally.
#[must_use]
pub fn glob_options() -> MatchOptions {
    let mut options = MatchOptions::new();
    options.require_literal_separator = true;
    options.require_literal_leading_dot = false;
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> Matcher {
        Matcher::new("/work")
    }

    #[test]
    fn test_classify() {
        assert_eq!(PatternKind::classify("src/**/*.ts"), PatternKind::Glob);
        assert_eq!(PatternKind::classify("a?c"), PatternKind::Glob);
        assert_eq!(PatternKind::classify("x[ab]"), PatternKind::Glob);
        assert_eq!(PatternKind::classify("lib/"), PatternKind::Directory);
        assert_eq!(PatternKind::classify("README.md"), PatternKind::Exact);
        assert_eq!(PatternKind::classify("src/main.rs"), PatternKind::Exact);
    }

    #[test]
    fn test_exact_match_normalizes_both_sides() {
        let m = matcher();
        let spec = PatternSpec::classify("src/a.ts");
        assert!(m.matches(&spec, Path::new("src/a.ts")));
        assert!(m.matches(&spec, Path::new("./src/a.ts")));
        assert!(m.matches(&spec, Path::new("/work/src/a.ts")));
        assert!(!m.matches(&spec, Path::new("src/b.ts")));
    }

    #[test]
    fn test_directory_prefix_not_substring() {
        let m = matcher();
        let spec = PatternSpec::classify("lib/");
        assert!(m.matches(&spec, Path::new("lib")));
        assert!(m.matches(&spec, Path::new("lib/sub/file.rs")));
        assert!(!m.matches(&spec, Path::new("libfoo/file.rs")));
    }

    #[test]
    fn test_basename_glob_ignores_directories() {
        let m = matcher();
        let spec = PatternSpec::classify("*.ts");
        assert!(m.matches(&spec, Path::new("a/b/x.ts")));
        assert!(m.matches(&spec, Path::new("x.ts")));
        assert!(!m.matches(&spec, Path::new("x.md")));
    }

    #[test]
    fn test_path_glob_matches_relative_form() {
        let m = matcher();
        let spec = PatternSpec::classify("src/**/*.ts");
        assert!(m.matches(&spec, Path::new("src/a.ts")));
        assert!(m.matches(&spec, Path::new("src/deep/nested/b.ts")));
        assert!(m.matches(&spec, Path::new("/work/src/a.ts")));
        assert!(!m.matches(&spec, Path::new("test/a.ts")));
    }

    #[test]
    fn test_single_star_does_not_cross_separator() {
        let m = matcher();
        let spec = PatternSpec::classify("src/*.ts");
        assert!(m.matches(&spec, Path::new("src/a.ts")));
        assert!(!m.matches(&spec, Path::new("src/deep/a.ts")));
    }

    #[test]
    fn test_glob_matches_dotfiles() {
        let m = matcher();
        assert!(m.matches(&PatternSpec::classify("*.env"), Path::new(".prod.env")));
        assert!(m.matches(
            &PatternSpec::classify("conf/*"),
            Path::new("conf/.hidden")
        ));
    }

    #[test]
    fn test_malformed_glob_matches_nothing() {
        let m = matcher();
        let spec = PatternSpec::classify("src/[unclosed");
        assert!(!m.matches(&spec, Path::new("src/unclosed")));
        assert!(!m.matches(&spec, Path::new("src/u")));
    }

    #[test]
    fn test_target_outside_cwd_falls_back_to_raw_form() {
        let m = matcher();
        let spec = PatternSpec::classify("src/*.ts");
        // Absolute target outside /work cannot be re-rooted; the raw string
        // is used as-is and does not match a cwd-relative pattern.
        assert!(!m.matches(&spec, Path::new("/elsewhere/src/a.ts")));
    }

    #[test]
    fn test_question_mark_and_class() {
        let m = matcher();
        assert!(m.matches(&PatternSpec::classify("a?.rs"), Path::new("ab.rs")));
        assert!(!m.matches(&PatternSpec::classify("a?.rs"), Path::new("abc.rs")));
        assert!(m.matches(&PatternSpec::classify("x[ab].rs"), Path::new("xa.rs")));
        assert!(!m.matches(&PatternSpec::classify("x[ab].rs"), Path::new("xc.rs")));
    }
}
