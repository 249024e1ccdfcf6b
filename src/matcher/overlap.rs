//! Overlap analysis between a candidate pattern and the stored set.
//!
//! Before a new breadcrumb is committed, every existing record is classified
//! against it as Exact, Subset, Superset, or Intersect, in that order of
//! precedence with first match winning. Reordering the checks changes the
//! user-visible classification, so the sequence here is load-bearing.
//!
//! Glob/glob and glob/directory pairs that survive the subset checks go
//! through a disjointness proof that is deliberately one-sided: it may fail
//! to prove two disjoint patterns disjoint (over-warning), but a pair it
//! declares disjoint never shares a file.

use super::{Matcher, PatternKind, PatternSpec};
use crate::model::Breadcrumb;
use serde::Serialize;
use std::path::Path;

/// How an existing pattern's match set relates to a new pattern's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapKind {
    /// Identical normalized paths.
    Exact,
    /// The new path is already covered by the existing pattern.
    Subset,
    /// The new pattern covers the existing pattern's path.
    Superset,
    /// Neither covers the other but the sets may share files.
    Intersect,
}

/// One overlapping existing record, reported back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Overlap {
    /// Id of the existing record.
    pub id: String,
    /// Raw path of the existing record.
    pub path: String,
    /// Persisted kind of the existing record.
    pub pattern_kind: PatternKind,
    /// Relation of the existing record to the new pattern.
    pub overlap: OverlapKind,
}

/// Outcome of the glob disjointness proof.
///
/// A tagged decision rather than a bool so a real glob-intersection
/// algorithm can replace the heuristic without changing the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disjointness {
    /// The two match sets provably share no file.
    ProvenDisjoint,
    /// No proof found; treat as overlapping.
    PossiblyIntersecting,
}

/// Classifies every existing record against a new pattern.
///
/// Records with no demonstrable relation are omitted from the result.
#[must_use]
pub fn find_overlaps(
    matcher: &Matcher,
    new: &PatternSpec,
    existing: &[Breadcrumb],
) -> Vec<Overlap> {
    let normalized_new = matcher.normalize(&new.raw);
    let mut overlaps = Vec::new();

    for record in existing {
        let spec = record.spec();
        let overlap = if normalized_new == matcher.normalize(&record.path) {
            OverlapKind::Exact
        } else if matcher.matches(&spec, Path::new(&new.raw)) {
            OverlapKind::Subset
        } else if matcher.matches(new, Path::new(&record.path)) {
            OverlapKind::Superset
        } else if new.kind == PatternKind::Glob || spec.kind == PatternKind::Glob {
            match prove_disjoint(matcher, new, &spec) {
                Disjointness::ProvenDisjoint => continue,
                Disjointness::PossiblyIntersecting => OverlapKind::Intersect,
            }
        } else {
            continue;
        };

        overlaps.push(Overlap {
            id: record.id.clone(),
            path: record.path.clone(),
            pattern_kind: record.pattern_kind,
            overlap,
        });
    }

    overlaps
}

/// Attempts to prove two patterns can never match the same file.
#[must_use]
pub fn prove_disjoint(matcher: &Matcher, a: &PatternSpec, b: &PatternSpec) -> Disjointness {
    if let (Some(dir_a), Some(dir_b)) = (base_directory(a), base_directory(b)) {
        let norm_a = matcher.normalize(dir_a);
        let norm_b = matcher.normalize(dir_b);
        let recursive = a.raw.contains("**") || b.raw.contains("**");

        if !recursive {
            // Single-level globs like src/*.ts and test/*.ts only share
            // files when rooted in the same directory.
            if norm_a != norm_b {
                return Disjointness::ProvenDisjoint;
            }
        } else if !norm_a.starts_with(&norm_b) && !norm_b.starts_with(&norm_a) {
            // A recursive glob reaches into descendants only; unrelated
            // subtrees cannot collide.
            return Disjointness::ProvenDisjoint;
        }
    }

    if let (Some(ext_a), Some(ext_b)) = (extension_literal(&a.raw), extension_literal(&b.raw))
        && ext_a != ext_b
    {
        return Disjointness::ProvenDisjoint;
    }

    if let (Some(name_a), Some(name_b)) = (filename_pattern(&a.raw), filename_pattern(&b.raw))
        && !filenames_could_collide(name_a, name_b)
    {
        return Disjointness::ProvenDisjoint;
    }

    Disjointness::PossiblyIntersecting
}

/// The literal directory prefix of a pattern, when it has one.
///
/// Exact paths contribute their parent, directory patterns themselves, and
/// globs the segment chain before the first metacharacter. A glob whose
/// first segment is already wild has no usable base.
fn base_directory(spec: &PatternSpec) -> Option<&str> {
    match spec.kind {
        PatternKind::Exact => Some(parent_str(&spec.raw)),
        PatternKind::Directory => Some(spec.raw.trim_end_matches('/')),
        PatternKind::Glob => {
            let meta = spec.raw.find(['*', '?', '['])?;
            let prefix = &spec.raw[..meta];
            match prefix.rfind('/') {
                Some(slash) if slash > 0 => Some(&prefix[..slash]),
                _ => None,
            }
        }
    }
}

fn parent_str(raw: &str) -> &str {
    match raw.trim_end_matches('/').rfind('/') {
        Some(0) => "/",
        Some(slash) => &raw[..slash],
        None => ".",
    }
}

/// A trailing `*.ext` literal extension, e.g. `src/**/*.ts` → `ts`.
fn extension_literal(raw: &str) -> Option<&str> {
    let star = raw.rfind("*.")?;
    let ext = &raw[star + 2..];
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(ext)
    } else {
        None
    }
}

/// The final path component, only when it actually contains a wildcard.
fn filename_pattern(raw: &str) -> Option<&str> {
    let name = raw.rsplit('/').next().unwrap_or(raw);
    if name.contains(['*', '?', '[']) {
        Some(name)
    } else {
        None
    }
}

/// Conservative filename-level collision check: only rules a pair out when
/// both carry literal prefixes and neither prefix extends the other.
fn filenames_could_collide(a: &str, b: &str) -> bool {
    if a == "*" || b == "*" {
        return true;
    }
    let prefix_a = a.split(['*', '?', '[']).next().unwrap_or("");
    let prefix_b = b.split(['*', '?', '[']).next().unwrap_or("");
    if !prefix_a.is_empty() && !prefix_b.is_empty() && prefix_a != prefix_b {
        return prefix_a.starts_with(prefix_b) || prefix_b.starts_with(prefix_a);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Breadcrumb, Severity, Source};

    fn matcher() -> Matcher {
        Matcher::new("/work")
    }

    fn record(id: &str, path: &str) -> Breadcrumb {
        Breadcrumb::new(
            id.to_string(),
            path.to_string(),
            "test warning".to_string(),
            Severity::Warn,
            Source::Human,
        )
    }

    #[test]
    fn test_same_path_is_exact_only() {
        let m = matcher();
        let new = PatternSpec::classify("src/a.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/a.ts")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Exact);
    }

    #[test]
    fn test_exact_wins_over_subset_for_directory_spelling() {
        // "lib/" and "lib" normalize identically; precedence keeps this
        // classified Exact rather than Subset.
        let m = matcher();
        let new = PatternSpec::classify("lib/");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "lib")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Exact);
    }

    #[test]
    fn test_new_directory_covering_existing_file_is_superset() {
        // Inserting src/ over an existing src/a.ts record: the new pattern
        // covers the existing path, never a bare Intersect.
        let m = matcher();
        let new = PatternSpec::classify("src/");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/a.ts")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Superset);
    }

    #[test]
    fn test_new_path_covered_by_existing_glob_is_subset() {
        let m = matcher();
        let new = PatternSpec::classify("src/a.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/**/*.ts")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Subset);
    }

    #[test]
    fn test_new_glob_covering_existing_path_is_superset() {
        let m = matcher();
        let new = PatternSpec::classify("src/**/*.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/deep/a.ts")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Superset);
    }

    #[test]
    fn test_different_extensions_proven_disjoint() {
        let m = matcher();
        let new = PatternSpec::classify("*.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "*.md")]);
        assert!(overlaps.is_empty());
    }

    #[test]
    fn test_sibling_directories_without_recursion_disjoint() {
        let m = matcher();
        let new = PatternSpec::classify("src/*.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "test/*.ts")]);
        assert!(overlaps.is_empty());
    }

    #[test]
    fn test_recursive_glob_into_unrelated_subtree_disjoint() {
        let m = matcher();
        let new = PatternSpec::classify("src/**/*.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "docs/**/*.ts")]);
        assert!(overlaps.is_empty());
    }

    #[test]
    fn test_recursive_glob_over_narrower_glob_is_superset() {
        // The narrower glob's literal path itself satisfies the wider
        // pattern, so the pair resolves at the Superset step.
        let m = matcher();
        let new = PatternSpec::classify("src/**/*.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/api/*.ts")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Superset);
    }

    #[test]
    fn test_same_directory_globs_without_proof_intersect() {
        // Neither literal path matches through the other and no disjointness
        // rule applies: conservatively reported as Intersect.
        let m = matcher();
        let new = PatternSpec::classify("src/*_test.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/util*.ts")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Intersect);
    }

    #[test]
    fn test_disjoint_filename_prefixes() {
        let m = matcher();
        let new = PatternSpec::classify("src/config_*.rs");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/handler_*.rs")]);
        assert!(overlaps.is_empty());
    }

    #[test]
    fn test_nested_filename_prefixes_still_intersect() {
        // "config" extends "conf"; the prefix rule cannot rule the pair out.
        let m = matcher();
        let new = PatternSpec::classify("src/conf*x");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/config*y")]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].overlap, OverlapKind::Intersect);
    }

    #[test]
    fn test_unrelated_exact_paths_report_nothing() {
        let m = matcher();
        let new = PatternSpec::classify("src/a.ts");
        let overlaps = find_overlaps(&m, &new, &[record("b_000001", "src/b.ts")]);
        assert!(overlaps.is_empty());
    }

    #[test]
    fn test_multiple_records_ordered_as_given() {
        let m = matcher();
        let existing = vec![
            record("b_000001", "src/a.ts"),
            record("b_000002", "src/**/*.ts"),
            record("b_000003", "docs/"),
        ];
        let new = PatternSpec::classify("src/");
        let overlaps = find_overlaps(&m, &new, &existing);
        assert_eq!(overlaps.len(), 2);
        assert_eq!(overlaps[0].id, "b_000001");
        assert_eq!(overlaps[0].overlap, OverlapKind::Superset);
        assert_eq!(overlaps[1].id, "b_000002");
        assert_eq!(overlaps[1].overlap, OverlapKind::Superset);
    }
}
