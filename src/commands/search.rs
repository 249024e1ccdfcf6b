use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::{Breadcrumb, Severity};
use crate::output::{fail, print_json};
use crate::store::Store;
use anyhow::Result;
use regex::RegexBuilder;
use serde::Serialize;
use serde_json::json;

/// Options for the search command.
#[derive(Debug, Default)]
pub struct SearchOptions {
    /// Treat the query as a regular expression.
    pub regex: bool,
    /// Force case-insensitive matching.
    pub ignore_case: bool,
    /// Force case-sensitive matching (plain queries only).
    pub case_sensitive: bool,
    /// Include expired records.
    pub expired: bool,
    /// Keep only records of this severity.
    pub severity: Option<Severity>,
    /// Keep only records whose path contains this segment.
    pub path: Option<String>,
}

/// A matching record plus the exact text the query hit.
#[derive(Debug, Serialize)]
struct SearchMatch {
    #[serde(flatten)]
    breadcrumb: Breadcrumb,
    matched_text: String,
}

/// Execute search command - find breadcrumbs by message content.
///
/// Plain queries are regex-escaped and case-insensitive unless
/// `--case-sensitive`; regex queries are case-sensitive unless
/// `--ignore-case`. The `--path` filter matches whole path components only,
/// so `lib` finds `src/lib/x.rs` but never `src/libfoo/x.rs`.
///
/// # Errors
///
/// Returns an error if no store exists or a `--regex` query fails to
/// compile.
pub fn execute(ctx: &BreadcrumbContext, query: &str, options: &SearchOptions) -> Result<()> {
    let store_path = ctx.require_store()?;

    let case_insensitive = if options.regex {
        options.ignore_case
    } else {
        !options.case_sensitive
    };
    let source = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    let pattern = match RegexBuilder::new(&source)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(pattern) => pattern,
        Err(err) => return fail("INVALID_REGEX", format!("Invalid regex pattern: {err}")),
    };

    let store = Store::load(store_path)?;

    let mut matches: Vec<SearchMatch> = store
        .file
        .breadcrumbs
        .iter()
        .filter(|b| options.expired || !expiry::is_expired(b))
        .filter(|b| options.severity.is_none_or(|s| b.severity == s))
        .filter(|b| {
            options
                .path
                .as_ref()
                .is_none_or(|segment| matches_path_segment(&b.path, segment))
        })
        .filter_map(|b| {
            pattern.find(&b.message).map(|found| SearchMatch {
                breadcrumb: b.clone(),
                matched_text: found.as_str().to_string(),
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.breadcrumb
            .severity
            .cmp(&a.breadcrumb.severity)
            .then_with(|| a.breadcrumb.path.cmp(&b.breadcrumb.path))
    });

    let warnings = matches
        .iter()
        .filter(|m| m.breadcrumb.severity == Severity::Warn)
        .count();
    let stops = matches
        .iter()
        .filter(|m| m.breadcrumb.severity == Severity::Stop)
        .count();

    print_json(&json!({
        "query": query,
        "regex": options.regex,
        "matches": matches,
        "summary": {
            "total": matches.len(),
            "warnings": warnings,
            "stops": stops,
        },
    }))
}

/// Whether a raw pattern path contains `segment` as a whole component.
///
/// A component also counts when the segment is its stem (`config` matches
/// `config.json`).
fn matches_path_segment(path: &str, segment: &str) -> bool {
    path.replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty())
        .any(|part| part == segment || part.starts_with(&format!("{segment}.")))
}
