use crate::BreadcrumbContext;
use crate::expiry;
use crate::matcher::glob_options;
use crate::model::Breadcrumb;
use crate::output::{fail, print_json};
use crate::store::Store;
use crate::utils::paths;
use anyhow::Result;
use glob::Pattern;
use serde_json::json;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never counted toward coverage.
const SKIPPED_DIRS: [&str; 6] = ["node_modules", ".git", "dist", "build", "target", ".next"];

/// Options for the coverage command.
#[derive(Debug)]
pub struct CoverageOptions {
    /// Glob selecting the files to analyze, relative to the directory.
    pub glob: String,
    /// Count expired breadcrumbs as coverage.
    pub expired: bool,
    /// Include the covered file list in the output.
    pub show_covered: bool,
    /// Include the uncovered file list in the output.
    pub show_uncovered: bool,
    /// Cap on each file list.
    pub limit: usize,
}

/// Execute coverage command - report how much of a directory tree carries
/// breadcrumbs.
///
/// Walks the directory (skipping VCS and build output directories plus
/// hidden entries), keeps files matching the `--glob` selector, and counts
/// each one covered when any active breadcrumb matches it.
///
/// # Errors
///
/// Returns an error if no store exists, the limit is zero, or the glob
/// selector is malformed.
pub fn execute(ctx: &BreadcrumbContext, path: &str, options: &CoverageOptions) -> Result<()> {
    let store_path = ctx.require_store()?;

    if options.limit == 0 {
        return fail("INVALID_LIMIT", "Limit must be a positive integer.");
    }
    let Ok(selector) = Pattern::new(&options.glob) else {
        return fail(
            "INVALID_PATTERN",
            format!("'{}' is not a valid glob pattern", options.glob),
        );
    };

    let store = Store::load(store_path)?;
    let matcher = ctx.matcher();
    let target_dir = matcher.normalize(path);

    let files = collect_files(&target_dir, &selector);
    if files.is_empty() {
        return print_json(&json!({
            "path": target_dir,
            "total_files": 0,
            "covered_files": 0,
            "uncovered_files": 0,
            "coverage_percent": 0.0,
            "message": "No files found matching the pattern.",
        }));
    }

    let active: Vec<&Breadcrumb> = store
        .file
        .breadcrumbs
        .iter()
        .filter(|b| options.expired || !expiry::is_expired(b))
        .collect();

    let mut covered = Vec::new();
    let mut uncovered = Vec::new();
    for file in &files {
        let display = relative_display(&target_dir, file);
        if active.iter().any(|b| matcher.matches(&b.spec(), file)) {
            covered.push(display);
        } else {
            uncovered.push(display);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let percent = (covered.len() as f64 / files.len() as f64 * 1000.0).round() / 10.0;

    let covered_listed: &[String] = if options.show_covered {
        &covered[..covered.len().min(options.limit)]
    } else {
        &[]
    };
    let uncovered_listed: &[String] = if options.show_uncovered {
        &uncovered[..uncovered.len().min(options.limit)]
    } else {
        &[]
    };

    let mut result = json!({
        "path": target_dir,
        "total_files": files.len(),
        "covered_files": covered.len(),
        "uncovered_files": uncovered.len(),
        "coverage_percent": percent,
        "covered": covered_listed,
        "uncovered": uncovered_listed,
    });
    if options.show_covered && covered.len() > options.limit {
        result["covered_truncated"] = json!(true);
        result["covered_total"] = json!(covered.len());
    }
    if options.show_uncovered && uncovered.len() > options.limit {
        result["uncovered_truncated"] = json!(true);
        result["uncovered_total"] = json!(uncovered.len());
    }
    print_json(&result)
}

/// Regular files under `dir` matching `selector`, sorted for stable output.
fn collect_files(dir: &Path, selector: &Pattern) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            if entry.depth() == 0 {
                return true;
            }
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|file| {
            file.strip_prefix(dir)
                .is_ok_and(|rel| selector.matches_with(&paths::to_slash(rel), glob_options()))
        })
        .collect();
    files.sort();
    files
}

/// A file expressed relative to the analyzed directory for display.
fn relative_display(dir: &Path, file: &Path) -> String {
    file.strip_prefix(dir).map_or_else(
        |_| {
            file.file_name()
                .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned())
        },
        paths::to_slash,
    )
}
