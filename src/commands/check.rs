use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::{Breadcrumb, Severity, Source};
use crate::output::print_json;
use crate::staleness::{Staleness, check_staleness};
use crate::store::Store;
use crate::suggest::generate_suggestion;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A matched record annotated with its staleness verdict.
#[derive(Debug, Serialize)]
struct CheckedBreadcrumb {
    #[serde(flatten)]
    breadcrumb: Breadcrumb,
    staleness: Staleness,
}

/// Execute check command - report every active warning covering a path.
///
/// With `--recursive` on a directory, every regular file underneath is
/// checked and the matches are merged, deduplicated by record id. Expired
/// records never match; audience flags are honored when `--audience` is
/// given. Staleness is computed per match on the rayon pool.
///
/// Returns the exit code: 0 for clear or info, 1 for warn, 2 for stop.
///
/// # Errors
///
/// Returns an error if no store exists or it cannot be loaded.
pub fn execute(
    ctx: &BreadcrumbContext,
    path: &str,
    recursive: bool,
    audience: Option<Source>,
) -> Result<i32> {
    let store_path = ctx.require_store()?;
    let store = Store::load(store_path)?;
    let matcher = ctx.matcher();
    let target = matcher.normalize(path);

    let mut paths_to_check = vec![target.clone()];
    if recursive && target.is_dir() {
        paths_to_check.extend(files_under(&target));
    }

    let mut seen_ids = HashSet::new();
    let mut matched: Vec<&Breadcrumb> = Vec::new();
    for check_path in &paths_to_check {
        for record in &store.file.breadcrumbs {
            if expiry::is_expired(record) {
                continue;
            }
            if let Some(audience) = audience
                && !record.visible_to(audience)
            {
                continue;
            }
            if matcher.matches(&record.spec(), check_path) && seen_ids.insert(record.id.as_str()) {
                matched.push(record);
            }
        }
    }

    let status = matched
        .iter()
        .map(|b| b.severity)
        .max()
        .map_or("clear".to_string(), |s| s.to_string());
    let suggestion = generate_suggestion(&matched.iter().map(|b| (*b).clone()).collect::<Vec<_>>());

    let checked: Vec<CheckedBreadcrumb> = matched
        .par_iter()
        .map(|record| {
            let record_target = matcher.normalize(&record.path);
            let (staleness, _) = check_staleness(
                record.code_hash.as_deref(),
                &record_target,
                record.pattern_kind,
            );
            CheckedBreadcrumb {
                breadcrumb: (*record).clone(),
                staleness,
            }
        })
        .collect();

    let verified = checked
        .iter()
        .filter(|c| c.staleness == Staleness::Verified)
        .count();
    let stale = checked
        .iter()
        .filter(|c| c.staleness == Staleness::Stale)
        .count();

    let mut result = json!({
        "status": status,
        "path": target,
        "breadcrumbs": checked,
        "suggestion": suggestion,
    });
    // Hash bookkeeping is only interesting once some record carries one
    if verified > 0 || stale > 0 {
        result["staleness_summary"] = json!({
            "verified": verified,
            "stale": stale,
            "unknown": checked.len() - verified - stale,
        });
    }
    print_json(&result)?;

    Ok(match matched.iter().map(|b| b.severity).max() {
        Some(Severity::Stop) => 2,
        Some(Severity::Warn) => 1,
        _ => 0,
    })
}

/// Regular files under `dir`, skipping hidden entries and node_modules.
fn files_under(dir: &std::path::Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(name.starts_with('.') && entry.depth() > 0) && name != "node_modules"
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, AddOptions};
    use crate::store::STORE_FILE_NAME;
    use tempfile::tempdir;

    fn setup() -> Result<(tempfile::TempDir, BreadcrumbContext)> {
        let dir = tempdir()?;
        let store_path = dir.path().join(STORE_FILE_NAME);
        Store::init(&store_path, false)?;
        let ctx = BreadcrumbContext::new_explicit(dir.path().to_path_buf(), Some(store_path));
        Ok((dir, ctx))
    }

    #[test]
    fn test_clear_path_exits_zero() -> Result<()> {
        let (_dir, ctx) = setup()?;
        assert_eq!(execute(&ctx, "src/a.rs", false, None)?, 0);
        Ok(())
    }

    #[test]
    fn test_exit_code_follows_highest_severity() -> Result<()> {
        let (_dir, ctx) = setup()?;
        add::execute(
            &ctx,
            "notes.md",
            "informational",
            AddOptions {
                severity: Severity::Info,
                ..AddOptions::default()
            },
        )?;
        add::execute(&ctx, "src/a.rs", "fragile", AddOptions::default())?;
        add::execute(
            &ctx,
            "secrets.env",
            "frozen",
            AddOptions {
                severity: Severity::Stop,
                ..AddOptions::default()
            },
        )?;

        assert_eq!(execute(&ctx, "notes.md", false, None)?, 0);
        assert_eq!(execute(&ctx, "src/a.rs", false, None)?, 1);
        assert_eq!(execute(&ctx, "secrets.env", false, None)?, 2);
        Ok(())
    }

    #[test]
    fn test_expired_records_do_not_match() -> Result<()> {
        let (_dir, ctx) = setup()?;
        add::execute(
            &ctx,
            "src/a.rs",
            "short lived",
            AddOptions {
                expires: Some("2020-01-01".into()),
                ..AddOptions::default()
            },
        )?;
        assert_eq!(execute(&ctx, "src/a.rs", false, None)?, 0);
        Ok(())
    }

    #[test]
    fn test_audience_filter() -> Result<()> {
        let (_dir, ctx) = setup()?;
        add::execute(
            &ctx,
            "src/a.rs",
            "for humans",
            AddOptions {
                human_only: true,
                ..AddOptions::default()
            },
        )?;
        assert_eq!(execute(&ctx, "src/a.rs", false, Some(Source::Agent))?, 0);
        assert_eq!(execute(&ctx, "src/a.rs", false, Some(Source::Human))?, 1);
        Ok(())
    }

    #[test]
    fn test_recursive_dedups_by_id() -> Result<()> {
        let (dir, ctx) = setup()?;
        std::fs::create_dir_all(dir.path().join("src"))?;
        std::fs::write(dir.path().join("src/a.rs"), "a")?;
        std::fs::write(dir.path().join("src/b.rs"), "b")?;
        add::execute(&ctx, "src/", "whole tree", AddOptions::default())?;

        // One directory record matching both files still exits warn once
        assert_eq!(execute(&ctx, "src", true, None)?, 1);
        Ok(())
    }
}
