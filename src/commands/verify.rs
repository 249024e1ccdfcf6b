use crate::BreadcrumbContext;
use crate::matcher::PatternKind;
use crate::output::print_json;
use crate::staleness::{Staleness, check_staleness};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// One record's verification outcome.
#[derive(Debug, Serialize)]
struct VerifyEntry {
    id: String,
    path: String,
    staleness: Staleness,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_hash: Option<String>,
}

/// Execute verify command - compare stored content hashes against the
/// files as they are now.
///
/// Checks run in parallel on the rayon pool. With `--update`, fresh hashes
/// are written back through the store for exact-path records; `--stale-only`
/// narrows the report without changing the counts.
///
/// Returns the exit code: 1 when any record is stale, 0 otherwise.
///
/// # Errors
///
/// Returns an error if no store exists or it cannot be loaded or saved.
pub fn execute(
    ctx: &BreadcrumbContext,
    path: Option<&str>,
    update: bool,
    stale_only: bool,
) -> Result<i32> {
    let store_path = ctx.require_store()?;
    let mut store = Store::load(store_path)?;
    let matcher = ctx.matcher();

    let target = path.map(|p| matcher.normalize(p));
    let selected: Vec<usize> = store
        .file
        .breadcrumbs
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            target.as_ref().is_none_or(|target| {
                let record_path = matcher.normalize(&record.path);
                record_path == *target || record_path.starts_with(target)
            })
        })
        .map(|(index, _)| index)
        .collect();

    if selected.is_empty() {
        print_json(&json!({
            "verified": 0,
            "stale": 0,
            "unknown": 0,
            "breadcrumbs": [],
            "message": path.map_or("No breadcrumbs in store".to_string(), |p| {
                format!("No breadcrumbs found for path: {p}")
            }),
        }))?;
        return Ok(0);
    }

    let outcomes: Vec<(usize, Staleness, Option<String>)> = selected
        .par_iter()
        .map(|&index| {
            let record = &store.file.breadcrumbs[index];
            let record_target = matcher.normalize(&record.path);
            let (verdict, fresh) = check_staleness(
                record.code_hash.as_deref(),
                &record_target,
                record.pattern_kind,
            );
            (index, verdict, fresh)
        })
        .collect();

    let verified = outcomes.iter().filter(|(_, s, _)| *s == Staleness::Verified).count();
    let stale = outcomes.iter().filter(|(_, s, _)| *s == Staleness::Stale).count();
    let unknown = outcomes.len() - verified - stale;

    let mut entries = Vec::new();
    let mut modified = false;
    for (index, verdict, fresh) in outcomes {
        let record = &mut store.file.breadcrumbs[index];

        if !(stale_only && verdict != Staleness::Stale) {
            entries.push(VerifyEntry {
                id: record.id.clone(),
                path: record.path.clone(),
                staleness: verdict,
                message: record.message.clone(),
                stored_hash: record.code_hash.clone(),
                current_hash: fresh.clone(),
            });
        }

        if update
            && record.pattern_kind == PatternKind::Exact
            && let Some(fresh) = fresh
        {
            debug!(id = %record.id, "refreshing content hash");
            record.code_hash = Some(fresh);
            record.last_verified = Some(Utc::now());
            modified = true;
        }
    }

    if modified {
        store.save()?;
    }

    let mut result = json!({
        "verified": verified,
        "stale": stale,
        "unknown": unknown,
        "breadcrumbs": entries,
    });
    if modified {
        result["updated"] = json!(true);
    }
    print_json(&result)?;

    Ok(i32::from(stale > 0))
}
