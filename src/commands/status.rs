use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::Severity;
use crate::output::print_json;
use crate::store::Store;
use anyhow::Result;
use serde_json::json;

/// Execute status command - active totals per severity plus the expired
/// count.
///
/// # Errors
///
/// Returns an error if no store exists or it cannot be loaded.
pub fn execute(ctx: &BreadcrumbContext) -> Result<()> {
    let store_path = ctx.require_store()?;
    let store = Store::load(store_path)?;

    let mut info = 0;
    let mut warnings = 0;
    let mut stops = 0;
    let mut expired = 0;

    for record in &store.file.breadcrumbs {
        if expiry::is_expired(record) {
            expired += 1;
            continue;
        }
        match record.severity {
            Severity::Info => info += 1,
            Severity::Warn => warnings += 1,
            Severity::Stop => stops += 1,
        }
    }

    print_json(&json!({
        "total": info + warnings + stops,
        "info": info,
        "warnings": warnings,
        "stops": stops,
        "expired": expired,
    }))
}
