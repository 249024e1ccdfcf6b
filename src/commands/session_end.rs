use crate::BreadcrumbContext;
use crate::expiry;
use crate::output::{fail, print_json};
use crate::store::Store;
use anyhow::Result;
use serde_json::json;
use tracing::debug;

/// Execute session-end command - drop every breadcrumb bound to a session.
///
/// Running without a store, or with a session that placed nothing, succeeds
/// with zero removals so cleanup hooks can fire unconditionally.
///
/// # Errors
///
/// Returns an error if the session id is blank or the store cannot be
/// loaded or saved.
pub fn execute(ctx: &BreadcrumbContext, session_id: &str) -> Result<()> {
    if session_id.trim().is_empty() {
        return fail("INVALID_SESSION", "Session ID cannot be empty");
    }

    let Some(store_path) = ctx.store_path.as_deref() else {
        return print_json(&json!({
            "success": true,
            "session_id": session_id,
            "removed": 0,
        }));
    };

    let mut store = Store::load(store_path)?;
    let records = std::mem::take(&mut store.file.breadcrumbs);
    let (removed, remaining) = expiry::split_session(records, session_id);
    store.file.breadcrumbs = remaining;

    if !removed.is_empty() {
        debug!(session_id, removed = removed.len(), "ended session");
        store.save()?;
    }

    print_json(&json!({
        "success": true,
        "session_id": session_id,
        "removed": removed.len(),
        "breadcrumbs_removed": removed.iter().map(|b| json!({
            "id": b.id,
            "path": b.path,
        })).collect::<Vec<_>>(),
    }))
}
