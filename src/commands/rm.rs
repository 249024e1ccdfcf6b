use crate::BreadcrumbContext;
use crate::output::{fail, print_json};
use crate::store::Store;
use anyhow::Result;
use serde_json::json;
use tracing::debug;

/// Execute rm command - remove one breadcrumb by raw path or id.
///
/// Path lookup first tries the raw string as entered, then falls back to
/// normalized comparison so `./src/a.rs` removes a record stored as
/// `src/a.rs`.
///
/// # Errors
///
/// Returns an error if no store exists, neither a path nor an id was
/// given, or nothing matches.
pub fn execute(ctx: &BreadcrumbContext, path: Option<&str>, id: Option<&str>) -> Result<()> {
    let store_path = ctx.require_store()?;

    let mut store = Store::load(store_path)?;

    let target_id = if let Some(id) = id {
        let Some(record) = store.find_by_id(id) else {
            return fail("NOT_FOUND", format!("No breadcrumb found with ID '{id}'"));
        };
        record.id.clone()
    } else if let Some(path) = path {
        let matcher = ctx.matcher();
        let found = store.find_by_path(path).or_else(|| {
            let normalized = matcher.normalize(path);
            store
                .file
                .breadcrumbs
                .iter()
                .find(|b| matcher.normalize(&b.path) == normalized)
        });
        let Some(record) = found else {
            return fail("NOT_FOUND", format!("No breadcrumb found for path '{path}'"));
        };
        record.id.clone()
    } else {
        return fail("MISSING_ARGUMENT", "Must provide either a path or --id");
    };

    let Some(removed) = store.remove_by_id(&target_id) else {
        return fail("NOT_FOUND", format!("No breadcrumb found with ID '{target_id}'"));
    };
    store.save()?;
    debug!(id = %removed.id, path = %removed.path, "removed breadcrumb");

    print_json(&json!({
        "success": true,
        "removed": removed,
    }))
}
