use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::Breadcrumb;
use crate::output::print_json;
use crate::store::Store;
use anyhow::Result;
use serde_json::json;
use tracing::debug;

/// Execute prune command - drop every expired breadcrumb.
///
/// Running without a store is not an error: cleanup of nothing succeeds
/// with zero removals. `--dry-run` reports what would go without writing.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded or saved.
pub fn execute(ctx: &BreadcrumbContext, dry_run: bool) -> Result<()> {
    let Some(store_path) = ctx.store_path.as_deref() else {
        return print_json(&json!({
            "success": true,
            "removed": 0,
            "remaining": 0,
        }));
    };

    let mut store = Store::load(store_path)?;
    let (expired, remaining): (Vec<Breadcrumb>, Vec<Breadcrumb>) = store
        .file
        .breadcrumbs
        .drain(..)
        .partition(|b| expiry::is_expired(b));

    if dry_run {
        return print_json(&json!({
            "dry_run": true,
            "would_remove": expired.len(),
            "expired": expired.iter().map(|b| json!({
                "id": b.id,
                "path": b.path,
                "expiration": expiry::expiration_info(b),
            })).collect::<Vec<_>>(),
        }));
    }

    let removed = expired.len();
    let kept = remaining.len();
    store.file.breadcrumbs = remaining;
    if removed > 0 {
        debug!(removed, "pruned expired breadcrumbs");
        store.save()?;
    }

    print_json(&json!({
        "success": true,
        "removed": removed,
        "remaining": kept,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, AddOptions};
    use crate::store::STORE_FILE_NAME;
    use tempfile::tempdir;

    #[test]
    fn test_prune_without_store_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let ctx = BreadcrumbContext::new_explicit(dir.path().to_path_buf(), None);
        execute(&ctx, false)?;
        Ok(())
    }

    #[test]
    fn test_prune_removes_only_expired() -> Result<()> {
        let dir = tempdir()?;
        let store_path = dir.path().join(STORE_FILE_NAME);
        Store::init(&store_path, false)?;
        let ctx =
            BreadcrumbContext::new_explicit(dir.path().to_path_buf(), Some(store_path.clone()));

        add::execute(&ctx, "src/a.rs", "keep me", AddOptions::default())?;
        add::execute(
            &ctx,
            "old.rs",
            "gone",
            AddOptions {
                expires: Some("2020-01-01".into()),
                ..AddOptions::default()
            },
        )?;

        // Dry run leaves the store untouched
        execute(&ctx, true)?;
        assert_eq!(Store::load(&store_path)?.file.breadcrumbs.len(), 2);

        execute(&ctx, false)?;
        let store = Store::load(&store_path)?;
        assert_eq!(store.file.breadcrumbs.len(), 1);
        assert_eq!(store.file.breadcrumbs[0].path, "src/a.rs");
        Ok(())
    }
}
