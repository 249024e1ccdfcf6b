use crate::BreadcrumbContext;
use crate::output::print_json;
use crate::store::Store;
use anyhow::Result;
use serde_json::json;

/// Execute init command - create an empty store in the working directory,
/// or at the `BREADCRUMBS_FILE` override when one is set.
///
/// # Errors
///
/// Returns an error if a store file already exists (without `--force`) or
/// the file cannot be written.
pub fn execute(ctx: &BreadcrumbContext, force: bool) -> Result<()> {
    let path = Store::init_target(&ctx.cwd);
    Store::init(&path, force)?;

    print_json(&json!({
        "success": true,
        "path": path,
        "message": format!("Created {}", path.display()),
    }))
}
