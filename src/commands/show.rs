use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::{Breadcrumb, Severity};
use crate::output::{fail, print_json};
use crate::store::Store;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

/// Execute show command - print one breadcrumb's details by raw path or id.
///
/// Path lookup first tries the raw string as entered, then falls back to
/// normalized comparison, the same way `rm` resolves its target.
///
/// # Errors
///
/// Returns an error if no store exists, neither a path nor an id was
/// given, or nothing matches.
pub fn execute(
    ctx: &BreadcrumbContext,
    path: Option<&str>,
    id: Option<&str>,
    pretty: bool,
) -> Result<()> {
    let store_path = ctx.require_store()?;
    let store = Store::load(store_path)?;

    let record = if let Some(id) = id {
        let Some(record) = store.find_by_id(id) else {
            return fail("NOT_FOUND", format!("No breadcrumb found with ID '{id}'"));
        };
        record
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
        record
    } else {
        return fail("MISSING_ARGUMENT", "Must provide either a path or --id");
    };

    if pretty {
        print_pretty(record);
        return Ok(());
    }

    print_json(&json!({
        "breadcrumb": record,
        "expired": expiry::is_expired(record),
        "expiration": expiry::expiration_info(record),
    }))
}

fn print_pretty(record: &Breadcrumb) {
    let severity = match record.severity {
        Severity::Info => "info".blue(),
        Severity::Warn => "warn".yellow(),
        Severity::Stop => "stop".red().bold(),
    };
    let expired = if expiry::is_expired(record) {
        " (expired)".dimmed().to_string()
    } else {
        String::new()
    };
    println!(
        "{} [{severity}] {}{expired}",
        record.id.dimmed(),
        record.path.bold()
    );
    println!("    {}", record.message);
    println!("    {} {} / {}", "kind:".dimmed(), record.pattern_kind, record.source);
    if let Some(added_by) = &record.added_by {
        println!("    {} {added_by}", "added by:".dimmed());
    }
    if let Some(added_at) = record.added_at {
        println!("    {} {}", "added at:".dimmed(), added_at.to_rfc3339());
    }
    if let Some(info) = expiry::expiration_info(record) {
        println!("    {} {info}", "expires:".dimmed());
    }
    if let Some(hash) = &record.code_hash {
        println!("    {} {hash}", "code hash:".dimmed());
    }
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
    fn test_show_by_equivalent_path_spelling() -> Result<()> {
        let (_dir, ctx) = setup()?;
        add::execute(&ctx, "src/a.rs", "fragile", AddOptions::default())?;

        execute(&ctx, Some("./src/a.rs"), None, false)?;
        execute(&ctx, Some("src/a.rs"), None, true)?;
        Ok(())
    }

    #[test]
    fn test_show_by_id() -> Result<()> {
        let (_dir, ctx) = setup()?;
        add::execute(&ctx, "src/a.rs", "fragile", AddOptions::default())?;
        let id = Store::load(ctx.store_path.as_deref().unwrap())?.file.breadcrumbs[0]
            .id
            .clone();

        execute(&ctx, None, Some(&id), false)?;
        Ok(())
    }

    #[test]
    fn test_show_missing_argument_and_not_found() -> Result<()> {
        let (_dir, ctx) = setup()?;
        let err = execute(&ctx, None, None, false).unwrap_err();
        let cli = err.downcast_ref::<crate::output::CliError>().unwrap();
        assert_eq!(cli.code, "MISSING_ARGUMENT");

        let err = execute(&ctx, Some("ghost.rs"), None, false).unwrap_err();
        let cli = err.downcast_ref::<crate::output::CliError>().unwrap();
        assert_eq!(cli.code, "NOT_FOUND");

        let err = execute(&ctx, None, Some("b_zzzzzz"), false).unwrap_err();
        let cli = err.downcast_ref::<crate::output::CliError>().unwrap();
        assert_eq!(cli.code, "NOT_FOUND");
        Ok(())
    }
}
