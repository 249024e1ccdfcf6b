use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::{Breadcrumb, Severity};
use crate::output::print_json;
use crate::store::Store;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

/// Execute ls command - list stored breadcrumbs.
///
/// Expired records are hidden unless `--expired`; `--pretty` renders a
/// colored human-readable listing instead of JSON.
///
/// # Errors
///
/// Returns an error if no store exists or it cannot be loaded.
pub fn execute(
    ctx: &BreadcrumbContext,
    include_expired: bool,
    severity: Option<Severity>,
    pretty: bool,
) -> Result<()> {
    let store_path = ctx.require_store()?;
    let store = Store::load(store_path)?;

    let listed: Vec<&Breadcrumb> = store
        .file
        .breadcrumbs
        .iter()
        .filter(|b| include_expired || !expiry::is_expired(b))
        .filter(|b| severity.is_none_or(|s| b.severity == s))
        .collect();

    if pretty {
        print_pretty(&listed);
        return Ok(());
    }

    print_json(&json!({
        "total": listed.len(),
        "breadcrumbs": listed,
    }))
}

fn print_pretty(records: &[&Breadcrumb]) {
    if records.is_empty() {
        println!("{}", "No breadcrumbs.".dimmed());
        return;
    }

    for record in records {
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
        if let Some(info) = expiry::expiration_info(record) {
            println!("    {} {info}", "expires:".dimmed());
        }
    }
}
