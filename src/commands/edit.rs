use crate::BreadcrumbContext;
use crate::expiry;
use crate::model::Severity;
use crate::output::{fail, print_json};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;
use serde_json::{Value, json};

/// Options for the edit command.
#[derive(Debug, Default)]
pub struct EditOptions {
    /// Replacement message.
    pub message: Option<String>,
    /// Text appended to the existing message.
    pub append: Option<String>,
    /// New severity.
    pub severity: Option<Severity>,
    /// New absolute expiration.
    pub expires: Option<String>,
    /// New relative time-to-live.
    pub ttl: Option<String>,
    /// Drop expiration and TTL.
    pub clear_expiration: bool,
}

impl EditOptions {
    fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.append.is_none()
            && self.severity.is_none()
            && self.expires.is_none()
            && self.ttl.is_none()
            && !self.clear_expiration
    }
}

/// Execute edit command - mutate a breadcrumb's message, severity, or
/// expiry.
///
/// The target is a record id when it starts with `b_`, otherwise a path.
/// The path and its kind are immutable; changing them means rm + add.
/// Setting `--expires` clears any TTL and vice versa, so a record never
/// carries both.
///
/// # Errors
///
/// Returns an error if no store exists, no change was requested, the
/// target is unknown, the expiration is malformed or in the past, or the
/// TTL is malformed.
pub fn execute(ctx: &BreadcrumbContext, target: &str, options: &EditOptions) -> Result<()> {
    let store_path = ctx.require_store()?;

    if options.is_empty() {
        return fail(
            "NO_CHANGES",
            "No changes specified. Use --message, --append, --severity, --expires, --ttl, or --clear-expiration.",
        );
    }

    if let Some(expires) = &options.expires {
        let when = match expiry::parse_expiry(expires) {
            Ok(when) => when,
            Err(err) => return fail("INVALID_DATE", err.to_string()),
        };
        if when <= Utc::now() {
            return fail("INVALID_DATE", "Expiration date must be in the future.");
        }
    }
    if let Some(ttl) = &options.ttl
        && let Err(err) = expiry::parse_ttl(ttl)
    {
        return fail("INVALID_TTL", err.to_string());
    }

    let mut store = Store::load(store_path)?;

    let by_id = target.starts_with("b_");
    let index = if by_id {
        store.file.breadcrumbs.iter().position(|b| b.id == target)
    } else {
        let matcher = ctx.matcher();
        let normalized = matcher.normalize(target);
        store
            .file
            .breadcrumbs
            .iter()
            .position(|b| b.path == target || matcher.normalize(&b.path) == normalized)
    };
    let Some(index) = index else {
        return fail(
            "NOT_FOUND",
            if by_id {
                format!("No breadcrumb found with ID '{target}'.")
            } else {
                format!("No breadcrumb found for path '{target}'.")
            },
        );
    };

    let record = &mut store.file.breadcrumbs[index];
    let original_message = record.message.clone();

    if let Some(message) = &options.message {
        record.message = message.clone();
    }
    if let Some(append) = &options.append {
        record.message = format!("{} {append}", record.message);
    }
    if let Some(severity) = options.severity {
        record.severity = severity;
    }
    if options.clear_expiration {
        record.expires = None;
        record.ttl = None;
    } else {
        // The newest expiry wins outright; the other form is dropped
        if let Some(expires) = &options.expires {
            record.expires = Some(expires.clone());
            record.ttl = None;
        }
        if let Some(ttl) = &options.ttl {
            record.ttl = Some(ttl.clone());
            record.expires = None;
        }
    }

    let record = record.clone();
    store.save()?;

    let message_change: Value = if let Some(message) = &options.message {
        json!({ "from": original_message, "to": message })
    } else if let Some(append) = &options.append {
        json!({ "from": original_message, "appended": append })
    } else {
        Value::Null
    };

    print_json(&json!({
        "success": true,
        "breadcrumb": record,
        "changes": {
            "message": message_change,
            "severity": options.severity,
            "expires": options.expires,
            "ttl": options.ttl,
            "cleared_expiration": if options.clear_expiration { json!(true) } else { Value::Null },
        },
    }))
}
