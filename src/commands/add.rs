use crate::BreadcrumbContext;
use crate::expiry;
use crate::matcher::overlap::find_overlaps;
use crate::matcher::{PatternKind, PatternSpec};
use crate::model::{Breadcrumb, Severity, Source};
use crate::output::{CliError, fail, print_json};
use crate::staleness::{Staleness, check_staleness};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;
use glob::Pattern;
use serde_json::json;
use std::path::Path;
use tracing::debug;

/// Options for the add command.
#[derive(Debug, Default)]
pub struct AddOptions {
    /// Severity of the new warning.
    pub severity: Severity,
    /// Explicit source; derived from session presence when absent.
    pub source: Option<Source>,
    /// Absolute expiration date string.
    pub expires: Option<String>,
    /// Relative time-to-live string.
    pub ttl: Option<String>,
    /// Session affinity.
    pub session: Option<String>,
    /// Visible to humans only.
    pub human_only: bool,
    /// Visible to agents only.
    pub agent_only: bool,
    /// Author attribution.
    pub author: Option<String>,
    /// Commit even when overlapping existing records.
    pub force: bool,
}

/// Execute add command - classify a pattern, vet it against the existing
/// set, and persist a new breadcrumb.
///
/// The overlap analyzer runs before every commit; any reported overlap
/// aborts the add unless `--force` is given, in which case the overlaps are
/// echoed in the result for the caller to audit.
///
/// # Errors
///
/// Returns an error if no store exists, validation fails, the pattern
/// already carries a breadcrumb, or the pattern overlaps existing records
/// without `--force`.
pub fn execute(ctx: &BreadcrumbContext, path: &str, message: &str, options: AddOptions) -> Result<()> {
    let store_path = ctx.require_store()?;

    if path.is_empty() {
        return fail("INVALID_PATH", "Path cannot be empty");
    }
    if message.trim().is_empty() {
        return fail("INVALID_MESSAGE", "Message cannot be empty");
    }

    let source = options
        .source
        .unwrap_or(if options.session.is_some() {
            Source::Agent
        } else {
            Source::Human
        });

    // Only humans may block paths outright
    if source == Source::Agent && options.severity == Severity::Stop {
        return fail(
            "PERMISSION_DENIED",
            "Agents cannot use 'stop' severity. Only humans can block file access.",
        );
    }

    if let Some(expires) = &options.expires {
        expiry::parse_expiry(expires)?;
    }
    if let Some(ttl) = &options.ttl {
        expiry::parse_ttl(ttl)?;
    }

    let spec = PatternSpec::classify(path);

    // Malformed globs would silently match nothing forever; flag them here
    // at the boundary instead.
    if spec.kind == PatternKind::Glob && Pattern::new(path).is_err() {
        return fail(
            "INVALID_PATTERN",
            format!("'{path}' is not a valid glob pattern"),
        );
    }

    let mut store = Store::load(store_path)?;

    if let Some(existing) = store.find_by_path(path) {
        return fail(
            "ALREADY_EXISTS",
            format!(
                "Breadcrumb already exists for path '{path}' (id: {}). Use 'crumb rm' first.",
                existing.id
            ),
        );
    }

    let matcher = ctx.matcher();
    let overlaps = find_overlaps(&matcher, &spec, &store.file.breadcrumbs);
    if !overlaps.is_empty() {
        if options.force {
            super::print_warning(&format!(
                "Adding despite {} overlapping breadcrumb(s)",
                overlaps.len()
            ));
        } else {
            return Err(CliError::new(
                "OVERLAPPING",
                format!(
                    "Pattern '{path}' overlaps {} existing breadcrumb(s). Use --force to add anyway.",
                    overlaps.len()
                ),
            )
            .with_details(serde_json::to_value(&overlaps)?)
            .into());
        }
    }

    let mut record = Breadcrumb::new(
        Store::generate_id(),
        path.to_string(),
        message.to_string(),
        options.severity,
        source,
    );
    record.added_at = Some(Utc::now());
    record.session_id = options.session.clone();
    record.expires = options.expires.clone();
    record.ttl = options.ttl.clone();
    record.human_only = options.human_only.then_some(true);
    record.agent_only = options.agent_only.then_some(true);
    record.added_by = options.author.clone().or_else(|| {
        options
            .session
            .as_ref()
            .map(|s| format!("session-{}", s.chars().take(8).collect::<String>()))
    });

    // Exact patterns get their content hash recorded up front so verify
    // can report staleness without a separate backfill pass.
    if record.pattern_kind == PatternKind::Exact {
        let target = matcher.normalize(Path::new(path));
        let (verdict, fresh) = check_staleness(None, &target, PatternKind::Exact);
        if verdict == Staleness::Unknown
            && let Some(fresh) = fresh
        {
            record.code_hash = Some(fresh);
            record.last_verified = Some(Utc::now());
        }
    }

    debug!(id = %record.id, path = %record.path, kind = %record.pattern_kind, "adding breadcrumb");
    store.file.breadcrumbs.push(record.clone());
    store.save()?;

    print_json(&json!({
        "success": true,
        "breadcrumb": record,
        "overlaps": overlaps,
    }))
}
