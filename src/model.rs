//! Stored record types for the breadcrumb store.

use crate::matcher::{PatternKind, PatternSpec};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Warning severity, ordered lowest to highest.
///
/// The derived `Ord` follows declaration order, so `Stop` outranks `Warn`
/// outranks `Info` when picking the highest severity of a match set.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note, never blocks.
    Info,
    /// Proceed with caution.
    #[default]
    Warn,
    /// Human-placed block; agents must not touch the path.
    Stop,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Stop => "stop",
        };
        write!(f, "{name}")
    }
}

/// Who placed a breadcrumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Placed by a person.
    Human,
    /// Placed by an automated agent.
    Agent,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Human => "human",
            Self::Agent => "agent",
        };
        write!(f, "{name}")
    }
}

/// One stored warning bound to a path pattern.
///
/// The `path` and its derived `pattern_kind` are immutable after creation;
/// `edit` mutates message, severity, and expiry only. Changing a path means
/// removing and re-adding the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Unique id in `b_XXXXXX` form.
    pub id: String,
    /// Pattern string exactly as entered.
    pub path: String,
    /// Kind derived from `path` at creation time.
    pub pattern_kind: PatternKind,
    /// Human-readable warning message.
    pub message: String,
    /// Severity of the warning.
    pub severity: Severity,
    /// Whether a human or an agent placed it.
    pub source: Source,
    /// Session the record is bound to; removed by `session-end`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Free-form author attribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    /// Creation timestamp; basis for TTL expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    /// Absolute expiry, RFC 3339 or `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// Relative expiry from `added_at`, e.g. `30m`, `2h`, `7d`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    /// Shown to humans only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_only: Option<bool>,
    /// Shown to agents only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_only: Option<bool>,
    /// Content hash of the target file when last verified (exact kind only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_hash: Option<String>,
    /// When the content hash was last refreshed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
}

impl Breadcrumb {
    /// Creates a record with the kind derived from `path` and all optional
    /// fields unset.
    #[must_use]
    pub fn new(id: String, path: String, message: String, severity: Severity, source: Source) -> Self {
        let pattern_kind = PatternKind::classify(&path);
        Self {
            id,
            path,
            pattern_kind,
            message,
            severity,
            source,
            session_id: None,
            added_by: None,
            added_at: None,
            expires: None,
            ttl: None,
            human_only: None,
            agent_only: None,
            code_hash: None,
            last_verified: None,
        }
    }

    /// The matching unit for this record: raw path plus persisted kind.
    #[must_use]
    pub fn spec(&self) -> PatternSpec {
        PatternSpec::new(self.path.clone(), self.pattern_kind)
    }

    /// Whether the record is visible to the given audience.
    #[must_use]
    pub fn visible_to(&self, audience: Source) -> bool {
        match audience {
            Source::Human => self.agent_only != Some(true),
            Source::Agent => self.human_only != Some(true),
        }
    }
}

/// On-disk shape of `.breadcrumbs.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    /// Format version; currently always 1.
    pub version: u32,
    /// All stored records, in insertion order.
    pub breadcrumbs: Vec<Breadcrumb>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Stop);
    }

    #[test]
    fn test_new_derives_kind() {
        let b = Breadcrumb::new(
            "b_abc123".into(),
            "src/**/*.ts".into(),
            "careful".into(),
            Severity::Warn,
            Source::Human,
        );
        assert_eq!(b.pattern_kind, PatternKind::Glob);
    }

    #[test]
    fn test_audience_flags() {
        let mut b = Breadcrumb::new(
            "b_abc123".into(),
            "a".into(),
            "m".into(),
            Severity::Info,
            Source::Human,
        );
        assert!(b.visible_to(Source::Human));
        assert!(b.visible_to(Source::Agent));

        b.human_only = Some(true);
        assert!(b.visible_to(Source::Human));
        assert!(!b.visible_to(Source::Agent));

        b.human_only = None;
        b.agent_only = Some(true);
        assert!(!b.visible_to(Source::Human));
        assert!(b.visible_to(Source::Agent));
    }

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let b = Breadcrumb::new(
            "b_abc123".into(),
            "README.md".into(),
            "docs owner approval needed".into(),
            Severity::Warn,
            Source::Human,
        );
        let json = serde_json::to_string(&b).unwrap();
        assert!(!json.contains("session_id"));
        assert!(!json.contains("code_hash"));
        assert!(json.contains("\"pattern_kind\":\"exact\""));
    }
}
