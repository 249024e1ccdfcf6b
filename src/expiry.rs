//! Expiry bookkeeping: absolute dates, relative TTLs, session cleanup.
//!
//! Malformed expiry data on a stored record counts as expired rather than
//! immortal, so corrupt records age out on their own instead of warning
//! forever.

use crate::model::Breadcrumb;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Parses a TTL string like `30m`, `2h`, or `7d`.
///
/// # Errors
///
/// Returns an error for any other shape, including missing units and
/// non-numeric values.
pub fn parse_ttl(ttl: &str) -> Result<Duration> {
    let bad = || anyhow!("Invalid TTL format: {ttl}. Use format like 30m, 2h, or 7d");
    let unit = ttl.chars().next_back().ok_or_else(bad)?;
    let value: i64 = ttl[..ttl.len() - unit.len_utf8()].parse().map_err(|_| bad())?;
    if value < 0 {
        return Err(bad());
    }
    match unit {
        'm' => Ok(Duration::minutes(value)),
        'h' => Ok(Duration::hours(value)),
        'd' => Ok(Duration::days(value)),
        _ => Err(bad()),
    }
}

/// Parses an expiry date, accepting RFC 3339 or bare `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error when the string fits neither shape.
pub fn parse_expiry(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc());
    }
    Err(anyhow!(
        "Invalid expiration date '{raw}'. Use ISO 8601 or YYYY-MM-DD format."
    ))
}

/// Whether a record has expired as of `now`.
///
/// Checks the absolute date first, then `added_at + ttl`. A record whose
/// expiry data cannot be parsed, or whose TTL lacks a creation timestamp to
/// anchor against, is treated as expired (fail-safe).
#[must_use]
pub fn is_expired_at(record: &Breadcrumb, now: DateTime<Utc>) -> bool {
    if let Some(expires) = &record.expires {
        match parse_expiry(expires) {
            Ok(when) => {
                if when < now {
                    return true;
                }
            }
            Err(_) => return true,
        }
    }

    if let Some(ttl) = &record.ttl {
        let Some(added_at) = record.added_at else {
            return true;
        };
        match parse_ttl(ttl) {
            Ok(duration) => {
                if added_at + duration < now {
                    return true;
                }
            }
            Err(_) => return true,
        }
    }

    false
}

/// Whether a record has expired as of the current wall clock.
#[must_use]
pub fn is_expired(record: &Breadcrumb) -> bool {
    is_expired_at(record, Utc::now())
}

/// Human-oriented description of when a record expires, if ever.
#[must_use]
pub fn expiration_info(record: &Breadcrumb) -> Option<String> {
    if let Some(session) = &record.session_id {
        return Some(format!("session: {session}"));
    }

    if let (Some(ttl), Some(added_at)) = (&record.ttl, record.added_at)
        && let Ok(duration) = parse_ttl(ttl)
    {
        return Some((added_at + duration).to_rfc3339());
    }

    record.expires.clone()
}

/// Splits records into those bound to `session_id` and the rest.
#[must_use]
pub fn split_session(records: Vec<Breadcrumb>, session_id: &str) -> (Vec<Breadcrumb>, Vec<Breadcrumb>) {
    records
        .into_iter()
        .partition(|b| b.session_id.as_deref() == Some(session_id))
}
