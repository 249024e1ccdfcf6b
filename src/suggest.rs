//! Suggestion text summarizing a set of matched breadcrumbs for the caller.

use crate::model::{Breadcrumb, Severity};

/// Maximum summary length when a message has no sentence boundary.
const SUMMARY_LIMIT: usize = 100;

/// Builds a short actionable summary of the matched records, highest
/// severity first. Returns `None` for an empty match set.
#[must_use]
pub fn generate_suggestion(matches: &[Breadcrumb]) -> Option<String> {
    if matches.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Breadcrumb> = matches.iter().collect();
    sorted.sort_by(|a, b| b.severity.cmp(&a.severity));

    let lines: Vec<String> = sorted
        .iter()
        .map(|record| {
            let summary = first_sentence(&record.message);
            match record.severity {
                Severity::Stop => format!("Do not touch this path without human approval. {summary}"),
                Severity::Warn => format!("Proceed with caution. {summary}"),
                Severity::Info => summary,
            }
        })
        .collect();

    Some(lines.join("\n"))
}

/// Extracts the first sentence of a message, or truncates long unpunctuated
/// text. Sentence ends are `.`, `!`, `?` followed by whitespace or
/// end-of-string, which keeps filenames like `config.json` intact.
fn first_sentence(message: &str) -> String {
    let trimmed = message.trim();
    for (index, ch) in trimmed.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let rest = &trimmed[index + ch.len_utf8()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return trimmed[..index + ch.len_utf8()].to_string();
            }
        }
    }

    if trimmed.chars().count() > SUMMARY_LIMIT {
        let cut: String = trimmed.chars().take(SUMMARY_LIMIT).collect();
        format!("{}...", cut.trim_end())
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;

    fn record(message: &str, severity: Severity) -> Breadcrumb {
        Breadcrumb::new(
            "b_abc123".into(),
            "src/a.rs".into(),
            message.into(),
            severity,
            Source::Human,
        )
    }

    #[test]
    fn test_empty_matches_no_suggestion() {
        assert!(generate_suggestion(&[]).is_none());
    }

    #[test]
    fn test_first_sentence_skips_filename_dots() {
        assert_eq!(
            first_sentence("Edit config.json only via the schema. Everything else breaks."),
            "Edit config.json only via the schema."
        );
    }

    #[test]
    fn test_long_message_truncated() {
        let long = "x".repeat(150);
        let summary = first_sentence(&long);
        assert!(summary.ends_with("..."));
        assert!(summary.len() <= SUMMARY_LIMIT + 3);
    }

    #[test]
    fn test_sorted_by_severity_desc() {
        let matches = vec![
            record("Informational note.", Severity::Info),
            record("Frozen until release.", Severity::Stop),
            record("Fragile parser.", Severity::Warn),
        ];
        let suggestion = generate_suggestion(&matches).unwrap();
        let lines: Vec<&str> = suggestion.lines().collect();
        assert!(lines[0].contains("Frozen until release."));
        assert!(lines[0].starts_with("Do not touch"));
        assert!(lines[1].starts_with("Proceed with caution."));
        assert_eq!(lines[2], "Informational note.");
    }
}
