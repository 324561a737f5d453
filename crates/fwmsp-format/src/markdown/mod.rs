//! Per-entity Markdown renderers.
//!
//! Each renderer is a pure function `(raw payload, metadata) -> Markdown`
//! sharing one signature so the dispatcher can treat them as a flat
//! table. A missing or null `results` array is always treated as an
//! empty list, and absent fields render as documented placeholders —
//! never as the literal tokens `undefined` or `null`.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod alarms;
pub mod boxes;
pub mod devices;
pub mod flows;
pub mod rules;
pub mod search;
pub mod stats;
pub mod target_lists;
pub mod trends;

/// Detail tables are truncated to this many rows, with an explicit
/// "...and N more" trailer for the remainder.
pub const PREVIEW_LIMIT: usize = 10;

/// Placeholder for absent scalar fields.
pub(crate) const NA: &str = "N/A";
/// Placeholder for absent names and owners.
pub(crate) const UNKNOWN: &str = "Unknown";

// ── Shared helpers ──────────────────────────────────────────────────

/// Deserialize the `results` array into typed records. Absent or null
/// `results` yields an empty list; entries that are not objects are
/// skipped rather than failing the whole report.
pub(crate) fn results<T: DeserializeOwned>(raw: &Value) -> Vec<T> {
    raw.get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Report title plus the generation timestamp line.
pub(crate) fn report_header(title: &str) -> String {
    format!(
        "# {title}\n\nGenerated: {}\n\n",
        crate::envelope::format_timestamp()
    )
}

/// Markdown table header row plus separator.
pub(crate) fn table_header(columns: &[&str]) -> String {
    let mut out = String::from("|");
    for col in columns {
        out.push_str(&format!(" {col} |"));
    }
    out.push_str("\n|");
    for _ in columns {
        out.push_str("---|");
    }
    out.push('\n');
    out
}

/// One Markdown table row. Pipes in cell content are softened so they
/// cannot break the table structure.
pub(crate) fn table_row(cells: &[String]) -> String {
    let mut out = String::from("|");
    for cell in cells {
        out.push_str(&format!(" {} |", cell.replace('|', "\\|")));
    }
    out.push('\n');
    out
}

/// Truncation trailer for detail lists: `...and N more devices`.
pub(crate) fn preview_trailer(total: usize, noun: &str) -> String {
    if total > PREVIEW_LIMIT {
        format!("\n...and {} more {noun}\n", total - PREVIEW_LIMIT)
    } else {
        String::new()
    }
}

/// Pagination hint emitted when the payload carries a continuation cursor.
pub(crate) fn pagination_hint(raw: &Value) -> String {
    match raw.get("next_cursor").or_else(|| raw.get("nextCursor")) {
        Some(Value::String(cursor)) if !cursor.is_empty() => format!(
            "\n*More results available. Pass cursor `{cursor}` to fetch the next page.*\n"
        ),
        _ => String::new(),
    }
}

/// Percentage of `part` in `total`, one decimal. Zero total renders 0%.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub(crate) fn pct(part: usize, total: usize) -> String {
    if total == 0 {
        "0%".to_owned()
    } else {
        format!("{:.1}%", part as f64 / total as f64 * 100.0)
    }
}

/// Format a Unix-seconds timestamp for display; absent input renders
/// the standard placeholder.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub(crate) fn fmt_ts(ts: Option<f64>) -> String {
    ts.and_then(|secs| chrono::DateTime::from_timestamp(secs as i64, 0))
        .map_or_else(
            || NA.to_owned(),
            |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
}

/// Count occurrences of a label and return pairs sorted by descending
/// count (ties broken by label for determinism).
pub(crate) fn distribution<I: IntoIterator<Item = String>>(labels: I) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn results_handles_missing_and_null() {
        let empty: Vec<Value> = results(&json!({}));
        assert!(empty.is_empty());
        let null: Vec<Value> = results(&json!({ "results": null }));
        assert!(null.is_empty());
    }

    #[test]
    fn trailer_only_past_the_limit() {
        assert_eq!(preview_trailer(10, "devices"), "");
        assert_eq!(preview_trailer(12, "devices"), "\n...and 2 more devices\n");
    }

    #[test]
    fn pagination_hint_requires_cursor() {
        assert_eq!(pagination_hint(&json!({})), "");
        assert_eq!(pagination_hint(&json!({ "nextCursor": null })), "");
        assert!(pagination_hint(&json!({ "nextCursor": "tok" })).contains("`tok`"));
    }

    #[test]
    fn distribution_sorts_desc_then_by_label() {
        let pairs = distribution(
            ["tcp", "udp", "tcp", "icmp", "udp", "tcp"]
                .into_iter()
                .map(str::to_owned),
        );
        assert_eq!(
            pairs,
            vec![
                ("tcp".to_owned(), 3),
                ("udp".to_owned(), 2),
                ("icmp".to_owned(), 1)
            ]
        );
    }

    #[test]
    fn pct_handles_zero_total() {
        assert_eq!(pct(1, 0), "0%");
        assert_eq!(pct(1, 2), "50.0%");
    }

    #[test]
    fn fmt_ts_placeholder_for_absent() {
        assert_eq!(fmt_ts(None), "N/A");
        assert_eq!(fmt_ts(Some(0.0)), "1970-01-01 00:00:00 UTC");
    }
}
