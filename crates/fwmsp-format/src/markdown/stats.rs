//! Statistics reports: the fleet-wide summary and the ranked top-N lists.

use serde_json::Value;

use fwmsp_api::types::{SimpleStats, StatsRecord};

use super::{NA, PREVIEW_LIMIT, UNKNOWN, preview_trailer};
use crate::Meta;

/// Fleet summary from `GET /v2/stats/simple`. The payload is a single
/// object rather than a `results` list.
pub fn render_simple(raw: &Value, _meta: &Meta) -> String {
    let stats: SimpleStats = serde_json::from_value(raw.clone()).unwrap_or_default();
    let online = stats.online_boxes.unwrap_or(0);
    let offline = stats.offline_boxes.unwrap_or(0);

    let mut out = super::report_header("Fleet Statistics Summary");
    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Online boxes**: {online}\n"));
    out.push_str(&format!("- **Offline boxes**: {offline}\n"));
    out.push_str(&format!(
        "- **Online rate**: {}\n",
        super::pct(
            usize::try_from(online).unwrap_or(usize::MAX),
            usize::try_from(online + offline).unwrap_or(usize::MAX),
        )
    ));
    out.push_str(&format!("- **Alarms**: {}\n", stats.alarms.unwrap_or(0)));
    out.push_str(&format!("- **Rules**: {}\n", stats.rules.unwrap_or(0)));
    out
}

/// Ranked report from `GET /v2/stats/{type}`.
pub fn render(raw: &Value, meta: &Meta) -> String {
    let records: Vec<StatsRecord> = super::results(raw);
    let total = records.len();

    let title = match meta.get("stats_type") {
        Some(kind) => format!("Statistics: {kind}"),
        None => "Statistics Report".to_owned(),
    };
    let mut out = super::report_header(&title);

    out.push_str(&format!("- **Entries**: {total}\n"));

    if !records.is_empty() {
        out.push_str("\n## Ranking\n\n");
        out.push_str(&super::table_header(&["Rank", "Subject", "Value"]));
        for (rank, record) in records.iter().take(PREVIEW_LIMIT).enumerate() {
            out.push_str(&super::table_row(&[
                (rank + 1).to_string(),
                subject_label(record.meta.as_ref()),
                record
                    .value
                    .map_or_else(|| NA.to_owned(), |v| format!("{v}")),
            ]));
        }
        out.push_str(&preview_trailer(total, "entries"));
    }
    out
}

/// Human label for a ranked entry's subject. Box descriptors carry a
/// `name`, region descriptors a `code`.
fn subject_label(meta: Option<&Value>) -> String {
    let Some(meta) = meta else {
        return UNKNOWN.to_owned();
    };
    if let Some(name) = meta.get("name").and_then(Value::as_str) {
        return name.to_owned();
    }
    if let Some(code) = meta.get("code").and_then(Value::as_str) {
        return code.to_owned();
    }
    if let Some(s) = meta.as_str() {
        return s.to_owned();
    }
    UNKNOWN.to_owned()
}
