//! Network rule report.

use serde_json::Value;

use fwmsp_api::types::Rule;

use super::{NA, PREVIEW_LIMIT, UNKNOWN, distribution, pagination_hint, preview_trailer};
use crate::Meta;

pub fn render(raw: &Value, meta: &Meta) -> String {
    let rules: Vec<Rule> = super::results(raw);
    let total = rules.len();
    let active = rules
        .iter()
        .filter(|r| r.status.as_deref() == Some("active"))
        .count();
    let paused = rules
        .iter()
        .filter(|r| r.status.as_deref() == Some("paused"))
        .count();

    let title = match meta.get("query") {
        Some(query) => format!("Rule Search: {query}"),
        None => "Network Rule Report".to_owned(),
    };
    let mut out = super::report_header(&title);

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total rules**: {total}\n"));
    out.push_str(&format!("- **Active**: {active}\n"));
    out.push_str(&format!("- **Paused**: {paused}\n"));

    let actions = distribution(
        rules
            .iter()
            .map(|r| r.action.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if !actions.is_empty() {
        out.push_str("\n## By Action\n\n");
        for (action, count) in actions {
            out.push_str(&format!("- {action}: {count}\n"));
        }
    }

    if !rules.is_empty() {
        out.push_str("\n## Rules\n\n");
        out.push_str(&super::table_header(&[
            "Name", "Action", "Target", "Status", "Hits",
        ]));
        for r in rules.iter().take(PREVIEW_LIMIT) {
            out.push_str(&super::table_row(&[
                r.display_name(),
                r.action.clone().unwrap_or_else(|| NA.to_owned()),
                r.target
                    .as_ref()
                    .and_then(|t| t.value.clone())
                    .unwrap_or_else(|| NA.to_owned()),
                r.status.clone().unwrap_or_else(|| NA.to_owned()),
                r.hit_count().to_string(),
            ]));
        }
        out.push_str(&preview_trailer(total, "rules"));
    }

    out.push_str(&pagination_hint(raw));
    out
}
