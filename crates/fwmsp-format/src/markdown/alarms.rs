//! Security alarm report.

use serde_json::Value;

use fwmsp_api::types::{Alarm, Severity};

use super::{NA, PREVIEW_LIMIT, UNKNOWN, distribution, pagination_hint, preview_trailer};
use crate::Meta;
use crate::bytes::format_bytes;

pub fn render(raw: &Value, meta: &Meta) -> String {
    let alarms: Vec<Alarm> = super::results(raw);
    let total = alarms.len();

    // Severity, status, and type breakdowns in one pass each.
    let high = alarms
        .iter()
        .filter(|a| a.severity() == Severity::High)
        .count();
    let medium = alarms
        .iter()
        .filter(|a| a.severity() == Severity::Medium)
        .count();
    let low = total - high - medium;

    let title = match meta.get("query") {
        Some(query) => format!("Alarm Search: {query}"),
        None => "Security Alarm Report".to_owned(),
    };
    let mut out = super::report_header(&title);

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total alarms**: {total}\n"));
    out.push_str(&format!("- **HIGH severity**: {high}\n"));
    out.push_str(&format!("- **MEDIUM severity**: {medium}\n"));
    out.push_str(&format!("- **LOW severity**: {low}\n"));

    let statuses = distribution(
        alarms
            .iter()
            .map(|a| a.status.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if !statuses.is_empty() {
        out.push_str("\n## By Status\n\n");
        for (status, count) in statuses {
            out.push_str(&format!("- {status}: {count}\n"));
        }
    }

    let types = distribution(alarms.iter().map(Alarm::type_label));
    if !types.is_empty() {
        out.push_str("\n## By Type\n\n");
        for (label, count) in types.into_iter().take(5) {
            out.push_str(&format!("- {label}: {count}\n"));
        }
    }

    if !alarms.is_empty() {
        out.push_str("\n## Alarms\n\n");
        out.push_str(&super::table_header(&[
            "Time", "Severity", "Type", "Message", "Device", "Transfer",
        ]));
        for a in alarms.iter().take(PREVIEW_LIMIT) {
            out.push_str(&super::table_row(&[
                super::fmt_ts(a.ts),
                a.severity().to_string(),
                a.type_label(),
                a.message.clone().unwrap_or_else(|| NA.to_owned()),
                a.device
                    .as_ref()
                    .and_then(|d| d.name.clone())
                    .unwrap_or_else(|| UNKNOWN.to_owned()),
                format_bytes(a.transfer.as_ref().and_then(|t| t.total)),
            ]));
        }
        out.push_str(&preview_trailer(total, "alarms"));
    }

    out.push_str(&pagination_hint(raw));
    out
}
