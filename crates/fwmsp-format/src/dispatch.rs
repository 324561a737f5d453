//! Renderer dispatch: response type tag to Markdown renderer.
//!
//! Tags with a registered renderer get the enhanced envelope (a
//! `presentation` artifact plus a one-line `summary` ahead of the raw
//! data). Unknown tags fall back to the baseline envelope, so a new
//! endpoint is usable before it has a report of its own.

use serde_json::Value;

use crate::Meta;
use crate::envelope::{data_block, metadata_block};
use crate::markdown;
use crate::xml::escape_xml;

type Renderer = fn(&Value, &Meta) -> String;

/// Look up the Markdown renderer for a response type tag.
pub fn renderer_for(response_type: &str) -> Option<Renderer> {
    match response_type {
        "boxes" => Some(markdown::boxes::render),
        "devices" => Some(markdown::devices::render),
        "alarms" => Some(markdown::alarms::render),
        "rules" => Some(markdown::rules::render),
        "flows" => Some(markdown::flows::render),
        "target_lists" => Some(markdown::target_lists::render),
        "simple_statistics" => Some(markdown::stats::render_simple),
        "statistics" => Some(markdown::stats::render),
        "trends" => Some(markdown::trends::render),
        "search_results" => Some(markdown::search::render),
        _ => None,
    }
}

/// Artifact title for a response type tag.
fn title_for(response_type: &str, metadata: &Meta) -> String {
    let base = match response_type {
        "boxes" => "Firewalla Boxes",
        "devices" => "Device Status",
        "alarms" => "Security Alarms",
        "rules" => "Network Rules",
        "flows" => "Network Flows",
        "target_lists" => "Target Lists",
        "simple_statistics" => "Fleet Statistics",
        "statistics" => "Statistics",
        "trends" => "Trends",
        "search_results" => "Global Search",
        other => other,
    };
    match metadata.get("query") {
        Some(query) => format!("{base}: {query}"),
        None => base.to_owned(),
    }
}

/// Singular and plural nouns for the countable response types.
fn nouns_for(response_type: &str) -> (&'static str, &'static str) {
    match response_type {
        "boxes" => ("box", "boxes"),
        "devices" => ("device", "devices"),
        "alarms" => ("alarm", "alarms"),
        "rules" => ("rule", "rules"),
        "flows" => ("flow", "flows"),
        "target_lists" => ("target list", "target lists"),
        "statistics" => ("entry", "entries"),
        "trends" => ("data point", "data points"),
        "search_results" => ("match", "matches"),
        _ => ("result", "results"),
    }
}

/// One-line summary placed after the presentation block.
fn summary_for(response_type: &str, data: &Value, metadata: &Meta) -> String {
    let count = data
        .get("count")
        .or_else(|| data.get("total"))
        .and_then(Value::as_u64)
        .or_else(|| {
            data.get("results")
                .and_then(Value::as_array)
                .map(|items| u64::try_from(items.len()).unwrap_or(u64::MAX))
        });
    let (singular, plural) = nouns_for(response_type);
    let mut summary = match count {
        Some(1) => format!("1 {singular} returned"),
        Some(n) => format!("{n} {plural} returned"),
        None => format!("{} report generated", title_for(response_type, &Meta::new())),
    };
    if let Some(query) = metadata.get("query") {
        summary.push_str(&format!(" for query `{query}`"));
    }
    summary
}

/// Build the enhanced envelope when a renderer exists for the tag, the
/// baseline envelope otherwise. Never fails: renderers are total over
/// arbitrary JSON.
pub fn render_enhanced(response_type: &str, data: &Value, metadata: &Meta) -> String {
    let Some(renderer) = renderer_for(response_type) else {
        return crate::build_envelope(response_type, metadata, data);
    };

    let report = renderer(data, metadata);
    let title = title_for(response_type, metadata);
    let summary = summary_for(response_type, data, metadata);

    let mut out = String::from("<firewalla_response>\n");
    out.push_str(&metadata_block(response_type, metadata));
    out.push_str("  <presentation>\n");
    out.push_str(&format!(
        "    <artifact_content type=\"markdown\" title=\"{}\">\n",
        escape_xml(&title)
    ));
    out.push_str(&escape_xml(&report));
    if !report.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("    </artifact_content>\n");
    out.push_str("  </presentation>\n");
    out.push_str(&format!("  <summary>{}</summary>\n", escape_xml(&summary)));
    out.push_str(&data_block(data));
    out.push_str("</firewalla_response>");
    out
}
