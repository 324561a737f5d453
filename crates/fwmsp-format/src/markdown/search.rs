//! Cross-entity search report.
//!
//! Consumes the serialized search aggregate: a map of entity name to
//! either a hit page or an error marker, so one failing entity never
//! hides the others' results.

use serde_json::Value;

use super::PREVIEW_LIMIT;
use crate::Meta;

pub fn render(raw: &Value, meta: &Meta) -> String {
    let query = meta
        .get("query")
        .cloned()
        .or_else(|| {
            raw.get("query")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_default();
    let total = raw.get("total").and_then(Value::as_u64).unwrap_or(0);

    let mut out = super::report_header(&format!("Global Search: {query}"));
    out.push_str(&format!("**Total matches**: {total}\n"));

    let Some(sections) = raw.get("results").and_then(Value::as_object) else {
        return out;
    };
    for (entity, outcome) in sections {
        out.push_str(&format!("\n## {}\n\n", entity_heading(entity)));
        match outcome.get("outcome").and_then(Value::as_str) {
            Some("failed") => {
                let error = outcome
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                out.push_str(&format!("⚠️ Search failed: {error}\n"));
            }
            _ => {
                let count = outcome.get("count").and_then(Value::as_u64).unwrap_or(0);
                out.push_str(&format!("{count} match(es)\n"));
                let items = outcome
                    .get("results")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if !items.is_empty() {
                    out.push('\n');
                    for item in items.iter().take(PREVIEW_LIMIT) {
                        out.push_str(&format!("- {}\n", item_label(entity, item)));
                    }
                    out.push_str(&super::preview_trailer(items.len(), "matches"));
                }
                if let Some(cursor) = outcome.get("nextCursor").and_then(Value::as_str) {
                    out.push_str(&format!(
                        "\n*More {entity} available. Pass cursor `{cursor}` to fetch the next page.*\n"
                    ));
                }
            }
        }
    }
    out
}

fn entity_heading(entity: &str) -> String {
    match entity {
        "devices" => "Devices".to_owned(),
        "alarms" => "Alarms".to_owned(),
        "rules" => "Rules".to_owned(),
        "flows" => "Flows".to_owned(),
        "target_lists" => "Target Lists".to_owned(),
        other => other.to_owned(),
    }
}

/// One-line label for a raw match, picking the field that identifies
/// the entity best.
fn item_label(entity: &str, item: &Value) -> String {
    let field = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_owned);
    match entity {
        "devices" => field("name").or_else(|| field("ip")),
        "alarms" => field("message"),
        "rules" | "target_lists" => field("name"),
        "flows" => field("domain").or_else(|| field("ip")),
        _ => field("name"),
    }
    .or_else(|| field("id"))
    .unwrap_or_else(|| "(unnamed)".to_owned())
}
