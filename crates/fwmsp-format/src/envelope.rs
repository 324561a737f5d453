//! Baseline `firewalla_response` envelope.
//!
//! Every tool result is one of these (optionally extended with a
//! presentation and summary by the dispatcher). Consumers that ignore
//! the extras can always recover the raw upstream payload from `data`.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::Meta;
use crate::xml::{escape_xml, value_to_xml};

/// RFC 3339 UTC timestamp captured at format time.
pub(crate) fn format_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render the metadata block: response type, timestamp, then the
/// caller-supplied flat pairs in map order. Metadata values are
/// stringified and escaped directly, never recursively serialized.
pub(crate) fn metadata_block(response_type: &str, metadata: &Meta) -> String {
    let mut out = String::from("  <metadata>\n");
    out.push_str(&format!(
        "    <response_type>{}</response_type>\n",
        escape_xml(response_type)
    ));
    out.push_str(&format!(
        "    <timestamp>{}</timestamp>\n",
        format_timestamp()
    ));
    for (key, value) in metadata {
        let tag = escape_xml(key);
        out.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_xml(value)));
    }
    out.push_str("  </metadata>\n");
    out
}

/// Render the data block: the raw payload, recursively serialized.
pub(crate) fn data_block(data: &Value) -> String {
    format!("  <data>\n{}  </data>\n", value_to_xml(data, 2))
}

/// Build the baseline envelope: metadata plus raw data, no presentation.
pub fn build_envelope(response_type: &str, metadata: &Meta, data: &Value) -> String {
    format!(
        "<firewalla_response>\n{}{}</firewalla_response>",
        metadata_block(response_type, metadata),
        data_block(data)
    )
}
