//! Device status report.

use serde_json::Value;

use fwmsp_api::types::Device;

use super::{NA, PREVIEW_LIMIT, UNKNOWN, distribution, pagination_hint, preview_trailer};
use crate::Meta;

pub fn render(raw: &Value, meta: &Meta) -> String {
    let devices: Vec<Device> = super::results(raw);
    let total = devices.len();
    let online = devices.iter().filter(|d| d.is_online()).count();
    let offline = total - online;

    let title = match meta.get("query") {
        Some(query) => format!("Device Search: {query}"),
        None => "Device Status Report".to_owned(),
    };
    let mut out = super::report_header(&title);

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total devices**: {total}\n"));
    out.push_str(&format!(
        "- **Online**: {online} ({})\n",
        super::pct(online, total)
    ));
    out.push_str(&format!(
        "- **Offline**: {offline} ({})\n",
        super::pct(offline, total)
    ));

    let vendors = distribution(
        devices
            .iter()
            .map(|d| d.mac_vendor.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if vendors.len() > 1 {
        out.push_str("\n## Top Vendors\n\n");
        for (vendor, count) in vendors.into_iter().take(5) {
            out.push_str(&format!("- {vendor}: {count}\n"));
        }
    }

    if !devices.is_empty() {
        out.push_str("\n## Devices\n\n");
        out.push_str(&super::table_header(&[
            "Name", "IP", "MAC", "Status", "Last Seen",
        ]));
        for d in devices.iter().take(PREVIEW_LIMIT) {
            out.push_str(&super::table_row(&[
                d.name.clone().unwrap_or_else(|| UNKNOWN.to_owned()),
                d.ip.clone().unwrap_or_else(|| NA.to_owned()),
                d.mac.clone().unwrap_or_else(|| NA.to_owned()),
                if d.is_online() {
                    "Online".to_owned()
                } else {
                    "Offline".to_owned()
                },
                super::fmt_ts(d.last_seen),
            ]));
        }
        out.push_str(&preview_trailer(total, "devices"));
    }

    out.push_str(&pagination_hint(raw));
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn counts_online_and_offline() {
        let raw = json!({
            "results": [
                { "name": "Laptop", "ip": "10.0.0.2", "online": true },
                { "name": "Printer", "online": false },
                { "online": false },
            ]
        });
        let md = render(&raw, &Meta::new());

        assert!(md.contains("**Total devices**: 3"));
        assert!(md.contains("**Online**: 1 (33.3%)"));
        assert!(md.contains("**Offline**: 2"));
        // Nameless device falls back to the placeholder.
        assert!(md.contains("| Unknown |"));
        assert!(!md.contains("undefined"));
        assert!(!md.contains("null"));
    }

    #[test]
    fn truncates_past_preview_limit() {
        let items: Vec<Value> = (0..14)
            .map(|i| json!({ "name": format!("dev-{i}"), "online": true }))
            .collect();
        let md = render(&json!({ "results": items }), &Meta::new());

        assert!(md.contains("...and 4 more devices"));
        assert!(md.contains("dev-9"));
        assert!(!md.contains("dev-10"));
    }

    #[test]
    fn query_shows_in_title() {
        let mut meta = Meta::new();
        meta.insert("query".into(), "printer".into());
        let md = render(&json!({}), &meta);
        assert!(md.contains("# Device Search: printer"));
    }

    #[test]
    fn pagination_hint_when_cursor_present() {
        let md = render(&json!({ "results": [], "nextCursor": "tok" }), &Meta::new());
        assert!(md.contains("Pass cursor `tok`"));
    }
}
