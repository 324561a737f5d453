//! Box fleet report.

use serde_json::Value;

use fwmsp_api::types::BoxInfo;

use super::{NA, PREVIEW_LIMIT, UNKNOWN, distribution, pagination_hint, preview_trailer};
use crate::Meta;

pub fn render(raw: &Value, _meta: &Meta) -> String {
    let boxes: Vec<BoxInfo> = super::results(raw);
    let total = boxes.len();
    let online = boxes.iter().filter(|b| b.online.unwrap_or(false)).count();
    let offline = total - online;

    let mut out = super::report_header("Firewalla Box Fleet");

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total boxes**: {total}\n"));
    out.push_str(&format!(
        "- **Online**: {online} ({})\n",
        super::pct(online, total)
    ));
    out.push_str(&format!("- **Offline**: {offline}\n"));

    let models = distribution(
        boxes
            .iter()
            .map(|b| b.model.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if !models.is_empty() {
        out.push_str("\n## Models\n\n");
        for (model, count) in models {
            out.push_str(&format!("- {model}: {count}\n"));
        }
    }

    if !boxes.is_empty() {
        out.push_str("\n## Boxes\n\n");
        out.push_str(&super::table_header(&[
            "Name", "Model", "Mode", "Version", "Status", "Devices",
        ]));
        for b in boxes.iter().take(PREVIEW_LIMIT) {
            out.push_str(&super::table_row(&[
                b.name.clone().unwrap_or_else(|| UNKNOWN.to_owned()),
                b.model.clone().unwrap_or_else(|| NA.to_owned()),
                b.mode.clone().unwrap_or_else(|| NA.to_owned()),
                b.version.clone().unwrap_or_else(|| NA.to_owned()),
                if b.online.unwrap_or(false) {
                    "Online".to_owned()
                } else {
                    "Offline".to_owned()
                },
                b.device_count.map_or_else(|| "0".to_owned(), |c| c.to_string()),
            ]));
        }
        out.push_str(&preview_trailer(total, "boxes"));
    }

    out.push_str(&pagination_hint(raw));
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_online_box_report() {
        let raw = json!({
            "results": [{ "name": "Office Firewalla", "model": "Gold Plus", "online": true }],
            "count": 1
        });
        let md = render(&raw, &Meta::new());

        assert!(md.contains("**Total boxes**: 1"));
        assert!(md.contains("**Online**: 1"));
        assert!(md.contains("| Office Firewalla | Gold Plus |"));
        assert!(md.contains("Online"));
        assert!(!md.contains("undefined"));
        assert!(!md.contains("null"));
    }

    #[test]
    fn missing_results_reports_zero() {
        let md = render(&json!({}), &Meta::new());
        assert!(md.contains("**Total boxes**: 0"));
        assert!(!md.contains("undefined"));
        assert!(!md.contains("null"));
    }
}
