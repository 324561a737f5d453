//! Network flow report.

use serde_json::Value;

use fwmsp_api::types::Flow;

use super::{NA, PREVIEW_LIMIT, UNKNOWN, distribution, pagination_hint, preview_trailer};
use crate::Meta;
use crate::bytes::format_bytes;

pub fn render(raw: &Value, meta: &Meta) -> String {
    let flows: Vec<Flow> = super::results(raw);
    let total = flows.len();

    let download: u64 = flows.iter().filter_map(|f| f.download).sum();
    let upload: u64 = flows.iter().filter_map(|f| f.upload).sum();
    let volume: u64 = flows
        .iter()
        .map(|f| {
            f.total
                .unwrap_or(f.download.unwrap_or(0) + f.upload.unwrap_or(0))
        })
        .sum();

    let title = match meta.get("query") {
        Some(query) => format!("Flow Search: {query}"),
        None => "Network Flow Report".to_owned(),
    };
    let mut out = super::report_header(&title);

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total flows**: {total}\n"));
    out.push_str(&format!(
        "- **Total volume**: {}\n",
        format_bytes(Some(volume))
    ));
    out.push_str(&format!(
        "- **Downloaded**: {}\n",
        format_bytes(Some(download))
    ));
    out.push_str(&format!("- **Uploaded**: {}\n", format_bytes(Some(upload))));

    let protocols = distribution(
        flows
            .iter()
            .map(|f| f.protocol.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if !protocols.is_empty() {
        out.push_str("\n## By Protocol\n\n");
        for (protocol, count) in protocols {
            out.push_str(&format!("- {protocol}: {count}\n"));
        }
    }

    let directions = distribution(
        flows
            .iter()
            .map(|f| f.direction.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if !directions.is_empty() {
        out.push_str("\n## By Direction\n\n");
        for (direction, count) in directions {
            out.push_str(&format!("- {direction}: {count}\n"));
        }
    }

    if !flows.is_empty() {
        out.push_str("\n## Flows\n\n");
        out.push_str(&super::table_header(&[
            "Time", "Device", "Remote", "Protocol", "Direction", "Total",
        ]));
        for f in flows.iter().take(PREVIEW_LIMIT) {
            out.push_str(&super::table_row(&[
                super::fmt_ts(f.ts),
                f.device
                    .as_ref()
                    .and_then(|d| d.name.clone())
                    .unwrap_or_else(|| UNKNOWN.to_owned()),
                f.remote_name().to_owned(),
                f.protocol.clone().unwrap_or_else(|| NA.to_owned()),
                f.direction.clone().unwrap_or_else(|| NA.to_owned()),
                format_bytes(f.total),
            ]));
        }
        out.push_str(&preview_trailer(total, "flows"));
    }

    out.push_str(&pagination_hint(raw));
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn totals_and_distributions() {
        let raw = json!({
            "results": [
                { "protocol": "tcp", "direction": "out", "download": 1024, "upload": 512, "total": 1536 },
                { "protocol": "tcp", "direction": "in", "download": 1024, "total": 1024 },
                { "protocol": "udp", "direction": "out", "upload": 2048, "total": 2048 },
            ]
        });
        let md = render(&raw, &Meta::new());

        assert!(md.contains("**Total flows**: 3"));
        assert!(md.contains("**Total volume**: 4.5KB"));
        assert!(md.contains("**Downloaded**: 2KB"));
        assert!(md.contains("**Uploaded**: 2.5KB"));
        assert!(md.contains("- tcp: 2"));
        assert!(md.contains("- udp: 1"));
        assert!(md.contains("- out: 2"));
        assert!(md.contains("- in: 1"));
    }

    #[test]
    fn remote_prefers_domain_over_ip() {
        let raw = json!({
            "results": [
                { "domain": "example.com", "ip": "1.2.3.4" },
                { "ip": "5.6.7.8" },
                {},
            ]
        });
        let md = render(&raw, &Meta::new());

        assert!(md.contains("example.com"));
        assert!(!md.contains("1.2.3.4"));
        assert!(md.contains("5.6.7.8"));
    }

    #[test]
    fn missing_total_falls_back_to_sum_of_halves() {
        let raw = json!({
            "results": [
                { "download": 512, "upload": 512 },
            ]
        });
        let md = render(&raw, &Meta::new());
        assert!(md.contains("**Total volume**: 1KB"));
    }

    #[test]
    fn query_appears_in_title() {
        let mut meta = Meta::new();
        meta.insert("query".to_owned(), "protocol:tcp".to_owned());
        let md = render(&json!({ "results": [] }), &meta);
        assert!(md.contains("# Flow Search: protocol:tcp"));
    }
}
