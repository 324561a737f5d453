//! Trend report for the time-series endpoints.

use serde_json::Value;

use fwmsp_api::types::TrendPoint;

use super::{NA, PREVIEW_LIMIT, preview_trailer};
use crate::Meta;

pub fn render(raw: &Value, meta: &Meta) -> String {
    let mut points: Vec<TrendPoint> = super::results(raw);
    points.sort_by_key(|p| p.ts);
    let total = points.len();

    let values: Vec<f64> = points.iter().filter_map(|p| p.value).collect();
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let title = match meta.get("trend_type") {
        Some(kind) => format!("Trend Report: {kind}"),
        None => "Trend Report".to_owned(),
    };
    let mut out = super::report_header(&title);

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Data points**: {total}\n"));
    if values.is_empty() {
        out.push_str(&format!("- **Total**: {NA}\n"));
    } else {
        out.push_str(&format!("- **Total**: {sum}\n"));
        out.push_str(&format!("- **Min**: {min}\n"));
        out.push_str(&format!("- **Max**: {max}\n"));
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let avg = sum / values.len() as f64;
        out.push_str(&format!("- **Average**: {avg:.1}\n"));
    }
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        out.push_str(&format!(
            "- **Span**: {} to {}\n",
            fmt_day(first.ts),
            fmt_day(last.ts)
        ));
    }

    if !points.is_empty() {
        out.push_str("\n## Points\n\n");
        out.push_str(&super::table_header(&["Date", "Value"]));
        for p in points.iter().take(PREVIEW_LIMIT) {
            out.push_str(&super::table_row(&[
                fmt_day(p.ts),
                p.value.map_or_else(|| NA.to_owned(), |v| format!("{v}")),
            ]));
        }
        out.push_str(&preview_trailer(total, "points"));
    }
    out
}

fn fmt_day(ts: Option<i64>) -> String {
    ts.and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map_or_else(|| NA.to_owned(), |dt| dt.format("%Y-%m-%d").to_string())
}
