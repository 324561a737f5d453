//! Target list report.

use serde_json::Value;

use fwmsp_api::types::TargetList;

use super::{NA, PREVIEW_LIMIT, UNKNOWN, distribution, pagination_hint, preview_trailer};
use crate::Meta;

pub fn render(raw: &Value, _meta: &Meta) -> String {
    let lists: Vec<TargetList> = super::results(raw);
    let total = lists.len();
    let targets_total: usize = lists.iter().map(|l| l.targets.len()).sum();

    let mut out = super::report_header("Target List Report");

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total lists**: {total}\n"));
    out.push_str(&format!("- **Total targets**: {targets_total}\n"));

    let categories = distribution(
        lists
            .iter()
            .map(|l| l.category.clone().unwrap_or_else(|| UNKNOWN.to_owned())),
    );
    if categories.len() > 1 {
        out.push_str("\n## By Category\n\n");
        for (category, count) in categories {
            out.push_str(&format!("- {category}: {count}\n"));
        }
    }

    for list in lists.iter().take(PREVIEW_LIMIT) {
        let name = list.name.clone().unwrap_or_else(|| UNKNOWN.to_owned());
        out.push_str(&format!("\n## {name}\n\n"));
        out.push_str(&format!(
            "- **Owner**: {}\n",
            list.owner.clone().unwrap_or_else(|| UNKNOWN.to_owned())
        ));
        out.push_str(&format!(
            "- **Category**: {}\n",
            list.category.clone().unwrap_or_else(|| NA.to_owned())
        ));
        out.push_str(&format!("- **Targets**: {}\n", list.targets.len()));
        if let Some(notes) = list.notes.as_deref() {
            if !notes.is_empty() {
                out.push_str(&format!("- **Notes**: {notes}\n"));
            }
        }
        if !list.targets.is_empty() {
            out.push('\n');
            for target in list.targets.iter().take(PREVIEW_LIMIT) {
                out.push_str(&format!("  - `{target}`\n"));
            }
            out.push_str(&preview_trailer(list.targets.len(), "targets"));
        }
    }
    out.push_str(&preview_trailer(total, "lists"));

    out.push_str(&pagination_hint(raw));
    out
}
