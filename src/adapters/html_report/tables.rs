//! HTML table fragments for the dashboard.
//!
//! Provides functions to generate markup for:
//! - The state ranking by total trade balance
//! - A category breakdown listing alongside its pie chart

use super::chart_svg::{escape_xml, format_money};
use crate::domain::breakdown::CategoryBreakdown;
use crate::domain::ranking::RankedState;

fn money_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => {
            let class = if v < 0.0 { "negative" } else { "positive" };
            format!("<td class=\"num {class}\">{}</td>", format_money(v, 2))
        }
        None => "<td class=\"num missing\">n/a</td>".to_string(),
    }
}

pub fn render_ranking_table(ranking: &[RankedState]) -> String {
    if ranking.is_empty() {
        return "<p class=\"empty\">No states to rank.</p>\n".to_string();
    }

    let mut output = String::new();
    output.push_str("<table class=\"ranking\">\n<thead><tr>");
    for header in [
        "Rank",
        "State",
        "Canada Exports",
        "Canada Imports",
        "Mexico Exports",
        "Mexico Imports",
        "Canada Balance",
        "Mexico Balance",
        "Total Balance",
    ] {
        output.push_str(&format!("<th>{header}</th>"));
    }
    output.push_str("</tr></thead>\n<tbody>\n");

    for ranked in ranking {
        let r = &ranked.record;
        output.push_str("<tr>");
        output.push_str(&format!("<td class=\"num\">{}</td>", ranked.rank));
        output.push_str(&format!("<td>{}</td>", escape_xml(&r.state)));
        for value in [
            r.canada_exports,
            r.canada_imports,
            r.mexico_exports,
            r.mexico_imports,
            r.canada_balance,
            r.mexico_balance,
            r.total_balance,
        ] {
            output.push_str(&money_cell(value));
        }
        output.push_str("</tr>\n");
    }

    output.push_str("</tbody>\n</table>\n");
    output
}

pub fn render_breakdown_table(breakdown: &CategoryBreakdown) -> String {
    if breakdown.is_empty() {
        return "<p class=\"empty\">No category data.</p>\n".to_string();
    }

    let mut output = String::new();
    output.push_str("<table class=\"breakdown\">\n");
    output.push_str("<thead><tr><th>Category</th><th>Value</th><th>Share</th></tr></thead>\n<tbody>\n");
    for share in &breakdown.shares {
        output.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:.1}%</td></tr>\n",
            escape_xml(&share.label),
            format_money(share.value, 2),
            share.percent,
        ));
    }
    output.push_str(&format!(
        "<tr class=\"total\"><td>Total</td><td class=\"num\">{}</td><td class=\"num\">100.0%</td></tr>\n",
        format_money(breakdown.total, 2),
    ));
    output.push_str("</tbody>\n</table>\n");
    output
}
