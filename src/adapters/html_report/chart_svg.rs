//! SVG chart rendering for the dashboard.
//!
//! Two charts: a tile-grid choropleth of the 50 states shaded by total trade
//! balance, and a pie chart for a category breakdown.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::domain::breakdown::CategoryBreakdown;
use crate::domain::states::{StateInfo, GRID_COLS, GRID_ROWS, STATES};
use crate::domain::trade::{StateTradeRecord, TradeTable};

/// Colour range never narrower than ±50 (million $).
pub const MIN_COLOR_RANGE: f64 = 50.0;

const TILE: f64 = 52.0;
const GAP: f64 = 4.0;
const LEGEND_HEIGHT: f64 = 56.0;
const MISSING_FILL: &str = "#d1d5db";

const DEFICIT_RGB: (f64, f64, f64) = (139.0, 0.0, 0.0);
const SURPLUS_RGB: (f64, f64, f64) = (0.0, 100.0, 0.0);

const PIE_COLORS: [&str; 10] = [
    "#2563eb", "#f59e0b", "#10b981", "#ef4444", "#8b5cf6", "#6b7280", "#ec4899", "#14b8a6",
    "#f97316", "#84cc16",
];

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `-1234567.891` -> `-$1,234,568` with `decimals = 0`.
pub fn format_money(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }

    let negative = value < 0.0 && grouped.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format_money(v, 2))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Symmetric colour range for `table`: the largest absolute total balance,
/// at least [`MIN_COLOR_RANGE`].
pub fn color_range(table: &TradeTable) -> f64 {
    let max_abs = table
        .total_balance_range()
        .map(|(lo, hi)| lo.abs().max(hi.abs()))
        .unwrap_or(0.0);
    max_abs.max(MIN_COLOR_RANGE)
}

/// Dark red at `-range`, white at zero, dark green at `+range`.
pub fn diverging_color(value: f64, range: f64) -> String {
    let t = if range > 0.0 {
        (value / range).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let (target, weight) = if t < 0.0 {
        (DEFICIT_RGB, -t)
    } else {
        (SURPLUS_RGB, t)
    };
    let mix = |end: f64| (255.0 + (end - 255.0) * weight).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(target.0), mix(target.1), mix(target.2))
}

fn tooltip(info: &StateInfo, record: Option<&StateTradeRecord>) -> String {
    match record {
        None => format!("{}: no data", info.name),
        Some(r) => format!(
            "{}\nCanada Exports: {}\nCanada Imports: {}\nMexico Exports: {}\nMexico Imports: {}\nTrade Balance: {}",
            info.name,
            format_optional(r.canada_exports),
            format_optional(r.canada_imports),
            format_optional(r.mexico_exports),
            format_optional(r.mexico_imports),
            format_optional(r.total_balance),
        ),
    }
}

/// Tile-grid choropleth of total balance. States absent from the table, or
/// with no total balance, are drawn grey.
pub fn choropleth_svg(table: &TradeTable) -> String {
    let range = color_range(table);
    let width = f64::from(GRID_COLS) * (TILE + GAP) + GAP;
    let grid_height = f64::from(GRID_ROWS) * (TILE + GAP) + GAP;
    let height = grid_height + LEGEND_HEIGHT;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width:.0} {height:.0}" class="choropleth" role="img">"#
    );

    for info in STATES.iter() {
        let record = table.get(info.name);
        let fill = record
            .and_then(|r| r.total_balance)
            .map(|v| diverging_color(v, range))
            .unwrap_or_else(|| MISSING_FILL.to_string());
        let x = GAP + f64::from(info.col) * (TILE + GAP);
        let y = GAP + f64::from(info.row) * (TILE + GAP);
        let _ = write!(
            svg,
            r##"<g class="tile" data-state="{code}"><title>{title}</title><rect x="{x:.0}" y="{y:.0}" width="{TILE:.0}" height="{TILE:.0}" rx="4" fill="{fill}" stroke="#ffffff"/><text x="{tx:.0}" y="{ty:.0}" text-anchor="middle" font-size="14" font-family="sans-serif" fill="#111827">{code}</text></g>"##,
            code = info.code,
            title = escape_xml(&tooltip(info, record)),
            tx = x + TILE / 2.0,
            ty = y + TILE / 2.0 + 5.0,
        );
    }

    // Legend: gradient bar from -range to +range.
    let bar_x = GAP;
    let bar_y = grid_height + 8.0;
    let bar_w = width - 2.0 * GAP;
    let _ = write!(
        svg,
        r##"<defs><linearGradient id="balance-scale"><stop offset="0" stop-color="{lo}"/><stop offset="0.5" stop-color="#ffffff"/><stop offset="1" stop-color="{hi}"/></linearGradient></defs><rect x="{bar_x:.0}" y="{bar_y:.0}" width="{bar_w:.0}" height="14" fill="url(#balance-scale)" stroke="#9ca3af"/>"##,
        lo = diverging_color(-range, range),
        hi = diverging_color(range, range),
    );
    let label_y = bar_y + 32.0;
    let _ = write!(
        svg,
        r#"<text x="{bar_x:.0}" y="{label_y:.0}" font-size="12" font-family="sans-serif">{lo}</text><text x="{mid:.0}" y="{label_y:.0}" font-size="12" font-family="sans-serif" text-anchor="middle">Trade Balance (million $)</text><text x="{end:.0}" y="{label_y:.0}" font-size="12" font-family="sans-serif" text-anchor="end">{hi}</text>"#,
        lo = format_money(-range, 0),
        hi = format_money(range, 0),
        mid = bar_x + bar_w / 2.0,
        end = bar_x + bar_w,
    );

    svg.push_str("</svg>");
    svg
}

fn arc_point(cx: f64, cy: f64, r: f64, fraction: f64) -> (f64, f64) {
    // Start at 12 o'clock, run clockwise.
    let angle = fraction * 2.0 * PI - PI / 2.0;
    (cx + r * angle.cos(), cy + r * angle.sin())
}

/// Pie chart with a legend of labels and percentage shares. Empty string when
/// there is nothing to draw.
pub fn pie_svg(breakdown: &CategoryBreakdown) -> String {
    if breakdown.is_empty() || breakdown.total <= 0.0 {
        return String::new();
    }

    let (cx, cy, r) = (120.0, 120.0, 110.0);
    let legend_x = 250.0;
    let height = (breakdown.shares.len() as f64 * 22.0 + 20.0).max(240.0);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 620 {height:.0}" class="pie" role="img">"#
    );

    let mut start = 0.0;
    for (i, share) in breakdown.shares.iter().enumerate() {
        let color = PIE_COLORS[i % PIE_COLORS.len()];
        let fraction = share.value / breakdown.total;
        let title = escape_xml(&format!("{}: {:.1}%", share.label, share.percent));

        if fraction >= 1.0 {
            let _ = write!(
                svg,
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"><title>{title}</title></circle>"#
            );
        } else if fraction > 0.0 {
            let (x0, y0) = arc_point(cx, cy, r, start);
            let (x1, y1) = arc_point(cx, cy, r, start + fraction);
            let large_arc = if fraction > 0.5 { 1 } else { 0 };
            let _ = write!(
                svg,
                r##"<path d="M {cx} {cy} L {x0:.2} {y0:.2} A {r} {r} 0 {large_arc} 1 {x1:.2} {y1:.2} Z" fill="{color}" stroke="#ffffff"><title>{title}</title></path>"##
            );
        }
        start += fraction;

        let ly = 20.0 + i as f64 * 22.0;
        let _ = write!(
            svg,
            r#"<rect x="{legend_x}" y="{sy:.0}" width="14" height="14" fill="{color}"/><text x="{tx}" y="{ly:.0}" font-size="13" font-family="sans-serif">{label} ({pct:.1}%)</text>"#,
            sy = ly - 12.0,
            tx = legend_x + 20.0,
            label = escape_xml(&share.label),
            pct = share.percent,
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::balance::calculate_balance;
    use crate::domain::breakdown::{breakdown, DetailedCategoryRecord};

    fn table() -> TradeTable {
        calculate_balance(&TradeTable::new(vec![
            StateTradeRecord::new("Michigan", Some(10.0), Some(400.0), Some(5.0), Some(15.0)),
            StateTradeRecord::new("Oregon", Some(20.0), Some(10.0), Some(5.0), Some(5.0)),
            StateTradeRecord::new("Texas", Some(1.0), None, Some(1.0), Some(1.0)),
        ]))
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(1234567.891, 0), "$1,234,568");
        assert_eq!(format_money(-79600.0, 0), "-$79,600");
        assert_eq!(format_money(12.5, 2), "$12.50");
        assert_eq!(format_money(999.0, 0), "$999");
        assert_eq!(format_money(-0.001, 0), "$0");
    }

    #[test]
    fn color_range_has_floor() {
        let small = calculate_balance(&TradeTable::new(vec![StateTradeRecord::new(
            "Ohio",
            Some(1.0),
            Some(2.0),
            Some(1.0),
            Some(1.0),
        )]));
        assert_eq!(color_range(&small), MIN_COLOR_RANGE);
        assert_eq!(color_range(&table()), 400.0);
    }

    #[test]
    fn diverging_color_endpoints() {
        assert_eq!(diverging_color(0.0, 100.0), "#ffffff");
        assert_eq!(diverging_color(-100.0, 100.0), "#8b0000");
        assert_eq!(diverging_color(100.0, 100.0), "#006400");
        assert_eq!(diverging_color(-500.0, 100.0), "#8b0000");
    }

    #[test]
    fn choropleth_draws_every_state() {
        let svg = choropleth_svg(&table());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"tile\"").count(), 50);
        assert!(svg.contains("data-state=\"MI\""));
        assert!(svg.contains("Trade Balance: -$400.00"));
    }

    #[test]
    fn choropleth_greys_missing_states() {
        let svg = choropleth_svg(&table());
        let texas = svg.split("data-state=\"TX\"").nth(1).unwrap().split("</g>").next().unwrap();
        assert!(texas.contains(MISSING_FILL));
        let ohio = svg.split("data-state=\"OH\"").nth(1).unwrap().split("</g>").next().unwrap();
        assert!(ohio.contains("Ohio: no data"));
    }

    #[test]
    fn pie_has_slice_per_share_and_escapes_labels() {
        let records = vec![
            DetailedCategoryRecord::new("1--Plastics & Rubber", 60.0),
            DetailedCategoryRecord::new("2--Chemicals", 40.0),
        ];
        let svg = pie_svg(&breakdown("t", &records, 5));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Plastics &amp; Rubber (60.0%)"));
    }

    #[test]
    fn single_slice_pie_is_full_circle() {
        let records = vec![DetailedCategoryRecord::new("1--Only", 10.0)];
        let svg = pie_svg(&breakdown("t", &records, 5));
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn empty_pie_renders_nothing() {
        assert!(pie_svg(&breakdown("t", &[], 5)).is_empty());
    }
}
