//! HTML dashboard adapter implementing ReportPort.
//!
//! Renders a single self-contained page with an Askama template: one
//! choropleth per swept tariff rate behind a range slider, an optional
//! ranking table under each map, and the case-study pie charts.

pub mod chart_svg;
pub mod tables;

use std::fs;
use std::path::Path;

use askama::Template;

use crate::domain::error::TariffscopeError;
use crate::domain::ranking::rank_by_total_balance;
use crate::domain::scenario::Dashboard;
use crate::domain::states::lookup;
use crate::ports::report_port::ReportPort;

struct ScenarioView {
    rate_label: String,
    map_svg: String,
    ranking_html: String,
    selected: bool,
}

struct PieView {
    title: String,
    svg: String,
    table_html: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    title: &'a str,
    year: &'a str,
    generated_at: String,
    import_elasticity: f64,
    export_elasticity: f64,
    scenarios: Vec<ScenarioView>,
    selected_index: usize,
    max_index: usize,
    rates_js: String,
    case_study_state: Option<&'a str>,
    pies: Vec<PieView>,
    show_ranking: bool,
}

fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.0}%")
    } else {
        format!("{rate}%")
    }
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, dashboard: &Dashboard) -> Result<String, TariffscopeError> {
        if let Some(first) = dashboard.scenarios.first() {
            for record in first.table.iter() {
                if lookup(&record.state).is_none() {
                    tracing::warn!(state = %record.state, "no map tile for state, shown in ranking only");
                }
            }
        }

        let selected_index = dashboard
            .scenarios
            .iter()
            .position(|s| s.rate == dashboard.selected_rate)
            .unwrap_or(0);

        let scenarios: Vec<ScenarioView> = dashboard
            .scenarios
            .iter()
            .enumerate()
            .map(|(i, scenario)| ScenarioView {
                rate_label: format_rate(scenario.rate),
                map_svg: chart_svg::choropleth_svg(&scenario.table),
                ranking_html: if dashboard.show_ranking {
                    tables::render_ranking_table(&rank_by_total_balance(&scenario.table))
                } else {
                    String::new()
                },
                selected: i == selected_index,
            })
            .collect();

        let rates_js = dashboard
            .scenarios
            .iter()
            .map(|s| format!("\"{}\"", format_rate(s.rate)))
            .collect::<Vec<_>>()
            .join(",");

        let pies = dashboard
            .breakdowns
            .iter()
            .filter(|b| !b.is_empty())
            .map(|b| PieView {
                title: b.title.clone(),
                svg: chart_svg::pie_svg(b),
                table_html: tables::render_breakdown_table(b),
            })
            .collect();

        let template = DashboardTemplate {
            title: &dashboard.title,
            year: &dashboard.year,
            generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            import_elasticity: dashboard.model.import_elasticity,
            export_elasticity: dashboard.model.export_elasticity,
            max_index: scenarios.len().saturating_sub(1),
            scenarios,
            selected_index,
            rates_js: format!("[{rates_js}]"),
            case_study_state: dashboard.case_study_state.as_deref(),
            pies,
            show_ranking: dashboard.show_ranking,
        };

        template.render().map_err(|e| TariffscopeError::Report {
            reason: format!("template rendering failed: {e}"),
        })
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, dashboard: &Dashboard, output_path: &str) -> Result<(), TariffscopeError> {
        let html = self.render(dashboard)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;

        tracing::info!(path = output_path, scenarios = dashboard.scenarios.len(), "dashboard written");
        Ok(())
    }
}
