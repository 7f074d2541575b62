//! The processing pipeline and tariff-rate sweeps.
//!
//! `process` is the whole chain for one rate: load, assemble, balance, and
//! project. Nothing is cached; every call recomputes from the sources.

use crate::domain::assembly::{assemble, SourceLayout};
use crate::domain::balance::calculate_balance;
use crate::domain::breakdown::{breakdown, category_records, CategoryBreakdown};
use crate::domain::error::TariffscopeError;
use crate::domain::tariff::TariffModel;
use crate::domain::trade::{TradeFlow, TradeTable};
use crate::ports::source_port::TradeSourcePort;

pub const DEFAULT_SLIDER_MAX: f64 = 50.0;
pub const DEFAULT_SLIDER_STEP: f64 = 5.0;
/// Upper bound on `slider_max / slider_step`; each step is a full rendered map.
pub const MAX_SLIDER_STEPS: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub layout: SourceLayout,
    pub model: TariffModel,
}

/// A projected table for one tariff rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub rate: f64,
    pub table: TradeTable,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    pub year: String,
    pub model: TariffModel,
    pub scenarios: Vec<Scenario>,
    /// Rate selected when the page opens.
    pub selected_rate: f64,
    pub case_study_state: Option<String>,
    pub breakdowns: Vec<CategoryBreakdown>,
    pub show_ranking: bool,
}

impl Dashboard {
    pub fn scenario(&self, rate: f64) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.rate == rate)
    }
}

/// Balanced 2024 table straight from the sources.
pub fn baseline(
    port: &dyn TradeSourcePort,
    options: &PipelineOptions,
) -> Result<TradeTable, TariffscopeError> {
    let sources = port.load_sources()?;
    let assembled = assemble(&sources, &options.layout)?;
    let missing = assembled.iter().filter(|r| r.has_missing_flow()).count();
    if missing > 0 {
        tracing::warn!(states = missing, "states with incomplete trade data have no balance");
    }
    Ok(calculate_balance(&assembled))
}

/// Baseline table, projected at `rate` when the rate is positive.
pub fn process(
    port: &dyn TradeSourcePort,
    options: &PipelineOptions,
    rate: f64,
) -> Result<TradeTable, TariffscopeError> {
    let table = baseline(port, options)?;
    if rate > 0.0 {
        tracing::info!(rate, "applying tariff projection");
        Ok(options.model.apply(&table, rate))
    } else {
        Ok(table)
    }
}

/// One independent projection of `base` per rate.
pub fn sweep(base: &TradeTable, model: &TariffModel, rates: &[f64]) -> Vec<Scenario> {
    rates
        .iter()
        .map(|&rate| Scenario {
            rate,
            table: model.apply(base, rate),
        })
        .collect()
}

/// `0, step, 2*step, ...` up to and including `max`.
pub fn slider_rates(max: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || max < 0.0 {
        return vec![0.0];
    }
    let steps = (max / step + 1e-9).floor() as usize;
    (0..=steps).map(|i| i as f64 * step).collect()
}

/// Category breakdowns for every flow that has a case-study source.
pub fn case_study(
    port: &dyn TradeSourcePort,
    state: &str,
    product_column: &str,
    value_column: &str,
    top_n: usize,
) -> Result<Vec<CategoryBreakdown>, TariffscopeError> {
    let mut out = Vec::new();
    for flow in TradeFlow::ALL {
        let Some(raw) = port.load_categories(flow)? else {
            continue;
        };
        let records = category_records(&raw, product_column, value_column)?;
        tracing::debug!(%flow, categories = records.len(), "case-study source loaded");
        out.push(breakdown(format!("{state}: {}", flow.label()), &records, top_n));
    }
    Ok(out)
}
