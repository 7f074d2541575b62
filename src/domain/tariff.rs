//! Tariff impact model.
//!
//! A uniform tariff rate, applied symmetrically to Canada and Mexico and
//! assumed to be reciprocated, rescales every state's imports and exports by
//! fixed elasticities. The 2024 baseline is taken to be a 0% tariff.

use crate::domain::balance::calculate_balance;
use crate::domain::trade::{TradeFlow, TradeTable};

/// Imports fall by 0.7 × the tariff fraction.
pub const IMPORT_ELASTICITY: f64 = -0.7;

/// Exports rise by 1.0 × the tariff fraction (reciprocal tariffs).
pub const EXPORT_ELASTICITY: f64 = 1.0;

pub const MIN_RATE: f64 = 0.0;
pub const MAX_RATE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffModel {
    pub import_elasticity: f64,
    pub export_elasticity: f64,
}

impl Default for TariffModel {
    fn default() -> Self {
        Self {
            import_elasticity: IMPORT_ELASTICITY,
            export_elasticity: EXPORT_ELASTICITY,
        }
    }
}

impl TariffModel {
    pub fn new(import_elasticity: f64, export_elasticity: f64) -> Self {
        Self {
            import_elasticity,
            export_elasticity,
        }
    }

    /// Multiplier applied to imports at `rate` percent.
    pub fn import_multiplier(&self, rate: f64) -> f64 {
        1.0 + self.import_elasticity * (rate / 100.0)
    }

    /// Multiplier applied to exports at `rate` percent.
    pub fn export_multiplier(&self, rate: f64) -> f64 {
        1.0 + self.export_elasticity * (rate / 100.0)
    }

    /// Project `table` under a tariff of `rate` percent.
    ///
    /// `rate == 0` returns an unmodified copy. Otherwise the four base
    /// amounts are rescaled and the balances recomputed from them. Rates
    /// outside `[0, 100]` are not clamped.
    pub fn apply(&self, table: &TradeTable, rate: f64) -> TradeTable {
        if rate == 0.0 {
            return table.clone();
        }

        let import_mult = self.import_multiplier(rate);
        let export_mult = self.export_multiplier(rate);

        let mut projected = table.clone();
        for record in &mut projected.records {
            for flow in TradeFlow::ALL {
                let mult = if flow.is_import() {
                    import_mult
                } else {
                    export_mult
                };
                let value = record.flow_mut(flow);
                *value = value.map(|v| v * mult);
            }
        }

        calculate_balance(&projected)
    }
}

/// [`TariffModel::apply`] with the default elasticities.
pub fn apply_tariff(table: &TradeTable, rate: f64) -> TradeTable {
    TariffModel::default().apply(table, rate)
}

/// True when `rate` lies in the model's accepted domain.
pub fn is_valid_rate(rate: f64) -> bool {
    (MIN_RATE..=MAX_RATE).contains(&rate)
}
