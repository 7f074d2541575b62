//! Data assembly: four raw trade sources into one per-state table.
//!
//! Each source is filtered on its own, the filtered Canada-exports source
//! fixes the state list and its order, and the other three are left-joined
//! onto it by state name. Values are parsed only after the join.

use std::collections::{HashMap, HashSet};

use crate::domain::error::TariffscopeError;
use crate::domain::jurisdiction::is_excluded;
use crate::domain::raw_table::{cell_to_number, CellValue, RawTable};
use crate::domain::trade::{StateTradeRecord, TradeFlow, TradeTable};

pub const DEFAULT_STATE_COLUMN: &str = "State";
pub const DEFAULT_YEAR: &str = "2024";

/// Which columns hold the join key and the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub key_column: String,
    pub value_column: String,
}

impl SourceLayout {
    pub fn new(key_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            key_column: key_column.into(),
            value_column: value_column.into(),
        }
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_COLUMN, DEFAULT_YEAR)
    }
}

/// The four raw sources, one per trade flow.
#[derive(Debug, Clone)]
pub struct TradeSources {
    pub canada_exports: RawTable,
    pub canada_imports: RawTable,
    pub mexico_exports: RawTable,
    pub mexico_imports: RawTable,
}

impl TradeSources {
    pub fn get(&self, flow: TradeFlow) -> &RawTable {
        match flow {
            TradeFlow::CanadaExports => &self.canada_exports,
            TradeFlow::CanadaImports => &self.canada_imports,
            TradeFlow::MexicoExports => &self.mexico_exports,
            TradeFlow::MexicoImports => &self.mexico_imports,
        }
    }
}

/// A source reduced to (state, raw value) pairs with non-state rows removed.
#[derive(Debug, Clone)]
pub struct FilteredSource {
    pub name: String,
    pub rows: Vec<(String, CellValue)>,
}

impl FilteredSource {
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(s, _)| s.as_str())
    }

    fn lookup(&self) -> HashMap<&str, &CellValue> {
        self.rows.iter().map(|(s, v)| (s.as_str(), v)).collect()
    }
}

/// Drop aggregate, unallocated, and territory rows and keep only the key and
/// value columns. Fails if either column is missing or a key repeats.
pub fn filter_source(
    table: &RawTable,
    layout: &SourceLayout,
) -> Result<FilteredSource, TariffscopeError> {
    let key_idx = table.column_index(&layout.key_column)?;
    let value_idx = table.column_index(&layout.value_column)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut seen = HashSet::new();

    for i in 0..table.rows.len() {
        let Some(key) = table.cell(i, key_idx).as_key() else {
            tracing::warn!(source = %table.name, row = i + 1, "skipping row with no state name");
            continue;
        };
        if is_excluded(&key) {
            tracing::debug!(source = %table.name, state = %key, "dropping non-state row");
            continue;
        }
        if !seen.insert(key.clone()) {
            return Err(TariffscopeError::DuplicateState {
                source_name: table.name.clone(),
                key,
            });
        }
        rows.push((key, table.cell(i, value_idx).clone()));
    }

    Ok(FilteredSource {
        name: table.name.clone(),
        rows,
    })
}

/// Build the per-state table. Balances are left unset; run
/// [`crate::domain::balance::calculate_balance`] on the result.
pub fn assemble(
    sources: &TradeSources,
    layout: &SourceLayout,
) -> Result<TradeTable, TariffscopeError> {
    // Filter all four first so a schema problem in any source fails before parsing.
    let canada_exports = filter_source(&sources.canada_exports, layout)?;
    let canada_imports = filter_source(&sources.canada_imports, layout)?;
    let mexico_exports = filter_source(&sources.mexico_exports, layout)?;
    let mexico_imports = filter_source(&sources.mexico_imports, layout)?;

    let ci = canada_imports.lookup();
    let me = mexico_exports.lookup();
    let mi = mexico_imports.lookup();

    let mut records = Vec::with_capacity(canada_exports.rows.len());
    for (state, ce_cell) in &canada_exports.rows {
        let joined = |lookup: &HashMap<&str, &CellValue>, source: &FilteredSource| {
            match lookup.get(state.as_str()) {
                Some(cell) => cell_to_number(cell, &source.name, state),
                None => {
                    tracing::warn!(source = %source.name, state = %state, "state missing from source");
                    Ok(None)
                }
            }
        };

        let record = StateTradeRecord::new(
            state.clone(),
            cell_to_number(ce_cell, &canada_exports.name, state)?,
            joined(&ci, &canada_imports)?,
            joined(&me, &mexico_exports)?,
            joined(&mi, &mexico_imports)?,
        );
        records.push(record);
    }

    tracing::debug!(states = records.len(), "assembled trade table");
    Ok(TradeTable::new(records))
}
