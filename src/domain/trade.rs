//! Per-state trade records and the table that holds them.

use serde::Serialize;
use std::fmt;

/// One of the four raw trade sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeFlow {
    CanadaExports,
    CanadaImports,
    MexicoExports,
    MexicoImports,
}

impl TradeFlow {
    pub const ALL: [TradeFlow; 4] = [
        TradeFlow::CanadaExports,
        TradeFlow::CanadaImports,
        TradeFlow::MexicoExports,
        TradeFlow::MexicoImports,
    ];

    /// Config key and field name for this flow.
    pub fn key(self) -> &'static str {
        match self {
            TradeFlow::CanadaExports => "canada_exports",
            TradeFlow::CanadaImports => "canada_imports",
            TradeFlow::MexicoExports => "mexico_exports",
            TradeFlow::MexicoImports => "mexico_imports",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TradeFlow::CanadaExports => "Canada Exports",
            TradeFlow::CanadaImports => "Canada Imports",
            TradeFlow::MexicoExports => "Mexico Exports",
            TradeFlow::MexicoImports => "Mexico Imports",
        }
    }

    pub fn is_import(self) -> bool {
        matches!(self, TradeFlow::CanadaImports | TradeFlow::MexicoImports)
    }
}

impl fmt::Display for TradeFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Trade with Canada and Mexico for a single state.
///
/// Base amounts are `None` when the state was absent from that source. The
/// three balances are derived by [`crate::domain::balance::calculate_balance`]
/// and are `None` whenever one of their inputs is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTradeRecord {
    pub state: String,
    pub canada_exports: Option<f64>,
    pub canada_imports: Option<f64>,
    pub mexico_exports: Option<f64>,
    pub mexico_imports: Option<f64>,
    pub canada_balance: Option<f64>,
    pub mexico_balance: Option<f64>,
    pub total_balance: Option<f64>,
}

impl StateTradeRecord {
    /// Record with the four base amounts set and no balances yet.
    pub fn new(
        state: impl Into<String>,
        canada_exports: Option<f64>,
        canada_imports: Option<f64>,
        mexico_exports: Option<f64>,
        mexico_imports: Option<f64>,
    ) -> Self {
        Self {
            state: state.into(),
            canada_exports,
            canada_imports,
            mexico_exports,
            mexico_imports,
            canada_balance: None,
            mexico_balance: None,
            total_balance: None,
        }
    }

    pub fn flow(&self, flow: TradeFlow) -> Option<f64> {
        match flow {
            TradeFlow::CanadaExports => self.canada_exports,
            TradeFlow::CanadaImports => self.canada_imports,
            TradeFlow::MexicoExports => self.mexico_exports,
            TradeFlow::MexicoImports => self.mexico_imports,
        }
    }

    pub(crate) fn flow_mut(&mut self, flow: TradeFlow) -> &mut Option<f64> {
        match flow {
            TradeFlow::CanadaExports => &mut self.canada_exports,
            TradeFlow::CanadaImports => &mut self.canada_imports,
            TradeFlow::MexicoExports => &mut self.mexico_exports,
            TradeFlow::MexicoImports => &mut self.mexico_imports,
        }
    }

    pub fn has_missing_flow(&self) -> bool {
        TradeFlow::ALL.iter().any(|f| self.flow(*f).is_none())
    }
}

/// Ordered per-state table. Order follows the Canada-exports source.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TradeTable {
    pub records: Vec<StateTradeRecord>,
}

impl TradeTable {
    pub fn new(records: Vec<StateTradeRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, state: &str) -> Option<&StateTradeRecord> {
        self.records.iter().find(|r| r.state == state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTradeRecord> {
        self.records.iter()
    }

    /// Smallest and largest present total balance.
    pub fn total_balance_range(&self) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.total_balance)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str, total: Option<f64>) -> StateTradeRecord {
        let mut r = StateTradeRecord::new(state, Some(1.0), Some(1.0), Some(1.0), Some(1.0));
        r.total_balance = total;
        r
    }

    #[test]
    fn flow_accessors_match_fields() {
        let r = StateTradeRecord::new("Ohio", Some(1.0), Some(2.0), Some(3.0), None);
        assert_eq!(r.flow(TradeFlow::CanadaExports), Some(1.0));
        assert_eq!(r.flow(TradeFlow::CanadaImports), Some(2.0));
        assert_eq!(r.flow(TradeFlow::MexicoExports), Some(3.0));
        assert_eq!(r.flow(TradeFlow::MexicoImports), None);
        assert!(r.has_missing_flow());
    }

    #[test]
    fn flow_keys_and_import_flag() {
        assert_eq!(TradeFlow::MexicoImports.key(), "mexico_imports");
        assert_eq!(TradeFlow::CanadaExports.to_string(), "canada_exports");
        assert!(TradeFlow::CanadaImports.is_import());
        assert!(!TradeFlow::MexicoExports.is_import());
    }

    #[test]
    fn total_balance_range_skips_missing() {
        let table = TradeTable::new(vec![
            record("A", Some(-30.0)),
            record("B", None),
            record("C", Some(12.0)),
        ]);
        assert_eq!(table.total_balance_range(), Some((-30.0, 12.0)));
        assert_eq!(TradeTable::default().total_balance_range(), None);
    }

    #[test]
    fn get_finds_by_state() {
        let table = TradeTable::new(vec![record("A", None), record("B", Some(1.0))]);
        assert_eq!(table.get("B").and_then(|r| r.total_balance), Some(1.0));
        assert!(table.get("Z").is_none());
    }
}
