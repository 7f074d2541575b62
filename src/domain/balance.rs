//! Balance-of-trade columns derived from the four base amounts.

use crate::domain::trade::{StateTradeRecord, TradeTable};

fn difference(exports: Option<f64>, imports: Option<f64>) -> Option<f64> {
    Some(exports? - imports?)
}

/// Overwrite the three balances of one record from its base amounts.
pub fn balance_record(record: &mut StateTradeRecord) {
    record.canada_balance = difference(record.canada_exports, record.canada_imports);
    record.mexico_balance = difference(record.mexico_exports, record.mexico_imports);
    record.total_balance = match (record.canada_balance, record.mexico_balance) {
        (Some(c), Some(m)) => Some(c + m),
        _ => None,
    };
}

/// Return a copy of `table` with `canada_balance`, `mexico_balance` and
/// `total_balance` recomputed. Idempotent.
pub fn calculate_balance(table: &TradeTable) -> TradeTable {
    let mut out = table.clone();
    out.records.iter_mut().for_each(balance_record);
    out
}
