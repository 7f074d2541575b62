//! Ordering states by total trade balance.

use crate::domain::trade::{StateTradeRecord, TradeTable};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedState {
    pub rank: usize,
    pub record: StateTradeRecord,
}

/// Largest surplus first. States without a total balance go last, in
/// table order.
pub fn rank_by_total_balance(table: &TradeTable) -> Vec<RankedState> {
    let mut present: Vec<&StateTradeRecord> =
        table.iter().filter(|r| r.total_balance.is_some()).collect();
    let missing = table.iter().filter(|r| r.total_balance.is_none());

    // sort_by is stable, so ties keep table order.
    present.sort_by(|a, b| {
        let a = a.total_balance.unwrap_or(f64::NEG_INFINITY);
        let b = b.total_balance.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    present
        .into_iter()
        .chain(missing)
        .enumerate()
        .map(|(i, record)| RankedState {
            rank: i + 1,
            record: record.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::balance::calculate_balance;

    fn table() -> TradeTable {
        calculate_balance(&TradeTable::new(vec![
            StateTradeRecord::new("Michigan", Some(10.0), Some(80.0), Some(5.0), Some(40.0)),
            StateTradeRecord::new("Alaska", Some(1.0), None, Some(1.0), Some(1.0)),
            StateTradeRecord::new("Oregon", Some(20.0), Some(10.0), Some(5.0), Some(5.0)),
            StateTradeRecord::new("Texas", Some(50.0), Some(20.0), Some(90.0), Some(60.0)),
            StateTradeRecord::new("Iowa", Some(20.0), Some(10.0), Some(5.0), Some(5.0)),
        ]))
    }

    #[test]
    fn surplus_first_deficit_last() {
        let ranked = rank_by_total_balance(&table());
        let names: Vec<&str> = ranked.iter().map(|r| r.record.state.as_str()).collect();
        assert_eq!(names, vec!["Texas", "Oregon", "Iowa", "Michigan", "Alaska"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[4].rank, 5);
    }

    #[test]
    fn missing_balance_ranked_last() {
        let ranked = rank_by_total_balance(&table());
        assert_eq!(ranked.last().unwrap().record.total_balance, None);
    }

    #[test]
    fn ranking_does_not_touch_table() {
        let t = table();
        let before = t.clone();
        let _ = rank_by_total_balance(&t);
        assert_eq!(t, before);
    }
}
