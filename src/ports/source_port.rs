//! Trade source access port trait.

use crate::domain::assembly::TradeSources;
use crate::domain::error::TariffscopeError;
use crate::domain::raw_table::RawTable;
use crate::domain::trade::TradeFlow;

pub trait TradeSourcePort {
    /// Raw state-level table for one flow.
    fn load_flow(&self, flow: TradeFlow) -> Result<RawTable, TariffscopeError>;

    /// Raw product-category table for the case-study state, if one is
    /// configured for this flow.
    fn load_categories(&self, flow: TradeFlow) -> Result<Option<RawTable>, TariffscopeError>;

    /// All four state-level tables. Fails on the first unreadable source.
    fn load_sources(&self) -> Result<TradeSources, TariffscopeError> {
        Ok(TradeSources {
            canada_exports: self.load_flow(TradeFlow::CanadaExports)?,
            canada_imports: self.load_flow(TradeFlow::CanadaImports)?,
            mexico_exports: self.load_flow(TradeFlow::MexicoExports)?,
            mexico_imports: self.load_flow(TradeFlow::MexicoImports)?,
        })
    }
}
