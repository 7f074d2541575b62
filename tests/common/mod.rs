#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;
use tariffscope::domain::error::TariffscopeError;
use tariffscope::domain::raw_table::{CellValue, RawTable};
use tariffscope::domain::trade::TradeFlow;
use tariffscope::ports::source_port::TradeSourcePort;

/// In-memory source port. Counts loads so tests can check nothing is cached.
pub struct MockSourcePort {
    pub flows: HashMap<TradeFlow, RawTable>,
    pub categories: HashMap<TradeFlow, RawTable>,
    pub errors: HashMap<TradeFlow, String>,
    pub loads: Cell<usize>,
}

impl MockSourcePort {
    pub fn new() -> Self {
        Self {
            flows: HashMap::new(),
            categories: HashMap::new(),
            errors: HashMap::new(),
            loads: Cell::new(0),
        }
    }

    pub fn with_flow(mut self, flow: TradeFlow, table: RawTable) -> Self {
        self.flows.insert(flow, table);
        self
    }

    pub fn with_categories(mut self, flow: TradeFlow, table: RawTable) -> Self {
        self.categories.insert(flow, table);
        self
    }

    pub fn with_error(mut self, flow: TradeFlow, reason: &str) -> Self {
        self.errors.insert(flow, reason.to_string());
        self
    }
}

impl TradeSourcePort for MockSourcePort {
    fn load_flow(&self, flow: TradeFlow) -> Result<RawTable, TariffscopeError> {
        self.loads.set(self.loads.get() + 1);
        if let Some(reason) = self.errors.get(&flow) {
            return Err(TariffscopeError::SourceUnreadable {
                source_name: flow.key().to_string(),
                reason: reason.clone(),
            });
        }
        self.flows
            .get(&flow)
            .cloned()
            .ok_or_else(|| TariffscopeError::SourceUnreadable {
                source_name: flow.key().to_string(),
                reason: "not configured".into(),
            })
    }

    fn load_categories(&self, flow: TradeFlow) -> Result<Option<RawTable>, TariffscopeError> {
        Ok(self.categories.get(&flow).cloned())
    }
}

/// A `State,2024` source table.
pub fn state_table(name: &str, rows: &[(&str, &str)]) -> RawTable {
    rows.iter().fold(
        RawTable::new(name, vec!["State".into(), "2024".into()]),
        |t, (state, value)| t.with_row(vec![CellValue::from(*state), CellValue::from(*value)]),
    )
}

/// A `Product,2024` category table.
pub fn category_table(name: &str, rows: &[(&str, &str)]) -> RawTable {
    rows.iter().fold(
        RawTable::new(name, vec!["Product".into(), "2024".into()]),
        |t, (product, value)| t.with_row(vec![CellValue::from(*product), CellValue::from(*value)]),
    )
}

/// Four sources with the aggregate and territory rows the real exports carry.
/// Ohio is the worked example: CE 100, CI 200, ME 50, MI 150.
pub fn sample_port() -> MockSourcePort {
    MockSourcePort::new()
        .with_flow(
            TradeFlow::CanadaExports,
            state_table(
                "canada_exports",
                &[
                    ("UNITED STATES", "$1,000,000"),
                    ("Ohio", "$100"),
                    ("Michigan", "$1,200"),
                    ("Texas", "$800"),
                    ("Puerto Rico", "$3"),
                    ("Unallocated", "$40"),
                ],
            ),
        )
        .with_flow(
            TradeFlow::CanadaImports,
            state_table(
                "canada_imports",
                &[
                    ("Texas", "$300"),
                    ("Michigan", "$2,000"),
                    ("Ohio", "$200"),
                    ("District of Columbia", "$9"),
                ],
            ),
        )
        .with_flow(
            TradeFlow::MexicoExports,
            state_table(
                "mexico_exports",
                &[("Ohio", "$50"), ("Michigan", "$400"), ("Texas", "$5,000")],
            ),
        )
        .with_flow(
            TradeFlow::MexicoImports,
            state_table(
                "mexico_imports",
                &[
                    ("Ohio", "$150"),
                    ("Michigan", "$900"),
                    ("Texas", "$4,000"),
                    ("Virgin Islands", "$1"),
                ],
            ),
        )
}

pub const SOURCE_CSV: &str = "State,2023,2024\n\
UNITED STATES,\"$9,000,000\",\"$9,500,000\"\n\
Michigan,\"$1,100\",\"$1,200\"\n\
Ohio,$90,$100\n\
Unallocated,$5,$6\n";

/// Write the four state sources plus one Michigan category source into
/// `dir` and return a config that points at them by relative path.
pub fn write_sample_files(dir: &Path) -> String {
    std::fs::create_dir_all(dir.join("data")).unwrap();
    for flow in TradeFlow::ALL {
        std::fs::write(dir.join(format!("data/{}.csv", flow.key())), SOURCE_CSV).unwrap();
    }
    std::fs::write(
        dir.join("data/mi_canada_exports.csv"),
        "Product,2024\n\
         0--All Merchandise,$100\n\
         336--Transportation Equipment,$50\n\
         325--Chemicals,$20\n\
         333--Machinery,$10\n\
         331--Primary Metals,$8\n\
         326--Plastics,$7\n\
         311--Food,$3\n\
         322--Paper,$2\n",
    )
    .unwrap();

    "[data]\n\
     canada_exports = data/canada_exports.csv\n\
     canada_imports = data/canada_imports.csv\n\
     mexico_exports = data/mexico_exports.csv\n\
     mexico_imports = data/mexico_imports.csv\n\
     year = 2024\n\
     \n\
     [model]\n\
     tariff_rate = 20\n\
     \n\
     [report]\n\
     output = out/dashboard.html\n\
     slider_max = 20\n\
     slider_step = 10\n\
     \n\
     [case_study]\n\
     state = Michigan\n\
     top_n = 5\n\
     canada_exports = data/mi_canada_exports.csv\n"
        .to_string()
}
