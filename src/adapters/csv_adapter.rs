//! CSV file source adapter.
//!
//! Reads the trade.gov state exports: a header row with a state column and one
//! column per year, values formatted as currency text. Files exported from
//! spreadsheets are often Windows-1252 rather than UTF-8; bytes that are not
//! valid UTF-8 are decoded as Windows-1252, valid UTF-8 runs are kept as is.

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::TariffscopeError;
use crate::domain::raw_table::{CellValue, RawTable};
use crate::domain::trade::{TradeFlow, TradeTable};
use crate::ports::source_port::TradeSourcePort;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    sources: HashMap<TradeFlow, PathBuf>,
    categories: HashMap<TradeFlow, PathBuf>,
}

impl CsvAdapter {
    pub fn new(sources: HashMap<TradeFlow, PathBuf>) -> Self {
        Self {
            sources,
            categories: HashMap::new(),
        }
    }

    pub fn with_categories(mut self, categories: HashMap<TradeFlow, PathBuf>) -> Self {
        self.categories = categories;
        self
    }

    /// Source paths from `[data]`, case-study paths from `[case_study]`.
    pub fn from_config(config: &FileConfigAdapter) -> Result<Self, TariffscopeError> {
        let mut sources = HashMap::new();
        let mut categories = HashMap::new();
        for flow in TradeFlow::ALL {
            let path = config
                .get_path("data", flow.key())
                .ok_or_else(|| TariffscopeError::config_missing("data", flow.key()))?;
            sources.insert(flow, path);
            if let Some(path) = config.get_path("case_study", flow.key()) {
                categories.insert(flow, path);
            }
        }
        Ok(Self::new(sources).with_categories(categories))
    }
}

/// Windows-1252 code points for 0x80..=0x9F. The five unassigned bytes map to
/// the C1 control of the same value.
const CP1252_HIGH: [char; 32] = [
    '\u{20ac}', '\u{0081}', '\u{201a}', '\u{0192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02c6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008d}', '\u{017d}', '\u{008f}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02dc}', '\u{2122}', '\u{0161}', '\u{203a}', '\u{0153}', '\u{009d}', '\u{017e}', '\u{0178}',
];

fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9f => CP1252_HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}

fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            let bytes = e.into_bytes();
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
                text.extend(chunk.invalid().iter().map(|&b| cp1252_char(b)));
            }
            text
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Read one CSV file into a [`RawTable`] named `name`.
pub fn read_raw_table(path: &Path, name: &str) -> Result<RawTable, TariffscopeError> {
    let bytes = fs::read(path).map_err(|e| TariffscopeError::SourceUnreadable {
        source_name: name.to_string(),
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    let content = decode(bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| TariffscopeError::SourceUnreadable {
            source_name: name.to_string(),
            reason: format!("CSV header error: {}", e),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = RawTable::new(name, columns);
    for result in rdr.records() {
        let record = result.map_err(|e| TariffscopeError::SourceUnreadable {
            source_name: name.to_string(),
            reason: format!("CSV parse error: {}", e),
        })?;
        table.rows.push(record.iter().map(CellValue::from_text).collect());
    }

    tracing::debug!(source = name, path = %path.display(), rows = table.rows.len(), "read CSV source");
    Ok(table)
}

impl TradeSourcePort for CsvAdapter {
    fn load_flow(&self, flow: TradeFlow) -> Result<RawTable, TariffscopeError> {
        let path = self
            .sources
            .get(&flow)
            .ok_or_else(|| TariffscopeError::SourceUnreadable {
                source_name: flow.key().to_string(),
                reason: "no file configured".into(),
            })?;
        read_raw_table(path, flow.key())
    }

    fn load_categories(&self, flow: TradeFlow) -> Result<Option<RawTable>, TariffscopeError> {
        match self.categories.get(&flow) {
            Some(path) => {
                let name = format!("case_study.{}", flow.key());
                read_raw_table(path, &name).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Write `table` as CSV. Missing values are written as empty fields.
pub fn write_trade_table<W: Write>(table: &TradeTable, writer: W) -> Result<(), TariffscopeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in table.iter() {
        wtr.serialize(record).map_err(|e| TariffscopeError::Report {
            reason: format!("CSV write error: {}", e),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::StateTradeRecord;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, HashMap<TradeFlow, PathBuf>) {
        let dir = TempDir::new().unwrap();
        let mut paths = HashMap::new();
        for flow in TradeFlow::ALL {
            let path = dir.path().join(format!("{}.csv", flow.key()));
            fs::write(
                &path,
                "State,2023,2024\n\
                 UNITED STATES,\"$1,000,000\",\"$1,200,000\"\n\
                 Michigan,\"$60,000\",\"$61,234.50\"\n\
                 Oregon,$10,$12\n",
            )
            .unwrap();
            paths.insert(flow, path);
        }
        (dir, paths)
    }

    #[test]
    fn load_flow_reads_headers_and_cells() {
        let (_dir, paths) = setup_test_data();
        let adapter = CsvAdapter::new(paths);

        let table = adapter.load_flow(TradeFlow::CanadaExports).unwrap();
        assert_eq!(table.name, "canada_exports");
        assert_eq!(table.columns, vec!["State", "2023", "2024"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1][0], CellValue::Text("Michigan".into()));
        assert_eq!(table.rows[1][2], CellValue::Text("$61,234.50".into()));
    }

    #[test]
    fn load_flow_errors_for_missing_file() {
        let mut paths = HashMap::new();
        paths.insert(TradeFlow::CanadaExports, PathBuf::from("/nonexistent/ce.csv"));
        let adapter = CsvAdapter::new(paths);
        assert!(matches!(
            adapter.load_flow(TradeFlow::CanadaExports),
            Err(TariffscopeError::SourceUnreadable { .. })
        ));
        assert!(adapter.load_flow(TradeFlow::MexicoImports).is_err());
    }

    #[test]
    fn load_sources_reads_all_four() {
        let (_dir, paths) = setup_test_data();
        let adapter = CsvAdapter::new(paths);
        let sources = adapter.load_sources().unwrap();
        assert_eq!(sources.mexico_imports.name, "mexico_imports");
        assert_eq!(sources.canada_imports.rows.len(), 3);
    }

    #[test]
    fn categories_absent_unless_configured() {
        let (dir, paths) = setup_test_data();
        let cat = dir.path().join("mi_ce.csv");
        fs::write(&cat, "Product,2024\n0--All Merchandise,\"$100\"\n336--Transportation Equipment,$60\n")
            .unwrap();
        let mut categories = HashMap::new();
        categories.insert(TradeFlow::CanadaExports, cat);
        let adapter = CsvAdapter::new(paths).with_categories(categories);

        let table = adapter.load_categories(TradeFlow::CanadaExports).unwrap().unwrap();
        assert_eq!(table.name, "case_study.canada_exports");
        assert_eq!(table.rows.len(), 2);
        assert!(adapter.load_categories(TradeFlow::MexicoImports).unwrap().is_none());
    }

    #[test]
    fn windows_1252_bytes_are_decoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cp1252.csv");
        let mut bytes = b"State,2024\nOhio,$5\n".to_vec();
        bytes.extend_from_slice(b"Caf\xe9,$1\n");
        fs::write(&path, bytes).unwrap();
        let table = read_raw_table(&path, "x").unwrap();
        assert_eq!(table.rows[1][0], CellValue::Text("Caf\u{e9}".into()));
    }

    #[test]
    fn windows_1252_punctuation_is_decoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cp1252_dash.csv");
        fs::write(&path, b"Product,2024\n311\x97Food,$5\n\x93Other\x94,$1\n").unwrap();
        let table = read_raw_table(&path, "x").unwrap();
        assert_eq!(table.rows[0][0], CellValue::Text("311\u{2014}Food".into()));
        assert_eq!(table.rows[1][0], CellValue::Text("\u{201c}Other\u{201d}".into()));
    }

    #[test]
    fn stray_byte_keeps_valid_utf8_elsewhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.csv");
        let mut bytes = "State,2024\nQu\u{e9}bec,$5\n".as_bytes().to_vec();
        bytes.extend_from_slice(b"Caf\xe9,$1\n");
        fs::write(&path, bytes).unwrap();
        let table = read_raw_table(&path, "x").unwrap();
        assert_eq!(table.rows[0][0], CellValue::Text("Qu\u{e9}bec".into()));
        assert_eq!(table.rows[1][0], CellValue::Text("Caf\u{e9}".into()));
    }

    #[test]
    fn cp1252_table_matches_known_points() {
        assert_eq!(cp1252_char(0x80), '\u{20ac}');
        assert_eq!(cp1252_char(0x96), '\u{2013}');
        assert_eq!(cp1252_char(0x97), '\u{2014}');
        assert_eq!(cp1252_char(0x9f), '\u{0178}');
        assert_eq!(cp1252_char(0xe9), '\u{e9}');
        assert_eq!(cp1252_char(b'A'), 'A');
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}State,2024\nOhio,$5\n").unwrap();
        let table = read_raw_table(&path, "x").unwrap();
        assert_eq!(table.columns[0], "State");
    }

    #[test]
    fn write_trade_table_leaves_missing_empty() {
        let mut record = StateTradeRecord::new("Ohio", Some(1.5), None, Some(2.0), Some(1.0));
        record.mexico_balance = Some(1.0);
        let table = TradeTable::new(vec![record]);
        let mut out = Vec::new();
        write_trade_table(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "state,canada_exports,canada_imports,mexico_exports,mexico_imports,canada_balance,mexico_balance,total_balance"
        );
        assert_eq!(lines.next().unwrap(), "Ohio,1.5,,2.0,1.0,,1.0,");
    }
}
