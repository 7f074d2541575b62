//! Raw tabular input as handed over by a source adapter.
//!
//! A source is a named grid of cells with a header row. Nothing here knows
//! about states or trade; column lookup and currency parsing live here so the
//! assembly steps can share them.

use crate::domain::error::TariffscopeError;

/// One cell of a raw source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Text cells that are blank after trimming are treated as empty.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// Textual form of the cell, used for join keys.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Empty => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Index of the column whose trimmed header equals `column`.
    pub fn column_index(&self, column: &str) -> Result<usize, TariffscopeError> {
        self.columns
            .iter()
            .position(|c| c.trim() == column.trim())
            .ok_or_else(|| TariffscopeError::MissingColumn {
                source_name: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell at (`row`, `column`); short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&CellValue::Empty)
    }
}

/// Strip `$` and `,` from a currency string and parse the rest as `f64`.
/// `NaN` and infinities are not amounts and are rejected.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Convert a cell into a number. Numeric cells pass through unchanged, empty
/// cells are missing, and unparseable text is an error.
pub fn cell_to_number(
    cell: &CellValue,
    source_name: &str,
    key: &str,
) -> Result<Option<f64>, TariffscopeError> {
    match cell {
        CellValue::Number(n) => Ok(Some(*n)),
        CellValue::Empty => Ok(None),
        CellValue::Text(text) => match parse_currency(text) {
            Some(value) => Ok(Some(value)),
            None => Err(TariffscopeError::ValueParse {
                source_name: source_name.to_string(),
                key: key.to_string(),
                text: text.clone(),
            }),
        },
    }
}
