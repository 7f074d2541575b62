//! Product-category breakdown for a single state/partner/direction.
//!
//! Feeds the case-study pie charts: the "all merchandise" total row is
//! dropped, categories are ranked by value, the top `n` are kept and the rest
//! collapse into one "Other" slice.

use crate::domain::error::TariffscopeError;
use crate::domain::raw_table::{cell_to_number, RawTable};

pub const PRODUCT_DELIMITER: &str = "--";
pub const ALL_MERCHANDISE: &str = "All Merchandise";
pub const OTHER_LABEL: &str = "Other";
pub const DEFAULT_PRODUCT_COLUMN: &str = "Product";
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailedCategoryRecord {
    pub product: String,
    pub value: f64,
}

impl DetailedCategoryRecord {
    pub fn new(product: impl Into<String>, value: f64) -> Self {
        Self {
            product: product.into(),
            value,
        }
    }

    /// Part after the first `--`, or the whole product string.
    pub fn description(&self) -> &str {
        match self.product.split_once(PRODUCT_DELIMITER) {
            Some((_, desc)) => desc.trim(),
            None => self.product.trim(),
        }
    }

    pub fn is_total(&self) -> bool {
        self.description().eq_ignore_ascii_case(ALL_MERCHANDISE)
    }
}

/// One labelled slice.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub label: String,
    pub value: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub title: String,
    pub total: f64,
    pub shares: Vec<CategoryShare>,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

fn percent_of(value: f64, total: f64) -> f64 {
    if total == 0.0 { 0.0 } else { value * 100.0 / total }
}

/// Rank `records` and partition them into the top `top_n` plus "Other".
pub fn breakdown(
    title: impl Into<String>,
    records: &[DetailedCategoryRecord],
    top_n: usize,
) -> CategoryBreakdown {
    let mut categories: Vec<&DetailedCategoryRecord> =
        records.iter().filter(|r| !r.is_total()).collect();
    categories.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total: f64 = categories.iter().map(|r| r.value).sum();
    let split = top_n.min(categories.len());
    let (top, rest) = categories.split_at(split);

    let mut shares: Vec<CategoryShare> = top
        .iter()
        .map(|r| CategoryShare {
            label: r.description().to_string(),
            value: r.value,
            percent: percent_of(r.value, total),
        })
        .collect();

    if !rest.is_empty() {
        let other: f64 = rest.iter().map(|r| r.value).sum();
        shares.push(CategoryShare {
            label: OTHER_LABEL.to_string(),
            value: other,
            percent: percent_of(other, total),
        });
    }

    CategoryBreakdown {
        title: title.into(),
        total,
        shares,
    }
}

/// Read category records from a raw source with a product column and a
/// value column. Empty value cells are skipped.
pub fn category_records(
    table: &RawTable,
    product_column: &str,
    value_column: &str,
) -> Result<Vec<DetailedCategoryRecord>, TariffscopeError> {
    let product_idx = table.column_index(product_column)?;
    let value_idx = table.column_index(value_column)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for i in 0..table.rows.len() {
        let Some(product) = table.cell(i, product_idx).as_key() else {
            continue;
        };
        match cell_to_number(table.cell(i, value_idx), &table.name, &product)? {
            Some(value) => records.push(DetailedCategoryRecord::new(product, value)),
            None => tracing::debug!(source = %table.name, product = %product, "no value, skipped"),
        }
    }
    Ok(records)
}
