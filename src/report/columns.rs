use std::borrow::Cow;
use std::collections::HashMap;

use super::{Cell, Columns, Row};

/// logical column keys used by the aging detail report
pub const TXN_TYPE: &str = "txn_type";
pub const CUST_NAME: &str = "cust_name";
pub const DOC_NUM: &str = "doc_num";
pub const OPEN_BALANCE: &str = "subt_open_bal";
pub const DUE_DATE: &str = "due_date";

/// the columns the normalizer reads
pub const RECOGNIZED: [&str; 5] = [TXN_TYPE, CUST_NAME, DOC_NUM, OPEN_BALANCE, DUE_DATE];

/// logical column name to cell position, resolved once per report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// build from the report's column metadata; a repeated name keeps its last position
    pub fn from_columns(columns: &Columns) -> Self {
        let positions = columns
            .column
            .iter()
            .enumerate()
            .filter_map(|(position, descriptor)| {
                descriptor
                    .metadata
                    .first()
                    .and_then(|meta| meta.value.clone())
                    .map(|name| (name, position))
            })
            .collect();
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// recognized columns the report does not carry
    pub fn missing_recognized(&self) -> Vec<&'static str> {
        RECOGNIZED
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// the cell for a logical column, absent when unmapped or out of range
    pub fn cell<'r>(&self, row: &'r Row, name: &str) -> Option<&'r Cell> {
        self.position(name).and_then(|position| row.col_data.get(position))
    }

    /// display text for a logical column
    pub fn text<'r>(&self, row: &'r Row, name: &str) -> Option<Cow<'r, str>> {
        self.cell(row, name).and_then(Cell::text)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
