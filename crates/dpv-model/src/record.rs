use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One parsed data row, projected to column-name -> raw cell value.
///
/// Cells hold the raw CSV strings; any type coercion happens inside
/// comparators and value extractors at sort/filter time, never here.
/// A cell missing from a short row is simply absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    cells: BTreeMap<String, String>,
}

impl RowRecord {
    /// Zips raw CSV cells against the resolved header.
    ///
    /// Extra cells beyond the header are dropped; a row shorter than the
    /// header leaves the trailing columns absent.
    pub fn from_cells<'a, I>(header: &[String], cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cells = header
            .iter()
            .zip(cells)
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
}
