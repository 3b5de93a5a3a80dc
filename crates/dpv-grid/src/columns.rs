//! Column configuration for the preview grid.
//!
//! Each resolved header column becomes one [`ColumnConfig`]: display
//! name/tooltip, filter kind, sortability, and a tagged [`ColumnKind`]
//! carrying the comparator and format the column sorts with. Kinds are
//! resolved once per column here, not re-derived per comparison.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dpv_model::{FieldDefinition, FieldType, RowRecord};

use crate::compare::{
    DateKey, compare_dates, compare_numbers, compare_strings, date_value, number_value,
};
use crate::format::translate_format;

/// Filter widget the host grid should attach to a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// No filtering; forced by `allStrings` resources.
    None,
    #[default]
    Text,
    Number,
    Date,
}

/// Resolved column type, fixed at schema-resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date {
        /// Translated chrono format, when the field declared one.
        format: Option<String>,
    },
}

/// One grid column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Row-record key this column reads.
    pub field: String,
    pub header_name: String,
    pub header_tooltip: String,
    pub filter: FilterKind,
    pub resizable: bool,
    pub sortable: bool,
    pub kind: ColumnKind,
}

impl ColumnConfig {
    fn text(name: &str) -> Self {
        Self {
            field: name.to_string(),
            header_name: name.to_string(),
            header_tooltip: name.to_string(),
            filter: FilterKind::Text,
            resizable: true,
            sortable: true,
            kind: ColumnKind::Text,
        }
    }

    /// Compares two raw cells with this column's comparator.
    pub fn compare(&self, a: Option<&str>, b: Option<&str>) -> Ordering {
        match &self.kind {
            ColumnKind::Text => compare_strings(a, b),
            ColumnKind::Number => compare_numbers(a, b),
            ColumnKind::Date { format } => compare_dates(a, b, format.as_deref()),
        }
    }

    /// Compares two rows by this column.
    pub fn compare_rows(&self, a: &RowRecord, b: &RowRecord) -> Ordering {
        self.compare(a.get(&self.field), b.get(&self.field))
    }

    /// Sort-time numeric value; `None` for non-number columns.
    pub fn number_sort_value(&self, raw: &str) -> Option<f64> {
        match self.kind {
            ColumnKind::Number => number_value(raw),
            _ => None,
        }
    }

    /// Sort-time date key; `None` for non-date columns.
    pub fn date_sort_value(&self, raw: &str) -> Option<DateKey> {
        match &self.kind {
            ColumnKind::Date { format } => date_value(raw, format.as_deref()),
            _ => None,
        }
    }
}

/// Builds column configs for the resolved header.
///
/// Columns with a matching field definition get their type-specific filter
/// and comparator; columns without one stay default text. `all_strings`
/// overrides everything: no filter, no sorting, on every column.
pub fn build_columns(
    header: &[String],
    fields_by_name: Option<&BTreeMap<String, FieldDefinition>>,
    all_strings: bool,
) -> Vec<ColumnConfig> {
    header
        .iter()
        .map(|name| {
            let mut column = ColumnConfig::text(name);
            if let Some(field) = fields_by_name.and_then(|fields| fields.get(name)) {
                apply_field(&mut column, field);
            }
            if all_strings {
                column.sortable = false;
                column.filter = FilterKind::None;
            }
            column
        })
        .collect()
}

fn apply_field(column: &mut ColumnConfig, field: &FieldDefinition) {
    match field.field_type {
        FieldType::Integer | FieldType::Number => {
            column.filter = FilterKind::Number;
            column.kind = ColumnKind::Number;
        }
        FieldType::Date | FieldType::Datetime => {
            column.filter = FilterKind::Date;
            column.kind = ColumnKind::Date {
                format: field.format.as_deref().map(translate_format),
            };
        }
        FieldType::String => {}
    }
}
