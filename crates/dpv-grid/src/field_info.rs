//! The secondary "field information" panel.
//!
//! One row per displayed column with its name, units, declared type,
//! format, and description. Everything here is display-only text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dpv_model::{FieldDefinition, FieldType};

/// Format values that mean "no meaningful format declared".
const NO_FORMAT_MARKERS: &[&str] = &["any", "default"];

/// One row of the field-information grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfoRow {
    pub name: String,
    pub units: String,
    pub field_type: String,
    pub format: String,
    pub description: String,
}

impl FieldInfoRow {
    fn default_string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::String.as_str().to_string(),
            ..Self::default()
        }
    }

    fn from_field(field: &FieldDefinition) -> Self {
        let format = field
            .format
            .as_deref()
            .filter(|format| !NO_FORMAT_MARKERS.contains(format))
            .unwrap_or("");
        Self {
            name: field.name.clone(),
            units: field.units.clone().unwrap_or_default(),
            field_type: field.field_type.as_str().to_string(),
            format: format.to_string(),
            description: field.description.clone().unwrap_or_default(),
        }
    }
}

/// Builds the field-information rows in header order.
///
/// Columns without field metadata render as plain string fields with the
/// other cells empty rather than placeholders.
pub fn build_field_info_rows(
    header: &[String],
    fields_by_name: Option<&BTreeMap<String, FieldDefinition>>,
) -> Vec<FieldInfoRow> {
    header
        .iter()
        .map(|name| {
            fields_by_name
                .and_then(|fields| fields.get(name))
                .map_or_else(|| FieldInfoRow::default_string(name), FieldInfoRow::from_field)
        })
        .collect()
}
