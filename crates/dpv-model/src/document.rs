//! Data-package document model.
//!
//! A data package is a JSON metadata document describing one or more
//! downloadable tabular resources. Only the first resource is previewed.
//! Each resource may carry two schema sources with different trust levels:
//! a typed primary `schema` (authoritative column order and types) and a
//! looser `metadata` annotation block (units and descriptions, used for
//! display only when the primary schema is absent).

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};

/// Top-level data-package document, as deserialized from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPackageDocument {
    /// Absent key and empty list are distinct input errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

impl DataPackageDocument {
    /// Returns the first resource, validating the document shape.
    ///
    /// The preview pipeline consumes only the first resource; validation
    /// failures here must surface before any network access happens.
    pub fn first_resource(&self) -> Result<&Resource> {
        let resources = self
            .resources
            .as_ref()
            .ok_or(DocumentError::MissingResources)?;
        resources.first().ok_or(DocumentError::EmptyResources)
    }
}

/// One downloadable file described by the data package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Download URL for the CSV file.
    #[serde(default)]
    pub path: Option<String>,
    /// Display name of the file.
    #[serde(default)]
    pub filename: Option<String>,
    /// Byte count, display-only. Documents carry it as either a JSON
    /// number or a decimal string.
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<u64>,
    /// Forces every column to plain unsorted, unfilterable text.
    #[serde(default, rename = "allStrings")]
    pub all_strings: bool,
    /// Authoritative typed schema.
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Secondary annotation schema (units/descriptions), display-only.
    #[serde(default)]
    pub metadata: Option<Schema>,
}

impl Resource {
    /// Download URL, or an input error when absent.
    pub fn url(&self) -> Result<&str> {
        self.path.as_deref().ok_or(DocumentError::MissingPath)
    }

    /// Display name, falling back to the last path segment.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.filename.as_deref() {
            return name;
        }
        self.path
            .as_deref()
            .and_then(|p| p.rsplit('/').next())
            .unwrap_or("")
    }
}

fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Number(u64),
        Text(String),
    }

    let raw: Option<RawSize> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawSize::Number(size) => Some(size),
        RawSize::Text(text) => text.trim().parse().ok(),
    }))
}

/// Ordered list of field definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Per-column metadata from either schema source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique column name; the CSV mapping key.
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    /// Type-specific format, e.g. a strftime pattern for date/datetime.
    #[serde(default)]
    pub format: Option<String>,
    /// Free text, display-only.
    #[serde(default)]
    pub units: Option<String>,
    /// Free text, display-only.
    #[serde(default)]
    pub description: Option<String>,
}

/// Declared column type. Unknown type strings degrade to `String` so a
/// sloppy upstream document still previews as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Number,
    Date,
    Datetime,
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "integer" => FieldType::Integer,
            "number" => FieldType::Number,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            _ => FieldType::String,
        }
    }
}

impl FieldType {
    /// Lowercase name as written in data-package documents.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
        }
    }
}
