//! Schema resolution for a data-package resource.
//!
//! Determines the ordered column list and per-column field metadata from
//! whichever schema source the resource carries:
//!
//! - primary `schema`: field names define the header in declared order,
//!   no sniffing needed;
//! - secondary `metadata` only: field metadata annotates the grid, but the
//!   header must still be sniffed from the file's first row and fields are
//!   matched to it by exact name;
//! - neither: the header is sniffed and every column defaults to text.

use std::collections::BTreeMap;

use tracing::debug;

use crate::document::{FieldDefinition, Resource};

/// Resolved column layout for one resource.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSchema {
    /// Ordered column names; empty until sniffed when `must_sniff` is set.
    pub header: Vec<String>,
    /// Field metadata keyed by column name, when any schema source exists.
    pub fields_by_name: Option<BTreeMap<String, FieldDefinition>>,
    /// True when the header has to be read from the file itself.
    pub must_sniff: bool,
}

impl ResolvedSchema {
    /// Installs a sniffed header.
    ///
    /// Metadata fields that do not match any sniffed column are dropped;
    /// the grid shows only columns physically present in the file.
    pub fn apply_sniffed_header(&mut self, header: Vec<String>) {
        if let Some(fields) = self.fields_by_name.as_mut() {
            fields.retain(|name, _| {
                let present = header.iter().any(|column| column == name);
                if !present {
                    debug!(field = %name, "metadata field absent from sniffed header, dropping");
                }
                present
            });
        }
        self.header = header;
        self.must_sniff = false;
    }
}

fn fields_map(fields: &[FieldDefinition]) -> BTreeMap<String, FieldDefinition> {
    fields
        .iter()
        .map(|field| (field.name.clone(), field.clone()))
        .collect()
}

/// Resolves the column layout for a resource.
///
/// Never fails: a resource with no schema source at all is a valid,
/// supported state that yields a pure string grid.
pub fn resolve(resource: &Resource) -> ResolvedSchema {
    if let Some(schema) = resource.schema.as_ref()
        && !schema.fields.is_empty()
    {
        return ResolvedSchema {
            header: schema.fields.iter().map(|f| f.name.clone()).collect(),
            fields_by_name: Some(fields_map(&schema.fields)),
            must_sniff: false,
        };
    }
    if let Some(metadata) = resource.metadata.as_ref()
        && !metadata.fields.is_empty()
    {
        return ResolvedSchema {
            header: Vec::new(),
            fields_by_name: Some(fields_map(&metadata.fields)),
            must_sniff: true,
        };
    }
    ResolvedSchema {
        header: Vec::new(),
        fields_by_name: None,
        must_sniff: true,
    }
}
