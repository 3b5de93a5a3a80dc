#![allow(missing_docs)]

//! End-to-end projection: resolve a resource schema, build the grid
//! configuration, and sort realistic rows with the typed comparators.

use std::cmp::Ordering;

use dpv_grid::{ColumnKind, FilterKind, build_columns, build_field_info_rows};
use dpv_model::{Resource, RowRecord, resolve};

fn resource_json(value: serde_json::Value) -> Resource {
    serde_json::from_value(value).expect("resource")
}

fn typed_resource() -> Resource {
    resource_json(serde_json::json!({
        "path": "https://example.org/casts.csv",
        "schema": {
            "fields": [
                {"name": "Station_Name", "type": "string"},
                {"name": "ISO_DateTime_UTC", "type": "datetime",
                 "format": "%Y-%m-%dT%H:%MZ"},
                {"name": "Depth_m", "type": "number", "units": "meters (m)"},
                {"name": "Cast_Num", "type": "integer", "format": "default"}
            ]
        }
    }))
}

#[test]
fn schema_projects_into_typed_grid_columns() {
    let resource = typed_resource();
    let resolved = resolve(&resource);
    assert!(!resolved.must_sniff);

    let columns = build_columns(
        &resolved.header,
        resolved.fields_by_name.as_ref(),
        resource.all_strings,
    );
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[0].kind, ColumnKind::Text);
    assert_eq!(
        columns[1].kind,
        ColumnKind::Date {
            format: Some("%Y-%m-%dT%H:%MZ".to_string())
        }
    );
    assert_eq!(columns[1].filter, FilterKind::Date);
    assert_eq!(columns[2].kind, ColumnKind::Number);
    assert_eq!(columns[3].kind, ColumnKind::Number);
}

#[test]
fn date_column_sorts_rows_chronologically() {
    let resource = typed_resource();
    let resolved = resolve(&resource);
    let columns = build_columns(&resolved.header, resolved.fields_by_name.as_ref(), false);
    let date_column = &columns[1];

    let mut rows: Vec<RowRecord> = [
        ["B", "2024-02-01T00:10Z", "10.5", "2"],
        ["A", "2024-01-31T23:50Z", "5.0", "1"],
        ["C", "2023-12-31T12:00Z", "80.2", "3"],
    ]
    .iter()
    .map(|cells| RowRecord::from_cells(&resolved.header, cells.iter().copied()))
    .collect();
    rows.sort_by(|a, b| date_column.compare_rows(a, b));

    let stations: Vec<&str> = rows
        .iter()
        .map(|row| row.get("Station_Name").unwrap())
        .collect();
    assert_eq!(stations, ["C", "A", "B"]);
}

#[test]
fn number_column_sorts_numerically_not_lexically() {
    let resource = typed_resource();
    let resolved = resolve(&resource);
    let columns = build_columns(&resolved.header, resolved.fields_by_name.as_ref(), false);
    let depth = &columns[2];

    assert_eq!(depth.compare(Some("9.5"), Some("80.2")), Ordering::Less);
    assert_eq!(depth.compare(Some("100"), Some("20")), Ordering::Greater);
}

#[test]
fn field_info_reflects_schema_annotations() {
    let resource = typed_resource();
    let resolved = resolve(&resource);
    let rows = build_field_info_rows(&resolved.header, resolved.fields_by_name.as_ref());

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].name, "ISO_DateTime_UTC");
    assert_eq!(rows[1].format, "%Y-%m-%dT%H:%MZ");
    assert_eq!(rows[2].units, "meters (m)");
    // "default" is a no-format sentinel.
    assert_eq!(rows[3].format, "");
}
