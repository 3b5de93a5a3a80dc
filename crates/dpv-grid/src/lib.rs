pub mod columns;
pub mod compare;
pub mod field_info;
pub mod format;

pub use columns::{ColumnConfig, ColumnKind, FilterKind, build_columns};
pub use compare::{
    DateKey, compare_dates, compare_numbers, compare_strings, date_value, number_value,
};
pub use field_info::{FieldInfoRow, build_field_info_rows};
pub use format::translate_format;
