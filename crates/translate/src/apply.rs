//! Moving text between tables and translation batches.

use indexmap::IndexMap;
use tabtrans_sheet::{CellValue, Table};

/// A cell worth sending to a translator: non-blank text that is not a number.
#[must_use]
pub fn is_translatable(value: &CellValue) -> bool {
    match value {
        CellValue::String(s) => !s.trim().is_empty() && !value.is_numeric_like(),
        _ => false,
    }
}

fn in_scope(header: &str, columns: Option<&[String]>) -> bool {
    columns.map_or(true, |cols| cols.iter().any(|c| c == header))
}

/// Translatable strings of the table, in row-major order, duplicates kept.
///
/// `columns` restricts the scan to the named headers; `None` means all.
#[must_use]
pub fn collect_texts(table: &Table, columns: Option<&[String]>) -> Vec<String> {
    let mut texts = Vec::new();
    for row in table.rows() {
        for (header, value) in row {
            if in_scope(header, columns) && is_translatable(value) {
                if let CellValue::String(s) = value {
                    texts.push(s.clone());
                }
            }
        }
    }
    texts
}

/// Fresh table with every in-scope string cell found in `map` replaced.
#[must_use]
pub fn apply_translations(
    table: &Table,
    map: &IndexMap<String, String>,
    columns: Option<&[String]>,
) -> Table {
    table.map_cells(|value, header| match value {
        CellValue::String(s) if in_scope(header, columns) => map
            .get(s)
            .map_or_else(|| value.clone(), |t| CellValue::String(t.clone())),
        other => other.clone(),
    })
}
