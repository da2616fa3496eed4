use crate::block::{Cell, Table};
use crate::emphasis::inline_spans;

/// Any row containing this is treated as a header separator, wherever it appears.
const SEPARATOR: &str = "---";

/// Build a table from a run of raw, trimmed table-row lines.
///
/// Returns `None` when every row is a separator.
pub fn materialize<S: AsRef<str>>(rows: &[S]) -> Option<Table> {
    let mut data_rows = rows
        .iter()
        .map(AsRef::as_ref)
        .filter(|row| !is_separator(row));

    let headers = split_cells(data_rows.next()?);
    let rows = data_rows.map(split_cells).collect();

    Some(Table { headers, rows })
}

pub fn is_separator(row: &str) -> bool {
    row.contains(SEPARATOR)
}

/// Split a raw row on `|`, dropping fragments that are blank after trimming.
pub fn split_cells(row: &str) -> Vec<Cell> {
    row.split('|')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|text| Cell {
            text: text.to_string(),
            content: inline_spans(text),
        })
        .collect()
}
