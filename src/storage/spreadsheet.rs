use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::storage::{SourceError, Table};

/// Reads the first worksheet of a workbook. The first row holds the headers.
pub(super) fn read(path: &Path) -> Result<Table, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SourceError::EmptyWorkbook)??;

    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).unwrap_or_default()).collect())
        .unwrap_or_default();

    let rows = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(Table::new(headers, rows))
}

/// The text of a cell as it is displayed. Error cells read as empty.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
