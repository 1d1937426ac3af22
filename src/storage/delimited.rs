use std::path::Path;

use csv::ReaderBuilder;

use crate::storage::Table;

/// Reads a delimited text file whose first record holds the headers.
///
/// Records may have fewer or more fields than the header row.
pub(super) fn read(path: &Path, delimiter: u8) -> Result<Table, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record.map(|record| record.iter().map(|field| Some(field.to_string())).collect())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table::new(headers, rows))
}
