//! Reading the tabular source.
//!
//! A source file is read into a header-addressed [`Table`], which is then
//! projected onto [`SourceRow`](crate::SourceRow)s using the configured
//! [`Columns`]. Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read
//! from their first worksheet; delimited text (`.csv`, `.tsv`) is read as-is.
//! In both cases the first row holds the column headers.

mod delimited;
mod spreadsheet;
mod table;

use std::path::{Path, PathBuf};

pub use table::{Columns, Table};
use tracing::instrument;

use crate::domain::SourceRow;

/// The formats a source file can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// An Excel or OpenDocument workbook.
    Workbook,
    /// Delimited text with the given field separator.
    Delimited(u8),
}

impl SourceFormat {
    /// Infers the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is missing or not recognised.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Delimited(b',')),
            "tsv" | "tab" => Ok(Self::Delimited(b'\t')),
            _ => Err(SourceError::UnsupportedFormat(extension)),
        }
    }
}

/// Reads a table from a source file.
///
/// # Errors
///
/// Returns an error if the file does not exist, its format is not
/// supported, or it cannot be parsed.
#[instrument(level = "debug")]
pub fn read_table(path: &Path) -> Result<Table, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let table = match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => spreadsheet::read(path)?,
        SourceFormat::Delimited(delimiter) => delimited::read(path, delimiter)?,
    };

    tracing::debug!(
        columns = table.headers().len(),
        rows = table.len(),
        "read source table"
    );
    Ok(table)
}

/// Reads a source file and projects it onto rows.
///
/// # Errors
///
/// Returns an error if the table cannot be read or lacks one of the required
/// columns.
pub fn load_rows(path: &Path, columns: &Columns) -> Result<Vec<SourceRow>, SourceError> {
    read_table(path)?.source_rows(columns)
}

/// Errors that can occur when reading the tabular source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input path does not reference an existing file.
    #[error("The file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The file extension is not a recognised source format.
    #[error(
        "Unsupported input format '{0}' (expected .xlsx, .xlsm, .xlsb, .xls, .ods, .csv or .tsv)"
    )]
    UnsupportedFormat(String),

    /// The workbook has no worksheets.
    #[error("The workbook contains no worksheets")]
    EmptyWorkbook,

    /// A required column is absent from the header row.
    #[error("The source does not contain the column '{column}'")]
    MissingColumn {
        /// The header name that was expected.
        column: String,
    },

    /// The workbook could not be read.
    #[error("Failed to read workbook")]
    Spreadsheet(#[from] calamine::Error),

    /// The delimited file could not be read.
    #[error("Failed to read delimited file")]
    Csv(#[from] csv::Error),
}
