use serde::{Deserialize, Serialize};

use crate::{domain::SourceRow, storage::SourceError};

/// The header names of the three source columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    /// Header of the principle column.
    pub principle: String,
    /// Header of the requirement column.
    pub requirement: String,
    /// Header of the guidelines column.
    pub guidelines: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            principle: "Principle".to_string(),
            requirement: "Requirement".to_string(),
            guidelines: "Guidelines".to_string(),
        }
    }
}

/// A header row and the data rows beneath it.
///
/// Cells that are empty or hold only whitespace are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Creates a table. Header names are trimmed.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let headers = headers
            .into_iter()
            .map(|header| header.trim().to_string())
            .collect();
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.filter(|text| !text.trim().is_empty()))
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    /// The header names.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The index of the first column with this header.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|header| header == name)
    }

    fn require(&self, name: &str) -> Result<usize, SourceError> {
        self.column(name).ok_or_else(|| SourceError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Projects the table onto source rows.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] naming the first required column
    /// that is absent from the header row. No rows are produced in that case.
    pub fn source_rows(&self, columns: &Columns) -> Result<Vec<SourceRow>, SourceError> {
        let principle = self.require(&columns.principle)?;
        let requirement = self.require(&columns.requirement)?;
        let guidelines = self.require(&columns.guidelines)?;

        let cell = |row: &[Option<String>], index: usize| row.get(index).cloned().flatten();

        Ok(self
            .rows
            .iter()
            .map(|row| SourceRow {
                principle: cell(row, principle),
                requirement: cell(row, requirement),
                guidelines: cell(row, guidelines),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn columns_are_found_by_header_in_any_order() {
        let table = Table::new(
            vec![
                "Notes".to_string(),
                " Guidelines ".to_string(),
                "Requirement".to_string(),
                "Principle".to_string(),
            ],
            vec![vec![text("ignored"), text("G"), text("R"), text("P")]],
        );

        let rows = table.source_rows(&Columns::default()).unwrap();
        assert_eq!(rows, vec![SourceRow::new(Some("P"), Some("R"), Some("G"))]);
    }

    #[test]
    fn short_rows_yield_absent_cells() {
        let table = Table::new(
            vec![
                "Principle".to_string(),
                "Requirement".to_string(),
                "Guidelines".to_string(),
            ],
            vec![vec![text("P1")], vec![]],
        );

        let rows = table.source_rows(&Columns::default()).unwrap();
        assert_eq!(
            rows,
            vec![SourceRow::new(Some("P1"), None, None), SourceRow::default()]
        );
    }

    #[test]
    fn blank_cells_are_absent() {
        let table = Table::new(
            vec![
                "Principle".to_string(),
                "Requirement".to_string(),
                "Guidelines".to_string(),
            ],
            vec![vec![text("  "), text(""), text("G")]],
        );

        let rows = table.source_rows(&Columns::default()).unwrap();
        assert_eq!(rows, vec![SourceRow::new(None, None, Some("G"))]);
    }

    #[test]
    fn missing_column_is_named() {
        let table = Table::new(vec!["Principle".to_string(), "Guidelines".to_string()], vec![]);

        let error = table.source_rows(&Columns::default()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "The source does not contain the column 'Requirement'"
        );
    }

    #[test]
    fn custom_column_names() {
        let columns = Columns {
            principle: "Principio".to_string(),
            requirement: "Requisito".to_string(),
            guidelines: "Guías".to_string(),
        };
        let table = Table::new(
            vec![
                "Principio".to_string(),
                "Requisito".to_string(),
                "Guías".to_string(),
            ],
            vec![vec![text("P"), text("R"), None]],
        );

        let rows = table.source_rows(&columns).unwrap();
        assert_eq!(rows, vec![SourceRow::new(Some("P"), Some("R"), None)]);
    }

    #[test]
    fn empty_header_row_misses_first_column() {
        let error = Table::default().source_rows(&Columns::default()).unwrap_err();
        assert!(matches!(
            error,
            SourceError::MissingColumn { ref column } if column == "Principle"
        ));
    }
}
