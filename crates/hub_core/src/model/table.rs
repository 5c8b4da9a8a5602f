//! Immutable table value.
//!
//! # Responsibility
//! - Hold an ordered column list and row-major cells for one dataset.
//! - Reject malformed shapes at construction time.
//!
//! # Invariants
//! - Column names are non-blank and unique within a table.
//! - Every row has exactly `column_count()` cells.
//! - Every non-null cell matches its column's declared type.

use crate::model::value::{CellValue, ColumnType};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Shape violations detected by `Table::try_new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableValidationError {
    EmptyColumns,
    EmptyColumnName {
        index: usize,
    },
    DuplicateColumn(String),
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    CellTypeMismatch {
        row: usize,
        column: String,
        expected: ColumnType,
    },
}

impl Display for TableValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyColumns => write!(f, "table must declare at least one column"),
            Self::EmptyColumnName { index } => {
                write!(f, "column name at position {} is empty", index + 1)
            }
            Self::DuplicateColumn(name) => write!(f, "duplicate column name `{name}`"),
            Self::RowWidthMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row {} has {actual} cells but the table declares {expected} columns",
                row + 1
            ),
            Self::CellTypeMismatch {
                row,
                column,
                expected,
            } => write!(
                f,
                "row {} column `{column}` does not hold a {expected} value",
                row + 1
            ),
        }
    }
}

impl Error for TableValidationError {}

/// Immutable named-column dataset.
///
/// There are no mutators; replacing a table means building a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Builds a table after validating its shape.
    ///
    /// # Errors
    /// - `EmptyColumns` when `columns` is empty.
    /// - `EmptyColumnName` / `DuplicateColumn` for bad headers.
    /// - `RowWidthMismatch` when a row is ragged.
    /// - `CellTypeMismatch` when a non-null cell disagrees with its column.
    pub fn try_new(
        columns: Vec<Column>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, TableValidationError> {
        validate_columns(&columns)?;

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableValidationError::RowWidthMismatch {
                    row: row_index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (column, cell) in columns.iter().zip(row) {
                if !cell.fits(column.kind) {
                    return Err(TableValidationError::CellTypeMismatch {
                        row: row_index,
                        column: column.name.clone(),
                        expected: column.kind,
                    });
                }
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in declared order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw row-major cells.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Returns a name-addressable view of one row.
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterates rows as name-addressable views, in row order.
    pub fn iter_rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        self.rows.iter().map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    /// Returns every value of one column, or `None` for an unknown column.
    pub fn column_values(&self, name: &str) -> Option<Vec<&CellValue>> {
        let index = self.columns.iter().position(|column| column.name == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Rows as ordered column-name to value maps.
    pub fn to_records(&self) -> Vec<IndexMap<&str, &CellValue>> {
        self.iter_rows().map(|row| row.iter().collect()).collect()
    }
}

#[derive(Serialize)]
struct TableRecords<'a> {
    columns: &'a [Column],
    rows: Vec<IndexMap<&'a str, &'a CellValue>>,
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TableRecords {
            columns: &self.columns,
            rows: self.to_records(),
        }
        .serialize(serializer)
    }
}

/// Borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [Column],
    cells: &'a [CellValue],
}

impl<'a> RowView<'a> {
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let index = self.columns.iter().position(|c| c.name == column)?;
        self.cells.get(index)
    }

    pub fn values(&self) -> &'a [CellValue] {
        self.cells
    }

    /// `(column name, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.columns
            .iter()
            .map(|column| column.name.as_str())
            .zip(self.cells.iter())
    }
}

fn validate_columns(columns: &[Column]) -> Result<(), TableValidationError> {
    if columns.is_empty() {
        return Err(TableValidationError::EmptyColumns);
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        if column.name.trim().is_empty() {
            return Err(TableValidationError::EmptyColumnName { index });
        }
        if !seen.insert(column.name.as_str()) {
            return Err(TableValidationError::DuplicateColumn(column.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Column, Table, TableValidationError};
    use crate::model::value::{CellValue, ColumnType};

    fn people() -> Table {
        Table::try_new(
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("name", ColumnType::Text),
            ],
            vec![
                vec![CellValue::Integer(1), CellValue::from("Alice")],
                vec![CellValue::Integer(2), CellValue::Null],
            ],
        )
        .expect("valid table")
    }

    #[test]
    fn row_view_resolves_cells_by_name() {
        let table = people();
        let row = table.row(0).expect("first row");
        assert_eq!(row.get("name"), Some(&CellValue::from("Alice")));
        assert_eq!(row.get("missing"), None);
        assert!(table.row(2).is_none());
    }

    #[test]
    fn rejects_duplicate_and_blank_columns() {
        let duplicate = Table::try_new(
            vec![
                Column::new("a", ColumnType::Text),
                Column::new("a", ColumnType::Text),
            ],
            vec![],
        );
        assert_eq!(
            duplicate,
            Err(TableValidationError::DuplicateColumn("a".to_string()))
        );

        let blank = Table::try_new(vec![Column::new("  ", ColumnType::Text)], vec![]);
        assert_eq!(
            blank,
            Err(TableValidationError::EmptyColumnName { index: 0 })
        );

        assert_eq!(
            Table::try_new(vec![], vec![]),
            Err(TableValidationError::EmptyColumns)
        );
    }

    #[test]
    fn rejects_ragged_rows_and_mistyped_cells() {
        let ragged = Table::try_new(
            vec![Column::new("a", ColumnType::Integer)],
            vec![vec![CellValue::Integer(1), CellValue::Integer(2)]],
        );
        assert!(matches!(
            ragged,
            Err(TableValidationError::RowWidthMismatch {
                row: 0,
                expected: 1,
                actual: 2
            })
        ));

        let mistyped = Table::try_new(
            vec![Column::new("a", ColumnType::Integer)],
            vec![vec![CellValue::from("one")]],
        );
        assert!(matches!(
            mistyped,
            Err(TableValidationError::CellTypeMismatch { .. })
        ));
    }

    #[test]
    fn serializes_rows_as_ordered_records() {
        let json = serde_json::to_value(people()).expect("table should serialize");
        assert_eq!(json["columns"][0]["name"], "id");
        assert_eq!(json["columns"][0]["kind"], "integer");
        assert_eq!(json["rows"][0]["id"], 1);
        assert_eq!(json["rows"][1]["name"], serde_json::Value::Null);

        let keys: Vec<&String> = json["rows"][0]
            .as_object()
            .expect("record object")
            .keys()
            .collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn column_values_follow_row_order() {
        let table = people();
        let ids = table.column_values("id").expect("id column");
        assert_eq!(ids, vec![&CellValue::Integer(1), &CellValue::Integer(2)]);
        assert!(table.column_values("nope").is_none());
    }
}
