//! In-memory table of rows read from a worksheet.

use crate::xlsx::cell::CellValue;

/// An ordered table of rows with named columns.
///
/// The first worksheet row supplies the column names; every data row is
/// padded to the column count with [`CellValue::Missing`] so the row shape
/// is uniform.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    /// Column names in worksheet order
    columns: Vec<String>,
    /// Data rows, each exactly `columns.len()` values long
    rows: Vec<Vec<CellValue>>,
}

impl RowTable {
    /// Create a table from column names and data rows.
    ///
    /// Rows are padded or truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Get the column names in order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the data rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Get the number of data rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a new table containing only the rows at the given indices,
    /// values untouched. Out-of-range indices are ignored.
    pub fn subset(&self, indices: &[usize]) -> RowTable {
        RowTable {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_rows_padded_to_width() {
        let table = RowTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![text("1")], vec![text("2"), text("3"), text("4")]],
        );

        assert_eq!(table.rows()[0], vec![text("1"), CellValue::Missing]);
        assert_eq!(table.rows()[1], vec![text("2"), text("3")]);
    }

    #[test]
    fn test_subset_preserves_values() {
        let table = RowTable::new(
            vec!["a".to_string()],
            vec![vec![text("first")], vec![text("second")], vec![text("third")]],
        );

        let subset = table.subset(&[2, 0]);
        assert_eq!(subset.row_count(), 2);
        assert_eq!(subset.rows()[0], vec![text("third")]);
        assert_eq!(subset.rows()[1], vec![text("first")]);
        assert_eq!(subset.columns(), table.columns());
    }
}
