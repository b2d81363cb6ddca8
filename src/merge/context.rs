//! Row contexts for template rendering.

use crate::common::{Error, Result};
use crate::xlsx::CellValue;
use minijinja::Value;
use std::collections::BTreeMap;

/// The variable context derived from one table row.
///
/// Construction is all-or-nothing: a row with a missing value in any column
/// yields no context at all, so a document is never rendered from partial
/// data.
#[derive(Debug, Clone)]
pub struct RowContext {
    /// Zero-based index of the source row in the input table
    row: usize,
    /// Column name -> value mapping handed to the template engine
    value: Value,
}

impl RowContext {
    /// Build a context from one row.
    ///
    /// Iterates every column; the first missing value fails the whole row
    /// with [`Error::MissingValue`]. A row shorter than the column list is
    /// treated as missing in the absent columns.
    pub fn from_row(columns: &[String], cells: &[CellValue], row: usize) -> Result<Self> {
        let mut vars: BTreeMap<&str, Value> = BTreeMap::new();

        for (i, name) in columns.iter().enumerate() {
            let cell = cells.get(i).unwrap_or(&CellValue::Missing);
            let value = match cell {
                CellValue::Missing => return Err(Error::MissingValue { row }),
                CellValue::Text(text) => Value::from(text.as_str()),
                CellValue::Number(n) => number_value(*n),
            };
            vars.insert(name.as_str(), value);
        }

        Ok(Self {
            row,
            value: Value::from_serialize(&vars),
        })
    }

    /// The zero-based index of the source row.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// The context value handed to the template engine.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Spreadsheet numbers are floats; render whole numbers without the
/// trailing `.0` a float would print with.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
