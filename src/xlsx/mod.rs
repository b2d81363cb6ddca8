//! Excel (.xlsx) table input and output.
//!
//! The input side reads the first worksheet of a workbook as a [`RowTable`]:
//! an ordered header row of column names followed by data rows. Absent
//! cells become [`CellValue::Missing`], the marker the generation loop uses
//! to skip incomplete rows.
//!
//! The output side writes a [`RowTable`] back to a minimal single-sheet
//! workbook, used to export the rows that could not be processed.
//!
//! # Example
//!
//! ```no_run
//! use pomelo::xlsx::Workbook;
//!
//! # fn main() -> pomelo::Result<()> {
//! let table = Workbook::open("guests.xlsx")?.read_table()?;
//! println!("columns: {:?}", table.columns());
//! println!("{} data rows", table.row_count());
//! # Ok(())
//! # }
//! ```

mod cell;
mod shared_strings;
mod table;
mod template;
mod workbook;
mod writer;

pub use cell::CellValue;
pub use shared_strings::SharedStrings;
pub use table::RowTable;
pub use workbook::Workbook;
pub use writer::{table_to_bytes, write_table};
