//! Batch generation of documents, one per table row.
//!
//! The generation loop clones the template document for each row, builds a
//! row context (skipping rows with missing values), runs the substitution
//! engine, and saves the result under a collision-free output path. After
//! the loop, the succeeded and failed row indices partition the input table
//! exactly; failed rows can be exported for correction and re-run.

mod batch;
mod output;
mod pdf;

pub use batch::{BatchReport, FAILED_ROWS_FILE, Generator, export_failed_rows};
pub use output::resolve_collision;
pub use pdf::convert_directory;
