//! Pomelo - A Rust library for mail-merge generation of Word documents
//!
//! This library fills Word (.docx) template documents from spreadsheet
//! (.xlsx) rows: every row produces one output document with `{{ field }}`
//! markers replaced by that row's values.
//!
//! Word splits paragraph text into formatting runs at arbitrary character
//! boundaries, so a marker typed by the template author frequently arrives
//! split across several runs (`["{", "{ name }}"]`). The merge engine
//! reassembles split markers across run boundaries before substitution, so
//! templates behave the way the author wrote them regardless of how the
//! editor fragmented the text.
//!
//! # Features
//!
//! - **DOCX I/O**: Read a .docx package, mutate its text, re-save with all
//!   other parts (styles, images, relationships) carried through untouched
//! - **XLSX input**: Read the first worksheet of a workbook as an ordered
//!   table of rows with column headers
//! - **Token reconstruction**: Reassemble template markers split across
//!   formatting runs without corrupting unrelated formatting
//! - **Batch generation**: One output document per row, with collision-free
//!   output naming and export of rows that could not be processed
//!
//! # Example - Filling a template
//!
//! ```no_run
//! use pomelo::{Generator, Workbook};
//!
//! # fn main() -> pomelo::Result<()> {
//! // Read the input table (first row = column names)
//! let table = Workbook::open("guests.xlsx")?.read_table()?;
//!
//! // Generate one document per row into the output directory
//! let generator = Generator::new("invitation {{ name }}.docx", "out")?;
//! let report = generator.run(&table)?;
//!
//! for (row, path) in report.produced() {
//!     println!("row {} -> {}", row, path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Merging a single paragraph
//!
//! ```
//! use pomelo::docx::{Paragraph, Run};
//! use pomelo::merge::{RowContext, TemplateRenderer, substitute_paragraph};
//! use pomelo::xlsx::CellValue;
//!
//! # fn main() -> pomelo::Result<()> {
//! let mut paragraph = Paragraph::new();
//! for text in ["Dear ", "{", "{ name }}", "!"] {
//!     paragraph.push_run(Run::new(text));
//! }
//!
//! let renderer = TemplateRenderer::new();
//! let context = RowContext::from_row(
//!     &["name".to_string()],
//!     &[CellValue::Text("Alice".to_string())],
//!     0,
//! )?;
//!
//! substitute_paragraph(&mut paragraph, &renderer, &context)?;
//! assert_eq!(paragraph.text(), "Dear Alice!");
//! # Ok(())
//! # }
//! ```

/// Common types shared across the library
///
/// This module provides the unified error type and result alias used by
/// every other module.
pub mod common;

/// Word (.docx) package reading, document model, and writing
///
/// Provides an owned, mutable model of the main document part (paragraphs
/// with runs, tables with cells) while every other package part is carried
/// through byte-for-byte on save.
pub mod docx;

/// Batch generation: one output document per table row
///
/// Drives the merge engine over every row, resolves collision-free output
/// paths, and exports rows that could not be processed.
pub mod generate;

/// The token reconstruction and substitution engine
///
/// Reassembles template markers split across run boundaries and renders
/// every run's text against a row context.
pub mod merge;

/// Excel (.xlsx) table input and failed-row output
pub mod xlsx;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use docx::{Document, Package};
pub use generate::{BatchReport, Generator};
pub use merge::{RowContext, TemplateRenderer};
pub use xlsx::{CellValue, RowTable, Workbook};
