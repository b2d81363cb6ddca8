//! Word (.docx) package and document model.
//!
//! A `.docx` file is an OPC package: a ZIP archive whose main part,
//! `word/document.xml`, carries the document body. This module reads the
//! package, parses the body into an owned model following the python-docx
//! design (`Document` -> `Paragraph` -> `Run`, `Table` -> `TableRow` ->
//! `Cell`), and re-saves the package with the mutated body while every other
//! part (styles, images, relationships, properties) is carried through
//! byte-for-byte.
//!
//! The model treats formatting as opaque payload: paragraph, run, table, and
//! cell properties are kept as raw XML fragments and re-emitted verbatim, so
//! mutating run text never disturbs formatting it does not understand.
//!
//! # Example
//!
//! ```no_run
//! use pomelo::docx::Package;
//!
//! # fn main() -> pomelo::Result<()> {
//! let pkg = Package::open("letter.docx")?;
//! let mut doc = pkg.document()?;
//!
//! for para in doc.paragraphs() {
//!     println!("Paragraph: {}", para.text());
//! }
//!
//! doc.for_each_paragraph_mut(&mut |para| {
//!     for run in para.runs_mut() {
//!         let upper = run.text().to_uppercase();
//!         run.set_text(upper);
//!     }
//! });
//! pkg.save_with_document(&doc, "letter-upper.docx")?;
//! # Ok(())
//! # }
//! ```

mod document;
mod package;
mod paragraph;
mod reader;
mod table;
mod template;
mod writer;

pub use document::{Block, Document};
pub use package::Package;
pub use paragraph::{Paragraph, Run};
pub use table::{Cell, Table, TableRow};

pub(crate) use paragraph::ParaChild;
