//! The generation loop and failed-row export.

use crate::common::{Error, Result};
use crate::docx::{Document, Package};
use crate::generate::output::resolve_collision;
use crate::merge::{RowContext, TemplateRenderer, substitute_document};
use crate::xlsx::{self, RowTable};
use std::path::{Path, PathBuf};

/// Fixed name of the failed-rows side file.
pub const FAILED_ROWS_FILE: &str = "failed_rows.xlsx";

/// Outcome of a generation run.
///
/// The produced and failed row index sets are disjoint and together cover
/// the whole input table.
#[derive(Debug)]
pub struct BatchReport {
    /// Row index and saved path for every generated document, in row order
    produced: Vec<(usize, PathBuf)>,
    /// Row indices skipped because of missing values, in row order
    failed: Vec<usize>,
}

impl BatchReport {
    /// Row index and saved path for every generated document.
    #[inline]
    pub fn produced(&self) -> &[(usize, PathBuf)] {
        &self.produced
    }

    /// Row indices that could not be processed.
    #[inline]
    pub fn failed(&self) -> &[usize] {
        &self.failed
    }
}

/// Drives mail-merge generation: one output document per table row.
///
/// # Examples
///
/// ```rust,no_run
/// use pomelo::{Generator, Workbook};
///
/// # fn main() -> pomelo::Result<()> {
/// let table = Workbook::open("guests.xlsx")?.read_table()?;
/// let report = Generator::new("invite {{ name }}.docx", "out")?.run(&table)?;
/// println!("{} generated, {} skipped", report.produced().len(), report.failed().len());
/// # Ok(())
/// # }
/// ```
pub struct Generator {
    /// The template package; parts other than the document body are reused
    /// verbatim for every output
    package: Package,
    /// Parsed template body, cloned fresh for every row
    template_doc: Document,
    /// Output file name template, itself rendered per row (the template
    /// file's own name, which may contain markers)
    file_name_template: String,
    /// Directory all outputs are written into
    output_dir: PathBuf,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Open a template document and prepare a generator writing into
    /// `output_dir`.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(template_path: P, output_dir: Q) -> Result<Self> {
        let template_path = template_path.as_ref();
        let package = Package::open(template_path)?;
        let template_doc = package.document()?;

        let file_name_template = template_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "template path has no file name: {}",
                    template_path.display()
                ))
            })?;

        Ok(Self {
            package,
            template_doc,
            file_name_template,
            output_dir: output_dir.as_ref().to_path_buf(),
            renderer: TemplateRenderer::new(),
        })
    }

    /// Run the generation loop over every row of the table, in order.
    ///
    /// A row with a missing value is recorded as failed and skipped —
    /// never fatal. A malformed template aborts the whole run on the first
    /// affected row; documents already saved for earlier rows stay on
    /// disk.
    pub fn run(&self, table: &RowTable) -> Result<BatchReport> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut produced = Vec::new();
        let mut failed = Vec::new();

        for (row_idx, cells) in table.rows().iter().enumerate() {
            let ctx = match RowContext::from_row(table.columns(), cells, row_idx) {
                Ok(ctx) => ctx,
                Err(Error::MissingValue { row }) => {
                    log::warn!("row {row} skipped: missing value");
                    failed.push(row);
                    continue;
                },
                Err(err) => return Err(err),
            };

            let mut doc = self.template_doc.clone();
            substitute_document(&mut doc, &self.renderer, &ctx)?;

            let file_name = self.renderer.render(&self.file_name_template, ctx.value())?;
            // The disambiguation counter lives inside resolve_collision;
            // it never touches the row index recorded below.
            let target = resolve_collision(&self.output_dir.join(file_name));
            self.package.save_with_document(&doc, &target)?;

            log::info!("row {row_idx} generated {}", target.display());
            produced.push((row_idx, target));
        }

        Ok(BatchReport { produced, failed })
    }
}

/// Persist the failed rows of a table to an .xlsx side file, original
/// values untouched. No-op when the failed set is empty.
pub fn export_failed_rows<P: AsRef<Path>>(
    table: &RowTable,
    failed: &[usize],
    path: P,
) -> Result<()> {
    if failed.is_empty() {
        return Ok(());
    }

    let subset = table.subset(failed);
    xlsx::write_table(&subset, path)
}
