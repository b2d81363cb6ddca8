/// Document body model for Word documents.
use crate::common::Result;
use crate::docx::paragraph::{ParaChild, Paragraph, Run};
use crate::docx::reader;
use crate::docx::table::Table;
use crate::docx::writer;

/// Default `<w:document>` start tag used when building documents from
/// scratch. Documents opened from a package keep their original root tag so
/// namespace prefixes in preserved fragments stay declared.
pub(crate) const DEFAULT_ROOT_TAG: &str = concat!(
    "<w:document",
    " xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"",
    " xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
);

/// A top-level element of a document body or table cell.
#[derive(Debug, Clone)]
pub enum Block {
    /// A `<w:p>` paragraph
    Paragraph(Paragraph),
    /// A `<w:tbl>` table
    Table(Table),
    /// Any other element, carried through verbatim
    Raw(String),
}

/// The body of a Word document.
///
/// An ordered sequence of paragraphs and tables, parsed from
/// `word/document.xml`. The document owns its content, so cloning it yields
/// the fresh, independent copy the generation loop needs per row.
///
/// # Example
///
/// ```no_run
/// use pomelo::docx::Package;
///
/// # fn main() -> pomelo::Result<()> {
/// let pkg = Package::open("report.docx")?;
/// let doc = pkg.document()?;
///
/// println!("{} paragraphs, {} tables", doc.paragraph_count(), doc.table_count());
/// println!("{}", doc.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// Full start tag of the `<w:document>` root element
    pub(crate) root_tag: String,
    /// Body content in document order
    pub(crate) blocks: Vec<Block>,
    /// Raw trailing `<w:sectPr>` element of the body
    pub(crate) sect_pr_xml: String,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            blocks: Vec::new(),
            sect_pr_xml: String::new(),
        }
    }
}

impl Document {
    /// Parse a document from the XML content of `word/document.xml`.
    pub fn from_xml(xml: &str) -> Result<Self> {
        reader::parse_document_xml(xml)
    }

    /// Serialize the document back to `word/document.xml` content.
    pub fn to_xml(&self) -> String {
        writer::document_to_xml(self)
    }

    /// Get the body blocks in document order.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get the top-level paragraphs of the body.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(para) => Some(para),
                _ => None,
            })
            .collect()
    }

    /// Get the top-level tables of the body.
    pub fn tables(&self) -> Vec<&Table> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    /// Get the number of top-level paragraphs in the body.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().len()
    }

    /// Get the number of top-level tables in the body.
    pub fn table_count(&self) -> usize {
        self.tables().len()
    }

    /// Get all text content of the document, one line per paragraph,
    /// including table cell paragraphs.
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        collect_text(&self.blocks, &mut lines);
        lines.join("\n")
    }

    /// Visit every paragraph of the document mutably, in document order:
    /// body paragraphs and the paragraphs of every table cell, including
    /// nested tables.
    pub fn for_each_paragraph_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        visit_blocks(&mut self.blocks, visit);
    }

    /// Visit every run of the document mutably, propagating the first error.
    pub fn try_for_each_run_mut<F>(&mut self, visit: &mut F) -> Result<()>
    where
        F: FnMut(&mut Run) -> Result<()>,
    {
        let mut result = Ok(());
        self.for_each_paragraph_mut(&mut |para| {
            if result.is_err() {
                return;
            }
            for child in &mut para.children {
                if let ParaChild::Run(run) = child
                    && let Err(err) = visit(run)
                {
                    result = Err(err);
                    return;
                }
            }
        });
        result
    }
}

/// Collect paragraph text depth-first, in document order.
fn collect_text(blocks: &[Block], lines: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Paragraph(para) => lines.push(para.text()),
            Block::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        collect_text(&cell.blocks, lines);
                    }
                }
            },
            Block::Raw(_) => {},
        }
    }
}

/// Walk a block list depth-first, visiting paragraphs in document order.
fn visit_blocks<F>(blocks: &mut [Block], visit: &mut F)
where
    F: FnMut(&mut Paragraph),
{
    for block in blocks {
        match block {
            Block::Paragraph(para) => visit(para),
            Block::Table(table) => {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        visit_blocks(&mut cell.blocks, visit);
                    }
                }
            },
            Block::Raw(_) => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::table::{Cell, TableRow};

    fn paragraph_with_text(text: &str) -> Paragraph {
        let mut para = Paragraph::new();
        para.push_run(Run::new(text));
        para
    }

    fn single_cell_table(text: &str) -> Table {
        Table {
            rows: vec![TableRow {
                cells: vec![Cell {
                    blocks: vec![Block::Paragraph(paragraph_with_text(text))],
                    ..Cell::default()
                }],
                ..TableRow::default()
            }],
            ..Table::default()
        }
    }

    #[test]
    fn test_for_each_paragraph_covers_cells() {
        let mut doc = Document::default();
        doc.blocks.push(Block::Paragraph(paragraph_with_text("body")));
        doc.blocks.push(Block::Table(single_cell_table("cell")));

        let mut seen = Vec::new();
        doc.for_each_paragraph_mut(&mut |para| seen.push(para.text()));

        assert_eq!(seen, vec!["body".to_string(), "cell".to_string()]);
    }

    #[test]
    fn test_try_for_each_run_stops_on_error() {
        let mut doc = Document::default();
        doc.blocks.push(Block::Paragraph(paragraph_with_text("one")));
        doc.blocks.push(Block::Paragraph(paragraph_with_text("two")));

        let mut visited = 0;
        let result = doc.try_for_each_run_mut(&mut |_| {
            visited += 1;
            Err(crate::common::Error::InvalidFormat("stop".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_counts() {
        let mut doc = Document::default();
        doc.blocks.push(Block::Paragraph(paragraph_with_text("a")));
        doc.blocks.push(Block::Table(single_cell_table("b")));
        doc.blocks.push(Block::Raw("<w:bookmarkStart/>".to_string()));

        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(doc.table_count(), 1);
        assert_eq!(doc.text(), "a\nb");
    }
}
