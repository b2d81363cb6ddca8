/// Table structures for Word documents.
use crate::docx::document::Block;
use crate::docx::paragraph::Paragraph;

/// A table in a Word document.
///
/// Represents a `<w:tbl>` element: a grid of rows and cells. Table-level
/// properties (`<w:tblPr>`, `<w:tblGrid>`) are opaque payload.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Raw attribute text of the `<w:tbl>` start tag
    pub(crate) attrs_xml: String,
    /// Raw `<w:tblPr>` and `<w:tblGrid>` elements
    pub(crate) props_xml: String,
    /// Rows in document order
    pub(crate) rows: Vec<TableRow>,
}

impl Table {
    /// Get the number of rows in the table.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the rows in this table.
    #[inline]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Get mutable access to the rows in this table.
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [TableRow] {
        &mut self.rows
    }
}

/// A table row in a Word document.
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    /// Raw attribute text of the `<w:tr>` start tag
    pub(crate) attrs_xml: String,
    /// Raw `<w:trPr>` (and `<w:tblPrEx>`) elements
    pub(crate) props_xml: String,
    /// Cells in document order
    pub(crate) cells: Vec<Cell>,
}

impl TableRow {
    /// Get the cells in this row.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get mutable access to the cells in this row.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

/// A table cell in a Word document.
///
/// Cells contain their own sequence of blocks: paragraphs and, when tables
/// are nested, further tables.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Raw attribute text of the `<w:tc>` start tag
    pub(crate) attrs_xml: String,
    /// Raw `<w:tcPr>` element
    pub(crate) props_xml: String,
    /// Block content in document order
    pub(crate) blocks: Vec<Block>,
}

impl Cell {
    /// Get the top-level paragraphs in this cell.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(para) => Some(para),
                _ => None,
            })
            .collect()
    }

    /// Get the text content of the cell.
    ///
    /// Concatenates the text of the cell's paragraphs, one line per
    /// paragraph.
    pub fn text(&self) -> String {
        let paragraphs = self.paragraphs();
        let mut result = String::new();
        for (i, para) in paragraphs.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            result.push_str(&para.text());
        }
        result
    }
}
