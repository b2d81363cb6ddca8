//! Streaming parser for `word/document.xml`.
//!
//! Parses the document body into the owned block model. Everything the
//! model does not understand — properties, hyperlinks, bookmarks, drawings,
//! math — is captured as verbatim XML fragments and re-emitted unchanged by
//! the writer, so a read/write round trip only touches the parts the merge
//! engine mutates.

use crate::common::{Error, Result, resolve_entity_ref};
use crate::docx::document::{Block, Document};
use crate::docx::paragraph::{ParaChild, Paragraph, Run};
use crate::docx::table::{Cell, Table, TableRow};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse the XML content of `word/document.xml` into a [`Document`].
pub(crate) fn parse_document_xml(xml: &str) -> Result<Document> {
    let mut parser = BodyParser {
        xml,
        reader: Reader::from_str(xml),
    };
    parser.parse()
}

struct BodyParser<'a> {
    /// The full document.xml source, used to slice raw element spans
    xml: &'a str,
    reader: Reader<&'a [u8]>,
}

impl<'a> BodyParser<'a> {
    fn parse(&mut self) -> Result<Document> {
        let mut doc = Document::default();

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:document" => doc.root_tag = start_tag(&e),
                    b"w:body" => self.read_body(&mut doc)?,
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(doc)
    }

    /// Read the children of `<w:body>` until its end tag.
    fn read_body(&mut self, doc: &mut Document) -> Result<()> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:p" => {
                        let para = self.read_paragraph(&e)?;
                        doc.blocks.push(Block::Paragraph(para));
                    },
                    b"w:tbl" => {
                        let table = self.read_table(&e)?;
                        doc.blocks.push(Block::Table(table));
                    },
                    b"w:sectPr" => doc.sect_pr_xml = self.raw_element(&e)?,
                    _ => doc.blocks.push(Block::Raw(self.raw_element(&e)?)),
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:p" => doc.blocks.push(Block::Paragraph(Paragraph {
                        attrs_xml: attrs_of(&e),
                        ..Paragraph::default()
                    })),
                    b"w:sectPr" => doc.sect_pr_xml = empty_tag(&e),
                    _ => doc.blocks.push(Block::Raw(empty_tag(&e))),
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:body" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:body")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(())
    }

    /// Read a `<w:p>` element whose start tag has just been consumed.
    fn read_paragraph(&mut self, start: &BytesStart) -> Result<Paragraph> {
        let mut para = Paragraph {
            attrs_xml: attrs_of(start),
            ..Paragraph::default()
        };

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:pPr" => para.props_xml = self.raw_element(&e)?,
                    b"w:r" => {
                        let run = self.read_run(&e)?;
                        para.children.push(ParaChild::Run(run));
                    },
                    _ => para.children.push(ParaChild::Raw(self.raw_element(&e)?)),
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:pPr" => para.props_xml = empty_tag(&e),
                    b"w:r" => para.children.push(ParaChild::Run(Run {
                        attrs_xml: attrs_of(&e),
                        ..Run::default()
                    })),
                    _ => para.children.push(ParaChild::Raw(empty_tag(&e))),
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:p")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(para)
    }

    /// Read a `<w:r>` element whose start tag has just been consumed.
    ///
    /// Text content is collected from `<w:t>` children; tabs and breaks are
    /// folded into the text as `'\t'` and `'\n'` so they survive text
    /// mutation (the writer converts them back). Anything else inside the
    /// run is kept verbatim.
    fn read_run(&mut self, start: &BytesStart) -> Result<Run> {
        let mut run = Run {
            attrs_xml: attrs_of(start),
            ..Run::default()
        };

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:rPr" => run.props_xml = self.raw_element(&e)?,
                    b"w:t" => self.read_text_into(&mut run.text)?,
                    _ => run.extras_xml.push_str(&self.raw_element(&e)?),
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:rPr" => run.props_xml = empty_tag(&e),
                    b"w:t" => {},
                    b"w:tab" => run.text.push('\t'),
                    b"w:br" | b"w:cr" => run.text.push('\n'),
                    _ => run.extras_xml.push_str(&empty_tag(&e)),
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:r" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:r")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(run)
    }

    /// Collect the character content of a `<w:t>` element.
    fn read_text_into(&mut self, text: &mut String) -> Result<()> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Text(t)) => {
                    let decoded = t.decode().map_err(|e| Error::Xml(e.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|e| Error::Xml(e.to_string()))?;
                    text.push_str(&unescaped);
                },
                Ok(Event::GeneralRef(r)) => {
                    let resolved = resolve_entity_ref(&r)?;
                    text.push_str(&resolved);
                },
                Ok(Event::CData(t)) => text.push_str(&String::from_utf8_lossy(t.as_ref())),
                Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:t")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(())
    }

    /// Read a `<w:tbl>` element whose start tag has just been consumed.
    fn read_table(&mut self, start: &BytesStart) -> Result<Table> {
        let mut table = Table {
            attrs_xml: attrs_of(start),
            ..Table::default()
        };

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:tr" => {
                        let row = self.read_row(&e)?;
                        table.rows.push(row);
                    },
                    // tblPr, tblGrid, and anything else ahead of the rows
                    _ => table.props_xml.push_str(&self.raw_element(&e)?),
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tr" => table.rows.push(TableRow {
                        attrs_xml: attrs_of(&e),
                        ..TableRow::default()
                    }),
                    _ => table.props_xml.push_str(&empty_tag(&e)),
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:tbl" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:tbl")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(table)
    }

    /// Read a `<w:tr>` element whose start tag has just been consumed.
    fn read_row(&mut self, start: &BytesStart) -> Result<TableRow> {
        let mut row = TableRow {
            attrs_xml: attrs_of(start),
            ..TableRow::default()
        };

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:tc" => {
                        let cell = self.read_cell(&e)?;
                        row.cells.push(cell);
                    },
                    _ => row.props_xml.push_str(&self.raw_element(&e)?),
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tc" => row.cells.push(Cell {
                        attrs_xml: attrs_of(&e),
                        ..Cell::default()
                    }),
                    _ => row.props_xml.push_str(&empty_tag(&e)),
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:tr" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:tr")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(row)
    }

    /// Read a `<w:tc>` element whose start tag has just been consumed.
    ///
    /// Cells carry their own block sequence, so nested tables recurse here.
    fn read_cell(&mut self, start: &BytesStart) -> Result<Cell> {
        let mut cell = Cell {
            attrs_xml: attrs_of(start),
            ..Cell::default()
        };

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:tcPr" => cell.props_xml = self.raw_element(&e)?,
                    b"w:p" => {
                        let para = self.read_paragraph(&e)?;
                        cell.blocks.push(Block::Paragraph(para));
                    },
                    b"w:tbl" => {
                        let table = self.read_table(&e)?;
                        cell.blocks.push(Block::Table(table));
                    },
                    _ => cell.blocks.push(Block::Raw(self.raw_element(&e)?)),
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tcPr" => cell.props_xml = empty_tag(&e),
                    b"w:p" => cell.blocks.push(Block::Paragraph(Paragraph {
                        attrs_xml: attrs_of(&e),
                        ..Paragraph::default()
                    })),
                    _ => cell.blocks.push(Block::Raw(empty_tag(&e))),
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:tc" => break,
                Ok(Event::Eof) => return Err(unexpected_eof("w:tc")),
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(cell)
    }

    /// Capture an element verbatim: the start tag just consumed, its whole
    /// inner content, and the matching end tag.
    fn raw_element(&mut self, start: &BytesStart) -> Result<String> {
        let span = self
            .reader
            .read_to_end(start.name())
            .map_err(|e| Error::Xml(e.to_string()))?;
        let inner = &self.xml[span.start as usize..span.end as usize];
        let name = start.name();
        let name = String::from_utf8_lossy(name.as_ref());

        Ok(format!("{}{}</{}>", start_tag(start), inner, name))
    }
}

/// Rebuild a start tag, attributes included.
fn start_tag(e: &BytesStart) -> String {
    format!(
        "<{}{}>",
        String::from_utf8_lossy(e.name().as_ref()),
        attrs_of(e)
    )
}

/// Rebuild a self-closing tag, attributes included.
fn empty_tag(e: &BytesStart) -> String {
    format!(
        "<{}{}/>",
        String::from_utf8_lossy(e.name().as_ref()),
        attrs_of(e)
    )
}

/// Rebuild the attribute text of a tag (leading space included) for
/// verbatim re-emission. Attribute values are kept raw, entities intact.
fn attrs_of(e: &BytesStart) -> String {
    let mut attrs = String::new();
    for attr in e.attributes().flatten() {
        attrs.push(' ');
        attrs.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
        attrs.push_str("=\"");
        attrs.push_str(&String::from_utf8_lossy(&attr.value));
        attrs.push('"');
    }
    attrs
}

fn unexpected_eof(element: &str) -> Error {
    Error::Xml(format!("unexpected end of file inside <{element}>"))
}
