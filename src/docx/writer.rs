//! Serializer for `word/document.xml`.
//!
//! Re-emits the block model: preserved fragments (properties, raw children,
//! section settings) verbatim, run text as `<w:t>` elements with tabs and
//! breaks converted back to `<w:tab/>` and `<w:br/>`.

use crate::docx::document::{Block, Document};
use crate::docx::paragraph::{ParaChild, Paragraph, Run};
use crate::docx::table::Table;
use std::fmt::Write as FmtWrite;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Serialize a [`Document`] to the full `word/document.xml` content.
pub(crate) fn document_to_xml(doc: &Document) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECL);
    xml.push_str(&doc.root_tag);
    xml.push_str("<w:body>");
    write_blocks(&mut xml, &doc.blocks);
    xml.push_str(&doc.sect_pr_xml);
    xml.push_str("</w:body></w:document>");

    xml
}

fn write_blocks(xml: &mut String, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Paragraph(para) => write_paragraph(xml, para),
            Block::Table(table) => write_table(xml, table),
            Block::Raw(raw) => xml.push_str(raw),
        }
    }
}

fn write_paragraph(xml: &mut String, para: &Paragraph) {
    let _ = write!(xml, "<w:p{}>", para.attrs_xml);
    xml.push_str(&para.props_xml);
    for child in &para.children {
        match child {
            ParaChild::Run(run) => write_run(xml, run),
            ParaChild::Raw(raw) => xml.push_str(raw),
        }
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run) {
    let _ = write!(xml, "<w:r{}>", run.attrs_xml);
    xml.push_str(&run.props_xml);
    write_run_text(xml, &run.text);
    xml.push_str(&run.extras_xml);
    xml.push_str("</w:r>");
}

/// Emit run text, converting `'\t'` and `'\n'` back to their elements.
///
/// Text segments are wrapped in `<w:t xml:space="preserve">` so leading and
/// trailing whitespace survives consumers that trim.
fn write_run_text(xml: &mut String, text: &str) {
    let mut segment = String::new();

    let mut flush = |xml: &mut String, segment: &mut String| {
        if !segment.is_empty() {
            let _ = write!(
                xml,
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                escape_xml(segment)
            );
            segment.clear();
        }
    };

    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(xml, &mut segment);
                xml.push_str("<w:tab/>");
            },
            '\n' => {
                flush(xml, &mut segment);
                xml.push_str("<w:br/>");
            },
            _ => segment.push(ch),
        }
    }
    flush(xml, &mut segment);
}

fn write_table(xml: &mut String, table: &Table) {
    let _ = write!(xml, "<w:tbl{}>", table.attrs_xml);
    xml.push_str(&table.props_xml);
    for row in &table.rows {
        let _ = write!(xml, "<w:tr{}>", row.attrs_xml);
        xml.push_str(&row.props_xml);
        for cell in &row.cells {
            let _ = write!(xml, "<w:tc{}>", cell.attrs_xml);
            xml.push_str(&cell.props_xml);
            if cell.blocks.is_empty() {
                // A cell must contain at least one paragraph to be valid
                xml.push_str("<w:p/>");
            } else {
                write_blocks(xml, &cell.blocks);
            }
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
