//! Excel workbook writing.
//!
//! Writes a [`RowTable`] to a minimal single-sheet .xlsx workbook. Strings
//! are stored inline, so no shared strings table is needed; missing values
//! are written as absent cells, which is how they read back.

use crate::common::Result;
use crate::xlsx::cell::{self, CellValue};
use crate::xlsx::table::RowTable;
use crate::xlsx::template;
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a table to an .xlsx file at the given path.
pub fn write_table<P: AsRef<Path>>(table: &RowTable, path: P) -> Result<()> {
    let bytes = table_to_bytes(table)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a table to .xlsx bytes.
pub fn table_to_bytes(table: &RowTable) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 5] = [
        (
            "[Content_Types].xml",
            template::default_content_types_xml().to_string(),
        ),
        ("_rels/.rels", template::default_package_rels_xml().to_string()),
        ("xl/workbook.xml", template::default_workbook_xml().to_string()),
        (
            "xl/_rels/workbook.xml.rels",
            template::default_workbook_rels_xml().to_string(),
        ),
        ("xl/worksheets/sheet1.xml", worksheet_xml(table)),
    ];

    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Build the worksheet XML: a header row of column names followed by the
/// data rows.
fn worksheet_xml(table: &RowTable) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    let mut row_num = 1u32;
    write_row_open(&mut xml, row_num);
    for (col, name) in table.columns().iter().enumerate() {
        write_inline_string(&mut xml, col as u32 + 1, row_num, name);
    }
    xml.push_str("</row>");

    for row in table.rows() {
        row_num += 1;
        write_row_open(&mut xml, row_num);
        for (col, value) in row.iter().enumerate() {
            let col_num = col as u32 + 1;
            match value {
                CellValue::Text(text) => write_inline_string(&mut xml, col_num, row_num, text),
                CellValue::Number(n) => {
                    let _ = write!(
                        xml,
                        r#"<c r="{}{}"><v>{}</v></c>"#,
                        cell::column_to_letters(col_num),
                        row_num,
                        n
                    );
                },
                // Absent cells read back as Missing
                CellValue::Missing => {},
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn write_row_open(xml: &mut String, row_num: u32) {
    let _ = write!(xml, r#"<row r="{row_num}">"#);
}

fn write_inline_string(xml: &mut String, col_num: u32, row_num: u32, text: &str) {
    let _ = write!(
        xml,
        r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        cell::column_to_letters(col_num),
        row_num,
        escape_xml(text)
    );
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlsx::workbook::Workbook;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_write_read_round_trip() {
        let table = RowTable::new(
            vec!["name".to_string(), "count".to_string()],
            vec![
                vec![text("Alice"), CellValue::Number(3.0)],
                vec![text("Bob & Carol"), CellValue::Missing],
            ],
        );

        let bytes = table_to_bytes(&table).unwrap();
        let reread = Workbook::from_bytes(bytes).unwrap().read_table().unwrap();

        assert_eq!(reread.columns(), table.columns());
        assert_eq!(reread.rows()[0][0], text("Alice"));
        assert_eq!(reread.rows()[0][1], CellValue::Number(3.0));
        assert_eq!(reread.rows()[1][0], text("Bob & Carol"));
        assert!(reread.rows()[1][1].is_missing());
    }

    #[test]
    fn test_empty_table_round_trip() {
        let table = RowTable::new(vec!["only".to_string()], Vec::new());
        let bytes = table_to_bytes(&table).unwrap();
        let reread = Workbook::from_bytes(bytes).unwrap().read_table().unwrap();

        assert_eq!(reread.columns(), &["only".to_string()]);
        assert!(reread.is_empty());
    }
}
