//! Excel workbook reading.
//!
//! Reads the parts of an .xlsx package and exposes the first worksheet as a
//! [`RowTable`]. Shared strings are resolved transparently; absent cells and
//! cells without a value become [`CellValue::Missing`].

use crate::common::{Error, Result, resolve_entity_ref};
use crate::xlsx::cell::{self, CellValue};
use crate::xlsx::shared_strings::SharedStrings;
use crate::xlsx::table::RowTable;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{Cursor, Read};
use std::path::Path;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const DEFAULT_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// An Excel (.xlsx) workbook opened for reading.
///
/// # Examples
///
/// ```rust,no_run
/// use pomelo::xlsx::Workbook;
///
/// # fn main() -> pomelo::Result<()> {
/// let table = Workbook::open("table.xlsx")?.read_table()?;
/// for row in table.rows() {
///     println!("{row:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Workbook {
    /// Part name and raw bytes for every member of the archive
    parts: Vec<(String, Vec<u8>)>,
    /// Shared strings table, empty if the package has none
    shared_strings: SharedStrings,
    /// Part name of the first worksheet
    sheet_part: String,
}

impl Workbook {
    /// Open an .xlsx workbook from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Create a workbook from in-memory bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push((file.name().to_string(), data));
        }

        let mut workbook = Self {
            parts,
            shared_strings: SharedStrings::new(),
            sheet_part: DEFAULT_SHEET_PART.to_string(),
        };

        if workbook.part(WORKBOOK_PART).is_none() {
            return Err(Error::PartNotFound(WORKBOOK_PART.to_string()));
        }
        if let Some(data) = workbook.part(SHARED_STRINGS_PART) {
            let content = std::str::from_utf8(data).map_err(|e| {
                Error::InvalidFormat(format!("{SHARED_STRINGS_PART} is not UTF-8: {e}"))
            })?;
            workbook.shared_strings = SharedStrings::parse(content)?;
        }
        workbook.sheet_part = workbook.resolve_first_sheet()?;
        if workbook.part(&workbook.sheet_part).is_none() {
            return Err(Error::PartNotFound(workbook.sheet_part.clone()));
        }

        Ok(workbook)
    }

    /// Get the raw bytes of a part by name, if present.
    fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, data)| data.as_slice())
    }

    fn part_str(&self, name: &str) -> Result<&str> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::PartNotFound(name.to_string()))?;
        std::str::from_utf8(data)
            .map_err(|e| Error::InvalidFormat(format!("{name} is not UTF-8: {e}")))
    }

    /// Resolve the part name of the workbook's first worksheet via the
    /// workbook relationships.
    fn resolve_first_sheet(&self) -> Result<String> {
        let Some(rid) = first_sheet_rid(self.part_str(WORKBOOK_PART)?)? else {
            return Ok(DEFAULT_SHEET_PART.to_string());
        };
        let Ok(rels) = self.part_str(WORKBOOK_RELS_PART) else {
            return Ok(DEFAULT_SHEET_PART.to_string());
        };
        let Some(target) = relationship_target(rels, &rid)? else {
            return Ok(DEFAULT_SHEET_PART.to_string());
        };

        // Targets are relative to xl/ unless package-absolute.
        Ok(match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
        })
    }

    /// Read the first worksheet as a table.
    ///
    /// The first row supplies the column names; every following row becomes
    /// a data row padded to the column count with [`CellValue::Missing`].
    pub fn read_table(&self) -> Result<RowTable> {
        let raw_rows = self.read_sheet_rows()?;
        let mut rows = raw_rows.into_iter();

        let Some(header) = rows.next() else {
            return Ok(RowTable::default());
        };

        let mut columns = Vec::with_capacity(header.len());
        for (i, value) in header.into_iter().enumerate() {
            match value {
                CellValue::Text(name) => columns.push(name),
                CellValue::Number(n) => columns.push(number_to_string(n)),
                CellValue::Missing => {
                    return Err(Error::InvalidFormat(format!(
                        "column {} has an empty header",
                        cell::column_to_letters(i as u32 + 1)
                    )));
                },
            }
        }

        Ok(RowTable::new(columns, rows.collect()))
    }

    /// Parse the worksheet's `<sheetData>` into raw rows.
    fn read_sheet_rows(&self) -> Result<Vec<Vec<CellValue>>> {
        let content = self.part_str(&self.sheet_part)?;
        let mut reader = Reader::from_str(content);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        let mut row: Vec<CellValue> = Vec::new();
        let mut in_row = false;
        // State of the cell currently being read
        let mut cell_col: usize = 0;
        let mut cell_type = CellType::Number;
        let mut cell_value: Option<String> = None;
        // True while inside a `<v>` value or an inline string `<t>`
        let mut capturing = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"row" => {
                    in_row = true;
                    row = Vec::new();
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"row" => {
                    rows.push(Vec::new());
                },
                Ok(Event::Start(e)) if in_row && e.name().as_ref() == b"c" => {
                    (cell_col, cell_type) = read_cell_attrs(&e, row.len())?;
                    cell_value = None;
                },
                Ok(Event::Empty(e)) if in_row && e.name().as_ref() == b"c" => {
                    // A cell with no value: leave it Missing via padding.
                    let (col, _) = read_cell_attrs(&e, row.len())?;
                    grow_to(&mut row, col);
                },
                Ok(Event::Start(e))
                    if in_row && matches!(e.name().as_ref(), b"v" | b"t") =>
                {
                    capturing = true;
                },
                Ok(Event::Text(t)) if capturing => {
                    let decoded = t.decode().map_err(|e| Error::Xml(e.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|e| Error::Xml(e.to_string()))?;
                    cell_value
                        .get_or_insert_with(String::new)
                        .push_str(&unescaped);
                },
                Ok(Event::GeneralRef(r)) if capturing => {
                    cell_value
                        .get_or_insert_with(String::new)
                        .push_str(&resolve_entity_ref(&r)?);
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" | b"t" => capturing = false,
                    b"c" if in_row => {
                        let value = self.decode_cell(cell_type, cell_value.take())?;
                        grow_to(&mut row, cell_col);
                        row[cell_col] = value;
                    },
                    b"row" => {
                        rows.push(std::mem::take(&mut row));
                        in_row = false;
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(rows)
    }

    /// Turn a raw cell value into a [`CellValue`] according to its type.
    fn decode_cell(&self, cell_type: CellType, raw: Option<String>) -> Result<CellValue> {
        let Some(raw) = raw else {
            return Ok(CellValue::Missing);
        };

        Ok(match cell_type {
            CellType::SharedString => {
                let index: usize = raw.trim().parse().map_err(|_| {
                    Error::InvalidFormat(format!("invalid shared string index: {raw}"))
                })?;
                let text = self.shared_strings.get(index).ok_or_else(|| {
                    Error::InvalidFormat(format!("shared string index out of range: {index}"))
                })?;
                CellValue::Text(text.to_string())
            },
            CellType::InlineOrFormulaString => CellValue::Text(raw),
            CellType::Boolean => {
                let text = if raw.trim() == "1" { "TRUE" } else { "FALSE" };
                CellValue::Text(text.to_string())
            },
            CellType::Error => CellValue::Missing,
            CellType::Number => match raw.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Text(raw),
            },
        })
    }
}

/// Worksheet cell type as declared by the `t` attribute.
#[derive(Debug, Clone, Copy)]
enum CellType {
    SharedString,
    InlineOrFormulaString,
    Boolean,
    Error,
    Number,
}

/// Extract the 0-based column index and declared type of a `<c>` element.
fn read_cell_attrs(e: &BytesStart, next_col: usize) -> Result<(usize, CellType)> {
    let mut col = next_col;
    let mut cell_type = CellType::Number;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let reference = String::from_utf8_lossy(&attr.value);
                let (col_num, _row_num) = cell::reference_to_coords(&reference)?;
                col = (col_num - 1) as usize;
            },
            b"t" => {
                cell_type = match attr.value.as_ref() {
                    b"s" => CellType::SharedString,
                    b"str" | b"inlineStr" => CellType::InlineOrFormulaString,
                    b"b" => CellType::Boolean,
                    b"e" => CellType::Error,
                    _ => CellType::Number,
                };
            },
            _ => {},
        }
    }

    Ok((col, cell_type))
}

/// Grow a row with missing values so `index` is addressable.
fn grow_to(row: &mut Vec<CellValue>, index: usize) {
    if row.len() <= index {
        row.resize(index + 1, CellValue::Missing);
    }
}

/// Render a numeric header the way a user typed it: integers without the
/// trailing `.0`.
fn number_to_string(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Extract the `r:id` of the first `<sheet>` element in workbook.xml.
fn first_sheet_rid(content: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(content);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"r:id" {
                            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
                        }
                    }
                    return Ok(None);
                }
            },
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
    }
}

/// Look up a relationship target by id in a .rels part.
fn relationship_target(content: &str, rid: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(content);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut target = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = Some(String::from_utf8_lossy(&attr.value).into_owned()),
                            b"Target" => {
                                target = Some(String::from_utf8_lossy(&attr.value).into_owned());
                            },
                            _ => {},
                        }
                    }
                    if id.as_deref() == Some(rid) {
                        return Ok(target);
                    }
                }
            },
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sheet_rid() {
        let xml = concat!(
            r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets>"#,
            r#"<sheet name="Data" sheetId="1" r:id="rId3"/>"#,
            r#"<sheet name="Other" sheetId="2" r:id="rId4"/>"#,
            r#"</sheets></workbook>"#,
        );
        assert_eq!(first_sheet_rid(xml).unwrap(), Some("rId3".to_string()));
    }

    #[test]
    fn test_relationship_target() {
        let xml = concat!(
            r#"<Relationships>"#,
            r#"<Relationship Id="rId1" Type="t" Target="styles.xml"/>"#,
            r#"<Relationship Id="rId3" Type="t" Target="worksheets/sheet2.xml"/>"#,
            r#"</Relationships>"#,
        );
        assert_eq!(
            relationship_target(xml, "rId3").unwrap(),
            Some("worksheets/sheet2.xml".to_string())
        );
        assert_eq!(relationship_target(xml, "rId9").unwrap(), None);
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(1.5), "1.5");
    }
}
