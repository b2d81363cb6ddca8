//! End-to-end generation tests over real .docx and .xlsx files.

use pomelo::docx::{Document, Package};
use pomelo::generate::{FAILED_ROWS_FILE, export_failed_rows};
use pomelo::xlsx::{CellValue, RowTable, Workbook, write_table};
use pomelo::Generator;
use std::path::{Path, PathBuf};

/// A template body with a marker split across runs in the paragraph and a
/// self-contained marker inside a table cell.
const TEMPLATE_BODY: &str = concat!(
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body>"#,
    r#"<w:p>"#,
    r#"<w:r><w:t xml:space="preserve">Dear </w:t></w:r>"#,
    r#"<w:r><w:t>{</w:t></w:r>"#,
    r#"<w:r><w:t>{ name }}</w:t></w:r>"#,
    r#"<w:r><w:t>!</w:t></w:r>"#,
    r#"</w:p>"#,
    r#"<w:tbl><w:tblPr/>"#,
    r#"<w:tr><w:tc><w:p><w:r><w:t>Date: {{ date }}</w:t></w:r></w:p></w:tc></w:tr>"#,
    r#"</w:tbl>"#,
    r#"</w:body></w:document>"#,
);

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

/// Write the template .docx under the given file name and return its path.
fn write_template(dir: &Path, file_name: &str) -> PathBuf {
    let doc = Document::from_xml(TEMPLATE_BODY).unwrap();
    let pkg = Package::create(&doc);
    let path = dir.join(file_name);
    pkg.save_with_document(&doc, &path).unwrap();
    path
}

fn guest_table(rows: Vec<Vec<CellValue>>) -> RowTable {
    RowTable::new(vec!["name".to_string(), "date".to_string()], rows)
}

#[test]
fn rows_with_missing_values_are_skipped_and_partition_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), "invite {{ name }}.docx");
    let out_dir = dir.path().join("out");

    let table = guest_table(vec![
        vec![text("Alice"), text("Monday")],
        vec![text("Bob"), CellValue::Missing],
        vec![text("Carol"), text("Tuesday")],
    ]);

    let report = Generator::new(&template, &out_dir).unwrap().run(&table).unwrap();

    let produced_indices: Vec<usize> = report.produced().iter().map(|(i, _)| *i).collect();
    assert_eq!(produced_indices, vec![0, 2]);
    assert_eq!(report.failed(), &[1]);

    // Succeeded and failed indices are disjoint and cover the whole table.
    let mut all: Vec<usize> = produced_indices
        .iter()
        .chain(report.failed())
        .copied()
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..table.row_count()).collect::<Vec<_>>());

    assert_eq!(
        report.produced()[0].1,
        out_dir.join("invite Alice.docx")
    );
    assert_eq!(
        report.produced()[1].1,
        out_dir.join("invite Carol.docx")
    );

    // The split marker was reassembled and substituted, cell included.
    let generated = Package::open(&report.produced()[0].1)
        .unwrap()
        .document()
        .unwrap();
    assert_eq!(generated.text(), "Dear Alice!\nDate: Monday");
}

#[test]
fn colliding_output_names_get_a_counter() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), "invite {{ name }}.docx");
    let out_dir = dir.path().join("out");

    let table = guest_table(vec![
        vec![text("Bob"), text("Monday")],
        vec![text("Bob"), text("Tuesday")],
    ]);

    let report = Generator::new(&template, &out_dir).unwrap().run(&table).unwrap();

    assert_eq!(report.produced()[0].1, out_dir.join("invite Bob.docx"));
    assert_eq!(report.produced()[1].1, out_dir.join("invite Bob (1).docx"));
    assert!(report.produced()[1].1.exists());

    // Distinct contents: each file carries its own row's values.
    let second = Package::open(&report.produced()[1].1)
        .unwrap()
        .document()
        .unwrap();
    assert_eq!(second.text(), "Dear Bob!\nDate: Tuesday");
}

#[test]
fn failed_rows_export_round_trips_through_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), "invite {{ name }}.docx");
    let out_dir = dir.path().join("out");
    let side_file = dir.path().join(FAILED_ROWS_FILE);

    let table = guest_table(vec![
        vec![text("Alice"), text("Monday")],
        vec![text("Bob"), CellValue::Missing],
        vec![text("Carol"), text("Tuesday")],
    ]);

    let report = Generator::new(&template, &out_dir).unwrap().run(&table).unwrap();
    export_failed_rows(&table, report.failed(), &side_file).unwrap();

    let exported = Workbook::open(&side_file).unwrap().read_table().unwrap();
    assert_eq!(exported.columns(), table.columns());
    assert_eq!(exported.row_count(), 1);
    assert_eq!(exported.rows()[0][0], text("Bob"));
    assert!(exported.rows()[0][1].is_missing());
}

#[test]
fn generation_consumes_a_table_written_by_the_xlsx_writer() {
    let dir = tempfile::tempdir().unwrap();
    let template = write_template(dir.path(), "invite {{ name }}.docx");
    let out_dir = dir.path().join("out");
    let table_path = dir.path().join("guests.xlsx");

    write_table(
        &guest_table(vec![vec![text("Alice"), text("Monday")]]),
        &table_path,
    )
    .unwrap();

    let table = Workbook::open(&table_path).unwrap().read_table().unwrap();
    let report = Generator::new(&template, &out_dir).unwrap().run(&table).unwrap();

    assert_eq!(report.produced().len(), 1);
    assert!(report.failed().is_empty());

    let generated = Package::open(&report.produced()[0].1)
        .unwrap()
        .document()
        .unwrap();
    assert_eq!(generated.text(), "Dear Alice!\nDate: Monday");
}
