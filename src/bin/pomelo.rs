//! Command-line entry point: fill a Word template from spreadsheet rows.

use clap::Parser;
use pomelo::generate::{FAILED_ROWS_FILE, convert_directory, export_failed_rows};
use pomelo::{Error, Generator, Workbook};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "pomelo",
    version,
    about = "Fills Word (.docx) templates from spreadsheet (.xlsx) rows"
)]
struct Args {
    /// Template document path (.docx)
    docx: PathBuf,

    /// Table path (.xlsx); first row holds the column names
    table: PathBuf,

    /// Directory where generated documents are stored
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Export rows that could not be processed to failed_rows.xlsx
    #[arg(long)]
    save_failed: bool,

    /// Additionally render each generated document to PDF (requires
    /// LibreOffice)
    #[arg(long)]
    render_pdf: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> pomelo::Result<()> {
    let table = Workbook::open(&args.table)?.read_table()?;
    let generator = Generator::new(&args.docx, &args.path)?;

    let report = generator.run(&table)?;
    for (_, path) in report.produced() {
        println!("Ready: {}", path.display());
    }

    if args.render_pdf {
        match convert_directory(&args.path) {
            Ok(count) => println!("Rendered {count} document(s) to PDF"),
            // The generated documents are unaffected; report and move on.
            Err(Error::ConverterUnavailable(detail)) => eprintln!("PDF rendering skipped: {detail}"),
            Err(err) => return Err(err),
        }
    }

    if args.save_failed && !report.failed().is_empty() {
        export_failed_rows(&table, report.failed(), Path::new(FAILED_ROWS_FILE))?;
        println!(
            "{} failed row(s) exported to {FAILED_ROWS_FILE}",
            report.failed().len()
        );
    }

    Ok(())
}
