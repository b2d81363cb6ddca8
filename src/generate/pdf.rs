//! External PDF rendering of generated documents.
//!
//! Delegates to a LibreOffice installation: one headless invocation over
//! the generated documents after the whole batch. A missing converter is a
//! reportable condition, not a crash — the generated documents are already
//! on disk and unaffected.

use crate::common::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the external converter binary.
const SOFFICE: &str = "soffice";

/// Convert every .docx in `dir` to PDF alongside it.
///
/// Returns the number of documents handed to the converter. Fails with
/// [`Error::ConverterUnavailable`] when the converter binary cannot be
/// found or exits unsuccessfully.
pub fn convert_directory<P: AsRef<Path>>(dir: P) -> Result<usize> {
    let dir = dir.as_ref();

    let mut documents: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
        })
        .collect();
    documents.sort();

    if documents.is_empty() {
        return Ok(0);
    }

    let status = Command::new(SOFFICE)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(dir)
        .args(&documents)
        .status()
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::ConverterUnavailable(format!(
                    "{SOFFICE} not found; install LibreOffice to enable PDF rendering"
                ))
            } else {
                Error::Io(err)
            }
        })?;

    if !status.success() {
        return Err(Error::ConverterUnavailable(format!(
            "{SOFFICE} exited with {status}"
        )));
    }

    log::info!("rendered {} document(s) to PDF in {}", documents.len(), dir.display());
    Ok(documents.len())
}
