/// Package implementation for Word documents.
use crate::common::{Error, Result};
use crate::docx::document::Document;
use crate::docx::template;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part name of the main document within the package.
const DOCUMENT_PART: &str = "word/document.xml";

/// A Word (.docx) package.
///
/// This is the main entry point for working with Word documents. A package
/// holds every part of the ZIP archive in memory; parsing the main document
/// and saving a mutated copy leave all other parts untouched, so styles,
/// numbering, images, and relationships survive a load/save round trip
/// byte-for-byte.
///
/// # Examples
///
/// ```rust,no_run
/// use pomelo::docx::Package;
///
/// # fn main() -> pomelo::Result<()> {
/// let pkg = Package::open("document.docx")?;
/// let doc = pkg.document()?;
/// println!("{}", doc.text());
/// # Ok(())
/// # }
/// ```
pub struct Package {
    /// Part name and raw bytes for every member of the archive, in
    /// archive order
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Open a .docx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Create a .docx package from in-memory bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
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

        let pkg = Self { parts };
        if pkg.part(DOCUMENT_PART).is_none() {
            return Err(Error::PartNotFound(DOCUMENT_PART.to_string()));
        }

        Ok(pkg)
    }

    /// Create a minimal package around an existing document body.
    ///
    /// The package contains only the parts required for a valid .docx file:
    /// content types, package relationships, and the main document.
    pub fn create(doc: &Document) -> Self {
        Self {
            parts: vec![
                (
                    "[Content_Types].xml".to_string(),
                    template::default_content_types_xml().as_bytes().to_vec(),
                ),
                (
                    "_rels/.rels".to_string(),
                    template::default_package_rels_xml().as_bytes().to_vec(),
                ),
                (DOCUMENT_PART.to_string(), doc.to_xml().into_bytes()),
            ],
        }
    }

    /// Get the raw bytes of a part by name, if present.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Parse the main document part.
    ///
    /// Each call parses anew, returning an independent [`Document`].
    pub fn document(&self) -> Result<Document> {
        let data = self
            .part(DOCUMENT_PART)
            .ok_or_else(|| Error::PartNotFound(DOCUMENT_PART.to_string()))?;
        let xml = std::str::from_utf8(data)
            .map_err(|e| Error::InvalidFormat(format!("{DOCUMENT_PART} is not UTF-8: {e}")))?;

        Document::from_xml(xml)
    }

    /// Serialize the package with the given document as its main part.
    ///
    /// Every other part is written back unchanged.
    pub fn to_bytes_with_document(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            writer.start_file(name.clone(), options)?;
            if name == DOCUMENT_PART {
                writer.write_all(doc.to_xml().as_bytes())?;
            } else {
                writer.write_all(data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Save the package to a file with the given document as its main part.
    pub fn save_with_document<P: AsRef<Path>>(&self, doc: &Document, path: P) -> Result<()> {
        let bytes = self.to_bytes_with_document(doc)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::document::Block;
    use crate::docx::paragraph::{Paragraph, Run};

    fn sample_document() -> Document {
        let mut doc = Document::default();
        let mut para = Paragraph::new();
        para.push_run(Run::new("Hello {{ name }}"));
        doc.blocks.push(Block::Paragraph(para));
        doc
    }

    #[test]
    fn test_create_and_reopen() {
        let pkg = Package::create(&sample_document());
        let bytes = pkg.to_bytes_with_document(&pkg.document().unwrap()).unwrap();

        let reopened = Package::from_bytes(bytes).unwrap();
        assert_eq!(reopened.document().unwrap().text(), "Hello {{ name }}");
        assert!(reopened.part("[Content_Types].xml").is_some());
    }

    #[test]
    fn test_missing_document_part_rejected() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("mimetype", options).unwrap();
        writer.write_all(b"application/zip").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(
            Package::from_bytes(bytes),
            Err(Error::PartNotFound(_))
        ));
    }

    #[test]
    fn test_unrelated_parts_survive_save() {
        let mut pkg = Package::create(&sample_document());
        pkg.parts
            .push(("word/media/image1.png".to_string(), vec![0x89, 0x50, 0x4E]));

        let mut doc = pkg.document().unwrap();
        doc.for_each_paragraph_mut(&mut |para| {
            for run in para.runs_mut() {
                run.set_text("changed");
            }
        });

        let bytes = pkg.to_bytes_with_document(&doc).unwrap();
        let reopened = Package::from_bytes(bytes).unwrap();

        assert_eq!(reopened.document().unwrap().text(), "changed");
        assert_eq!(
            reopened.part("word/media/image1.png"),
            Some(&[0x89u8, 0x50, 0x4E][..])
        );
    }
}
