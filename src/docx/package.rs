//! Physical package handling for .docx files.
//!
//! A .docx file is an OPC package: a ZIP archive of XML parts. Templates are
//! read fully into memory, only `word/document.xml` is ever rewritten, and
//! every other part passes through byte-identical on save.
use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Package URI of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// An OPC package held in memory.
///
/// Parts keep their archive order so a saved package lists its entries the
/// way the source template did (`[Content_Types].xml` first).
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read a package from raw .docx bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Zip`] when the data is not a readable ZIP archive,
    /// and with [`Error::PartNotFound`] when the main document part is
    /// missing (the bytes are a ZIP but not a Word document).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            parts.push((name, blob));
        }

        let package = Self { parts };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(Error::PartNotFound(DOCUMENT_PART.to_string()));
        }
        Ok(package)
    }

    /// Get the binary content of a part by name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, blob)| blob.as_slice())
    }

    /// Replace the content of a part, appending it when absent.
    pub fn set_part(&mut self, name: &str, blob: Vec<u8>) {
        match self.parts.iter_mut().find(|(part_name, _)| part_name == name) {
            Some((_, existing)) => *existing = blob,
            None => self.parts.push((name.to_string(), blob)),
        }
    }

    /// Names of all parts in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Number of parts in the package.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the package has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Serialize the package to .docx bytes with Deflate compression.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, blob) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(blob)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_package() -> Package {
        Package {
            parts: vec![
                ("[Content_Types].xml".to_string(), b"<Types/>".to_vec()),
                ("_rels/.rels".to_string(), b"<Relationships/>".to_vec()),
                (DOCUMENT_PART.to_string(), b"<w:document/>".to_vec()),
            ],
        }
    }

    #[test]
    fn test_round_trip() {
        let package = minimal_package();
        let bytes = package.to_bytes().unwrap();

        let reread = Package::from_bytes(&bytes).unwrap();
        assert_eq!(reread.len(), 3);
        assert_eq!(reread.part(DOCUMENT_PART).unwrap(), b"<w:document/>");
        // Entry order is preserved.
        let names: Vec<&str> = reread.part_names().collect();
        assert_eq!(names[0], "[Content_Types].xml");
    }

    #[test]
    fn test_foreign_parts_pass_through() {
        let mut package = minimal_package();
        package.set_part("word/styles.xml", b"<w:styles/>".to_vec());
        package.set_part(DOCUMENT_PART, b"<w:document><w:body/></w:document>".to_vec());

        let bytes = package.to_bytes().unwrap();
        let reread = Package::from_bytes(&bytes).unwrap();
        assert_eq!(reread.part("word/styles.xml").unwrap(), b"<w:styles/>");
        assert_eq!(reread.part("_rels/.rels").unwrap(), b"<Relationships/>");
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("foo.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"bar").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = Package::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::PartNotFound(_)));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            Package::from_bytes(b"plainly not a zip archive"),
            Err(Error::Zip(_))
        ));
    }
}
