//! Word documents (.docx).
//!
//! A [`Docx`] decodes the main document part, the numbering definitions and
//! the document's relationships up front. Everything else in the package is
//! left untouched and copied through when the document is written back.

use crate::error::Result;
use crate::model::Document;
use crate::numbering::Numbering;
use crate::package::{Package, Relationship, Relationships};
use crate::render::{RenderOptions, TextRenderer};
use crate::xml::{normalize_self_closing, DecodeOptions};
use std::collections::BTreeMap;
use std::path::Path;

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const NUMBERING_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";

const NUMBERING_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

const DEFAULT_DOCUMENT_PATH: &str = "word/document.xml";
const DEFAULT_NUMBERING_PATH: &str = "word/numbering.xml";

/// A decoded Word document.
#[derive(Debug)]
pub struct Docx {
    package: Package,
    document_path: String,
    numbering_path: String,
    has_numbering_part: bool,
    document: Document,
    numbering: Numbering,
    relationships: Relationships,
}

impl Docx {
    /// Open a .docx file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use redocx::Docx;
    ///
    /// let docx = Docx::open("report.docx")?;
    /// for label in docx.numbering_labels()? {
    ///     println!("{}", label);
    /// }
    /// # Ok::<(), redocx::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    /// Open a .docx file with the given decode options.
    pub fn open_with(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        log::debug!("opening {}", path.as_ref().display());
        Self::from_package(Package::open(path)?, options)
    }

    /// Decode a .docx held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with(data, DecodeOptions::default())
    }

    /// Decode a .docx held in memory with the given decode options.
    pub fn from_bytes_with(data: Vec<u8>, options: DecodeOptions) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?, options)
    }

    /// Open a .docx file, reading it on the tokio runtime.
    #[cfg(feature = "async")]
    pub async fn open_async(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Self::from_bytes_with(data, options)
    }

    fn from_package(package: Package, options: DecodeOptions) -> Result<Self> {
        let document_path = package
            .read_relationships("")?
            .get_by_type(OFFICE_DOCUMENT_REL)
            .first()
            .map(|rel| Package::resolve_path("", &rel.target))
            .unwrap_or_else(|| DEFAULT_DOCUMENT_PATH.to_string());

        let document = Document::from_xml(&package.read_xml(&document_path)?, options)?;
        let relationships = package.read_relationships(&document_path)?;

        let numbering_path = relationships
            .get_by_type(NUMBERING_REL)
            .first()
            .map(|rel| Package::resolve_path(&document_path, &rel.target))
            .unwrap_or_else(|| DEFAULT_NUMBERING_PATH.to_string());
        let (numbering, has_numbering_part) = match package.read_optional_xml(&numbering_path)? {
            Some(xml) => (Numbering::from_xml(&xml, options)?, true),
            None => (Numbering::new(), false),
        };

        log::debug!(
            "decoded {}: {} body items, {} numbering definitions, {} relationships",
            document_path,
            document.body.items.len(),
            numbering.abstract_nums.len(),
            relationships.len()
        );

        Ok(Self {
            package,
            document_path,
            numbering_path,
            has_numbering_part,
            document,
            numbering,
            relationships,
        })
    }

    /// The decoded main document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the main document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The decoded numbering definitions; empty if the package has none.
    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    /// Mutable access to the numbering definitions.
    pub fn numbering_mut(&mut self) -> &mut Numbering {
        &mut self.numbering
    }

    /// Relationships of the main document part.
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// The underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Plain text of the body with list labels.
    ///
    /// Each call starts a fresh numbering session.
    pub fn plain_text(&self, options: &RenderOptions) -> Result<String> {
        TextRenderer::new(&self.numbering, options)
            .with_relationships(&self.relationships)
            .render_document(&self.document)
    }

    /// Label of every numbered paragraph, in reading order, with default
    /// numbering options.
    pub fn numbering_labels(&self) -> Result<Vec<String>> {
        self.numbering_labels_with(&RenderOptions::default())
    }

    /// Label of every numbered paragraph, in reading order.
    pub fn numbering_labels_with(&self, options: &RenderOptions) -> Result<Vec<String>> {
        TextRenderer::new(&self.numbering, options).labels(&self.document)
    }

    /// Serialize the package.
    ///
    /// The main document and the numbering definitions are re-encoded; every
    /// other part is copied as it was. A numbering part is only written if
    /// the package had one or definitions were added; a new one is linked
    /// from the document and given a content type override.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut parts = BTreeMap::new();
        parts.insert(
            self.document_path.clone(),
            normalize_self_closing(self.document.to_xml().as_bytes())?,
        );
        if self.has_numbering_part || !self.numbering.is_empty() {
            parts.insert(
                self.numbering_path.clone(),
                normalize_self_closing(self.numbering.to_xml().as_bytes())?,
            );
        }
        if !self.has_numbering_part && !self.numbering.is_empty() {
            self.register_numbering_part(&mut parts)?;
        }
        self.package.rewrite(&parts)
    }

    fn register_numbering_part(&self, parts: &mut BTreeMap<String, Vec<u8>>) -> Result<()> {
        if self.relationships.get_by_type(NUMBERING_REL).is_empty() {
            let rel = Relationship {
                id: self.relationships.next_id(),
                rel_type: NUMBERING_REL.to_string(),
                target: relative_target(&self.document_path, &self.numbering_path),
                external: false,
            };
            log::debug!("linking new numbering part {} as {}", self.numbering_path, rel.id);
            parts.insert(
                Package::relationships_path(&self.document_path),
                self.package.relationships_with(&self.document_path, &rel)?,
            );
        }
        if let Some(types) = self
            .package
            .content_types_with(&self.numbering_path, NUMBERING_CONTENT_TYPE)?
        {
            parts.insert(crate::package::CONTENT_TYPES_PATH.to_string(), types);
        }
        Ok(())
    }

    /// Write the package to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

/// Target of `part` as written in the relationships of `source`.
fn relative_target(source: &str, part: &str) -> String {
    let dir = source.rsplit_once('/').map_or("", |(dir, _)| dir);
    match part.strip_prefix(dir).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) if !dir.is_empty() => rest.to_string(),
        _ if dir.is_empty() => part.to_string(),
        _ => format!("/{}", part),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    fn build(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_missing_document_part() {
        let data = build(&[("_rels/.rels", PACKAGE_RELS)]);
        let err = Docx::from_bytes(data).unwrap_err();
        assert!(matches!(err, Error::MissingComponent(ref p) if p == "word/document.xml"));
    }

    #[test]
    fn test_numbering_is_optional() {
        let data = build(&[
            ("_rels/.rels", PACKAGE_RELS),
            (
                "word/document.xml",
                "<w:document><w:body><w:p><w:r><w:t>Hi</w:t></w:r></w:p></w:body></w:document>",
            ),
        ]);
        let docx = Docx::from_bytes(data).unwrap();
        assert!(docx.numbering().is_empty());
        assert!(docx.numbering_labels().unwrap().is_empty());
        assert_eq!(docx.plain_text(&RenderOptions::default()).unwrap(), "Hi");

        let rewritten = Package::from_bytes(docx.to_bytes().unwrap()).unwrap();
        assert!(!rewritten.exists("word/numbering.xml"));
    }

    #[test]
    fn test_added_numbering_part_is_linked() {
        use crate::numbering::{AbstractNum, Level, Num};

        let types = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
        let data = build(&[
            ("[Content_Types].xml", types),
            ("_rels/.rels", PACKAGE_RELS),
            (
                "word/document.xml",
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>One</w:t></w:r></w:p></w:body></w:document>"#,
            ),
        ]);
        let mut docx = Docx::from_bytes(data).unwrap();
        assert_eq!(docx.numbering_labels().unwrap(), ["＠"]);

        let numbering = docx.numbering_mut();
        numbering
            .abstract_nums
            .push(AbstractNum::new(0).with_level(Level::new(0, 1, "decimal", "%1.")));
        numbering.nums.push(Num::new(1, 0));

        let bytes = docx.to_bytes().unwrap();
        let package = Package::from_bytes(bytes.clone()).unwrap();
        let rels = package.read_relationships("word/document.xml").unwrap();
        let linked = rels.get_by_type(NUMBERING_REL);
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, "rId1");
        assert_eq!(linked[0].target, "numbering.xml");

        let types = package.read_xml("[Content_Types].xml").unwrap();
        assert!(types.contains(
            r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#
        ));
        assert!(types.contains(r#"PartName="/word/document.xml""#));

        let reopened = Docx::from_bytes(bytes).unwrap();
        assert_eq!(reopened.numbering_labels().unwrap(), ["1."]);

        // Writing again must not link the part a second time.
        let again = Package::from_bytes(reopened.to_bytes().unwrap()).unwrap();
        let rels = again.read_relationships("word/document.xml").unwrap();
        assert_eq!(rels.get_by_type(NUMBERING_REL).len(), 1);
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(relative_target("word/document.xml", "word/numbering.xml"), "numbering.xml");
        assert_eq!(relative_target("content/main.xml", "word/numbering.xml"), "/word/numbering.xml");
        assert_eq!(relative_target("main.xml", "word/numbering.xml"), "word/numbering.xml");
    }

    #[test]
    fn test_document_located_through_package_relationships() {
        let rels = PACKAGE_RELS.replace("word/document.xml", "/content/main.xml");
        let data = build(&[
            ("_rels/.rels", &rels),
            (
                "content/main.xml",
                "<w:document><w:body><w:p><w:r><w:t>Moved</w:t></w:r></w:p></w:body></w:document>",
            ),
        ]);
        let docx = Docx::from_bytes(data).unwrap();
        assert_eq!(docx.document().text(), "Moved");
    }
}
