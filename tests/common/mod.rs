//! Builders for in-memory .docx packages.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

/// A package under construction.
pub struct DocxBuilder {
    entries: Vec<(String, String)>,
}

impl DocxBuilder {
    /// A package whose main document has the given body markup.
    pub fn new(body: &str) -> Self {
        Self::with_document_xml(&format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}" xmlns:r="{}"><w:body>{}</w:body></w:document>"#,
            W_NS, R_NS, body
        ))
    }

    /// A package whose main document part is exactly `document`.
    pub fn with_document_xml(document: &str) -> Self {
        Self {
            entries: vec![
                ("[Content_Types].xml".to_string(), CONTENT_TYPES.to_string()),
                ("_rels/.rels".to_string(), PACKAGE_RELS.to_string()),
                ("word/document.xml".to_string(), document.to_string()),
            ],
        }
    }

    /// Add `word/numbering.xml` with the given root children.
    pub fn numbering(self, children: &str) -> Self {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="{}">{}</w:numbering>"#,
            W_NS, children
        );
        self.part("word/numbering.xml", &xml)
    }

    /// Add `word/_rels/document.xml.rels` with the given relationships.
    pub fn relationships(self, children: &str) -> Self {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            children
        );
        self.part("word/_rels/document.xml.rels", &xml)
    }

    /// Add an arbitrary part.
    pub fn part(mut self, name: &str, content: &str) -> Self {
        self.entries.push((name.to_string(), content.to_string()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in &self.entries {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

/// A numbered paragraph.
pub fn list_item(num_id: u32, ilvl: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        ilvl, num_id, text
    )
}

/// A plain paragraph.
pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t>{}</w:t></w:r></w:p>"#, text)
}

/// A level definition.
pub fn level(ilvl: u32, start: u32, format: &str, text: &str) -> String {
    format!(
        r#"<w:lvl w:ilvl="{}"><w:start w:val="{}"/><w:numFmt w:val="{}"/><w:lvlText w:val="{}"/><w:lvlJc w:val="left"/></w:lvl>"#,
        ilvl, start, format, text
    )
}

/// An abstract definition with the given levels.
pub fn abstract_num(id: u32, levels: &[String]) -> String {
    format!(
        r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="hybridMultilevel"/>{}</w:abstractNum>"#,
        id,
        levels.concat()
    )
}

/// A numbering instance.
pub fn num(num_id: u32, abstract_id: u32) -> String {
    format!(
        r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/></w:num>"#,
        num_id, abstract_id
    )
}
