//! The main document part (`word/document.xml`).

use super::{Paragraph, Sdt, SdtContent, Table, TableRow};
use crate::error::{Error, Result};
use crate::xml::{
    Attributes, Decode, DecodeOptions, Element, Encode, RawElement, XmlStream, XmlWriter,
};
use serde::{Deserialize, Serialize};

/// Block-level children that have no typed form but are always kept.
pub(crate) const BLOCK_PASS_THROUGH: &[&str] = &[
    "bookmarkStart",
    "bookmarkEnd",
    "proofErr",
    "permStart",
    "permEnd",
    "commentRangeStart",
    "commentRangeEnd",
    "customXml",
    "altChunk",
    "ins",
    "del",
    "moveFrom",
    "moveTo",
    "oMathPara",
];

/// One block-level child of the body, a table cell or a content control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BodyItem {
    Paragraph(Paragraph),
    Table(Table),
    Sdt(Sdt),
    /// Final section properties (`w:sectPr`).
    SectionProperties(RawElement),
    /// Content kept verbatim without a typed decoder.
    Unknown(RawElement),
}

impl BodyItem {
    /// Decode one block-level child, or `None` if it was dropped as unknown.
    pub(crate) fn decode_block<'a>(
        stream: &mut XmlStream<'a>,
        child: &Element<'a>,
    ) -> Result<Option<Self>> {
        let item = match child.local_name() {
            b"p" => BodyItem::Paragraph(Paragraph::decode(stream, child)?),
            b"tbl" => BodyItem::Table(Table::decode(stream, child)?),
            b"sdt" => BodyItem::Sdt(Sdt::decode(stream, child)?),
            b"sectPr" => BodyItem::SectionProperties(stream.capture(child)?),
            _ => match stream.capture_listed(child, BLOCK_PASS_THROUGH)? {
                Some(raw) => BodyItem::Unknown(raw),
                None => return Ok(None),
            },
        };
        Ok(Some(item))
    }

    /// Plain text without numbering labels.
    pub fn text(&self) -> String {
        match self {
            BodyItem::Paragraph(p) => p.text(),
            BodyItem::Table(t) => t.text(),
            BodyItem::Sdt(s) => s.text(),
            BodyItem::SectionProperties(_) | BodyItem::Unknown(_) => String::new(),
        }
    }
}

impl Encode for BodyItem {
    fn encode(&self, writer: &mut XmlWriter) {
        match self {
            BodyItem::Paragraph(p) => p.encode(writer),
            BodyItem::Table(t) => t.encode(writer),
            BodyItem::Sdt(s) => s.encode(writer),
            BodyItem::SectionProperties(raw) | BodyItem::Unknown(raw) => writer.raw(raw),
        }
    }
}

/// The document body (`w:body`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub items: Vec<BodyItem>,
}

impl Body {
    /// Iterate over top-level paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Visit every paragraph in reading order, descending into tables and
    /// content controls.
    pub fn for_each_paragraph<'a, F: FnMut(&'a Paragraph)>(&'a self, mut visit: F) {
        walk_blocks(&self.items, &mut visit);
    }

    /// Every paragraph in reading order, nested ones included.
    pub fn all_paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        self.for_each_paragraph(|p| out.push(p));
        out
    }
}

fn walk_blocks<'a, F: FnMut(&'a Paragraph)>(items: &'a [BodyItem], visit: &mut F) {
    for item in items {
        match item {
            BodyItem::Paragraph(p) => visit(p),
            BodyItem::Table(t) => walk_table(t, visit),
            BodyItem::Sdt(s) => walk_sdt(s, visit),
            BodyItem::SectionProperties(_) | BodyItem::Unknown(_) => {}
        }
    }
}

fn walk_table<'a, F: FnMut(&'a Paragraph)>(table: &'a Table, visit: &mut F) {
    for cell in table.rows().flat_map(TableRow::cells) {
        walk_blocks(&cell.content, visit);
    }
}

fn walk_sdt<'a, F: FnMut(&'a Paragraph)>(sdt: &'a Sdt, visit: &mut F) {
    for item in sdt.children() {
        match item {
            SdtContent::Paragraph(p) => visit(p),
            SdtContent::Table(t) => walk_table(t, visit),
            SdtContent::Sdt(inner) => walk_sdt(inner, visit),
            _ => {}
        }
    }
}

/// A decoded main document part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Attributes of the root element, namespace declarations included.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Root children before the body, such as `w:background`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
    pub body: Body,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `word/document.xml` markup.
    pub fn from_xml(xml: &str, options: DecodeOptions) -> Result<Self> {
        let mut stream = XmlStream::new(xml, options);
        let root = stream.root()?;
        if root.local_name() != b"document" {
            return Err(Error::InvalidData(format!(
                "expected <w:document>, found <{}>",
                root.name()
            )));
        }
        Self::decode(&mut stream, &root)
    }

    /// Serialize to markup, declaration included.
    pub fn to_xml(&self) -> String {
        let mut writer = XmlWriter::new();
        writer.declaration();
        self.encode(&mut writer);
        writer.into_string()
    }

    /// Plain text without numbering labels, one line per block.
    pub fn text(&self) -> String {
        self.body
            .items
            .iter()
            .map(BodyItem::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Decode for Document {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut doc = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            if child.local_name() == b"body" {
                stream.read_children(&child, |stream, child| {
                    doc.body.items.extend(BodyItem::decode_block(stream, &child)?);
                    Ok(())
                })
            } else {
                doc.extra.extend(stream.capture_listed(&child, &["background"])?);
                Ok(())
            }
        })?;
        Ok(doc)
    }
}

impl Encode for Document {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:document", &self.attributes.declaring_wordml());
        for raw in &self.extra {
            writer.raw(raw);
        }
        writer.start_with("w:body", &[]);
        for item in &self.body.items {
            item.encode(writer);
        }
        writer.end();
        writer.end();
    }
}
