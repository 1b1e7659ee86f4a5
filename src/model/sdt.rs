//! Structured document tags (content controls).

use super::{Hyperlink, Paragraph, Run, RunProperties, Table, BLOCK_PASS_THROUGH};
use crate::error::Result;
use crate::xml::{Decode, Element, Encode, Interleave, RawElement, XmlStream, XmlWriter};
use serde::{Deserialize, Serialize};

const SDTPR_ORDER: &[&str] = &[
    "rPr",
    "alias",
    "tag",
    "id",
    "lock",
    "placeholder",
    "temporary",
    "showingPlcHdr",
    "dataBinding",
    "label",
    "tabIndex",
    "appearance",
    "color",
    "checkbox",
    "equation",
    "comboBox",
    "date",
    "docPartObj",
    "docPartList",
    "dropDownList",
    "picture",
    "richText",
    "text",
    "citation",
    "group",
    "bibliography",
];

/// A content control (`w:sdt`), at block or inline level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sdt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SdtProperties>,
    /// `w:sdtEndPr`: properties of the closing mark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_properties: Option<SdtEndProperties>,
    /// `w:sdtContent`, in document order. `None` if the element was absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<SdtContent>>,
    /// Unrecognized children kept with `preserve_unknown`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

/// One child of `w:sdtContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SdtContent {
    Paragraph(Paragraph),
    Table(Table),
    Run(Run),
    Hyperlink(Hyperlink),
    Sdt(Sdt),
    Unknown(RawElement),
}

/// `w:sdtPr`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdtProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_properties: Option<RunProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Building-block gallery, as used by tables of contents and cover pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_part: Option<DocPartObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

/// `w:docPartObj`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPartObject {
    /// `w:docPartGallery/@w:val`, e.g. `Table of Contents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `w:docPartUnique` was present; its raw value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

/// `w:sdtEndPr`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdtEndProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_properties: Option<RunProperties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl Sdt {
    /// The control's content, empty if it has none.
    pub fn children(&self) -> &[SdtContent] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Plain text of the content; paragraphs are joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut last_was_block = false;
        for item in self.children() {
            let (text, block) = match item {
                SdtContent::Paragraph(p) => (p.text(), true),
                SdtContent::Table(t) => (t.text(), true),
                SdtContent::Run(r) => (r.text(), false),
                SdtContent::Hyperlink(h) => (h.text(), false),
                SdtContent::Sdt(s) => (s.text(), false),
                SdtContent::Unknown(_) => continue,
            };
            if block && last_was_block {
                out.push('\n');
            }
            out.push_str(&text);
            last_was_block = block;
        }
        out
    }
}

impl Decode for Sdt {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut sdt = Self::default();
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"sdtPr" => sdt.properties = Some(SdtProperties::decode(stream, &child)?),
                b"sdtEndPr" => {
                    let mut end = SdtEndProperties::default();
                    stream.read_children(&child, |stream, child| {
                        if child.local_name() == b"rPr" {
                            end.run_properties = Some(RunProperties::decode(stream, &child)?);
                        } else {
                            end.extra.extend(stream.opaque(&child)?);
                        }
                        Ok(())
                    })?;
                    sdt.end_properties = Some(end);
                }
                b"sdtContent" => {
                    let mut content = Vec::new();
                    stream.read_children(&child, |stream, child| {
                        let item = match child.local_name() {
                            b"p" => SdtContent::Paragraph(Paragraph::decode(stream, &child)?),
                            b"tbl" => SdtContent::Table(Table::decode(stream, &child)?),
                            b"r" => SdtContent::Run(Run::decode(stream, &child)?),
                            b"hyperlink" => SdtContent::Hyperlink(Hyperlink::decode(stream, &child)?),
                            b"sdt" => SdtContent::Sdt(Sdt::decode(stream, &child)?),
                            _ => match stream.capture_listed(&child, BLOCK_PASS_THROUGH)? {
                                Some(raw) => SdtContent::Unknown(raw),
                                None => return Ok(()),
                            },
                        };
                        content.push(item);
                        Ok(())
                    })?;
                    sdt.content = Some(content);
                }
                _ => sdt.extra.extend(stream.opaque(&child)?),
            }
            Ok(())
        })?;
        Ok(sdt)
    }
}

impl Encode for Sdt {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:sdt", &[]);
        if let Some(props) = &self.properties {
            props.encode(writer);
        }
        if let Some(end) = &self.end_properties {
            writer.start_with("w:sdtEndPr", &[]);
            if let Some(rpr) = &end.run_properties {
                rpr.encode(writer);
            }
            for raw in &end.extra {
                writer.raw(raw);
            }
            writer.end();
        }
        if let Some(content) = &self.content {
            writer.start_with("w:sdtContent", &[]);
            for item in content {
                match item {
                    SdtContent::Paragraph(p) => p.encode(writer),
                    SdtContent::Table(t) => t.encode(writer),
                    SdtContent::Run(r) => r.encode(writer),
                    SdtContent::Hyperlink(h) => h.encode(writer),
                    SdtContent::Sdt(s) => s.encode(writer),
                    SdtContent::Unknown(raw) => writer.raw(raw),
                }
            }
            writer.end();
        }
        for raw in &self.extra {
            writer.raw(raw);
        }
        writer.end();
    }
}

impl Decode for SdtProperties {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut props = Self::default();
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"rPr" => props.run_properties = Some(RunProperties::decode(stream, &child)?),
                b"alias" => props.alias = stream.leaf_val(&child)?,
                b"tag" => props.tag = stream.leaf_val(&child)?,
                b"id" => props.id = stream.leaf_val(&child)?,
                b"docPartObj" => {
                    let mut doc_part = DocPartObject::default();
                    stream.read_children(&child, |stream, child| {
                        match child.local_name() {
                            b"docPartGallery" => doc_part.gallery = stream.leaf_val(&child)?,
                            b"docPartCategory" => doc_part.category = stream.leaf_val(&child)?,
                            b"docPartUnique" => doc_part.unique = Some(stream.leaf_val(&child)?),
                            _ => doc_part.extra.extend(stream.opaque(&child)?),
                        }
                        Ok(())
                    })?;
                    props.doc_part = Some(doc_part);
                }
                _ => props.extra.extend(stream.capture_listed(&child, SDTPR_ORDER)?),
            }
            Ok(())
        })?;
        Ok(props)
    }
}

impl Encode for SdtProperties {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:sdtPr", &[]);
        let mut extras = Interleave::new(SDTPR_ORDER, &self.extra);
        if let Some(rpr) = &self.run_properties {
            extras.before(writer, "rPr");
            rpr.encode(writer);
        }
        for (local, name, val) in [
            ("alias", "w:alias", &self.alias),
            ("tag", "w:tag", &self.tag),
            ("id", "w:id", &self.id),
        ] {
            if let Some(val) = val {
                extras.before(writer, local);
                writer.val_leaf(name, Some(val));
            }
        }
        if let Some(doc_part) = &self.doc_part {
            extras.before(writer, "docPartObj");
            writer.start_with("w:docPartObj", &[]);
            if let Some(gallery) = &doc_part.gallery {
                writer.val_leaf("w:docPartGallery", Some(gallery));
            }
            if let Some(category) = &doc_part.category {
                writer.val_leaf("w:docPartCategory", Some(category));
            }
            if let Some(unique) = &doc_part.unique {
                writer.val_leaf("w:docPartUnique", unique.as_deref());
            }
            for raw in &doc_part.extra {
                writer.raw(raw);
            }
            writer.end();
        }
        extras.finish(writer);
        writer.end();
    }
}
