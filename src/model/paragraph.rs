//! Paragraphs and their inline content.

use super::{NumberingReference, ParagraphProperties, Run, RunProperties, Sdt};
use crate::error::Result;
use crate::xml::{Attributes, Decode, Element, Encode, RawElement, XmlStream, XmlWriter};
use serde::{Deserialize, Serialize};

/// Inline children that have no typed form but are always kept.
const PASS_THROUGH: &[&str] = &[
    "proofErr",
    "commentRangeStart",
    "commentRangeEnd",
    "permStart",
    "permEnd",
    "fldSimple",
    "ins",
    "del",
    "moveFrom",
    "moveTo",
    "smartTag",
    "customXml",
    "oMath",
    "oMathPara",
    "subDoc",
];

/// One child of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Run(Run),
    Hyperlink(Hyperlink),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
    Sdt(Sdt),
    ParagraphProperties(ParagraphProperties),
    RunProperties(RunProperties),
    /// Content kept verbatim without a typed decoder.
    Unknown(RawElement),
}

impl Node {
    /// Decode one inline child, or `None` if it was dropped as unknown.
    pub(crate) fn decode_inline<'a>(
        stream: &mut XmlStream<'a>,
        child: &Element<'a>,
    ) -> Result<Option<Self>> {
        let node = match child.local_name() {
            b"r" => Node::Run(Run::decode(stream, child)?),
            b"hyperlink" => Node::Hyperlink(Hyperlink::decode(stream, child)?),
            b"bookmarkStart" => Node::BookmarkStart(BookmarkStart::decode(stream, child)?),
            b"bookmarkEnd" => Node::BookmarkEnd(BookmarkEnd::decode(stream, child)?),
            b"sdt" => Node::Sdt(Sdt::decode(stream, child)?),
            b"pPr" => Node::ParagraphProperties(ParagraphProperties::decode(stream, child)?),
            b"rPr" => Node::RunProperties(RunProperties::decode(stream, child)?),
            _ => match stream.capture_listed(child, PASS_THROUGH)? {
                Some(raw) => Node::Unknown(raw),
                None => return Ok(None),
            },
        };
        Ok(Some(node))
    }

    /// Plain text of this node, without numbering or link targets.
    pub fn text(&self) -> String {
        match self {
            Node::Run(run) => run.text(),
            Node::Hyperlink(link) => link.text(),
            Node::Sdt(sdt) => sdt.text(),
            _ => String::new(),
        }
    }
}

impl Encode for Node {
    fn encode(&self, writer: &mut XmlWriter) {
        match self {
            Node::Run(run) => run.encode(writer),
            Node::Hyperlink(link) => link.encode(writer),
            Node::BookmarkStart(mark) => mark.encode(writer),
            Node::BookmarkEnd(mark) => mark.encode(writer),
            Node::Sdt(sdt) => sdt.encode(writer),
            Node::ParagraphProperties(props) => props.encode(writer),
            Node::RunProperties(props) => props.encode(writer),
            Node::Unknown(raw) => writer.raw(raw),
        }
    }
}

/// A paragraph (`w:p`): attributes plus its children in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Builder form of [`Paragraph::push`].
    pub fn with_node(mut self, node: Node) -> Self {
        self.push(node);
        self
    }

    /// The paragraph's properties, if it has any.
    pub fn properties(&self) -> Option<&ParagraphProperties> {
        self.nodes.iter().find_map(|node| match node {
            Node::ParagraphProperties(props) => Some(props),
            _ => None,
        })
    }

    /// The paragraph's list membership, if any.
    pub fn numbering(&self) -> Option<&NumberingReference> {
        self.properties().and_then(|p| p.numbering.as_ref())
    }

    /// Plain text of all children, without numbering labels.
    pub fn text(&self) -> String {
        self.nodes.iter().map(Node::text).collect()
    }
}

impl Decode for Paragraph {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut paragraph = Self {
            attributes: start.attributes()?,
            nodes: Vec::new(),
        };
        stream.read_children(start, |stream, child| {
            paragraph.nodes.extend(Node::decode_inline(stream, &child)?);
            Ok(())
        })?;
        Ok(paragraph)
    }
}

impl Encode for Paragraph {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:p", &self.attributes);
        for node in &self.nodes {
            node.encode(writer);
        }
        writer.end();
    }
}

/// A hyperlink (`w:hyperlink`) wrapping inline content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// `r:id`, `w:anchor`, `w:history` and so on.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Hyperlink {
    /// Relationship id of an external target.
    pub fn relationship_id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    /// Bookmark name of an internal target.
    pub fn anchor(&self) -> Option<&str> {
        self.attributes.get("anchor")
    }

    /// Link text.
    pub fn text(&self) -> String {
        self.nodes.iter().map(Node::text).collect()
    }
}

impl Decode for Hyperlink {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut link = Self {
            attributes: start.attributes()?,
            nodes: Vec::new(),
        };
        stream.read_children(start, |stream, child| {
            link.nodes.extend(Node::decode_inline(stream, &child)?);
            Ok(())
        })?;
        Ok(link)
    }
}

impl Encode for Hyperlink {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:hyperlink", &self.attributes);
        for node in &self.nodes {
            node.encode(writer);
        }
        writer.end();
    }
}

/// Start of a bookmarked range (`w:bookmarkStart`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkStart {
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// A run nested inside the marker, as some producers write it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<Run>,
    /// Unrecognized children kept with `preserve_unknown`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl BookmarkStart {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name")
    }
}

impl Decode for BookmarkStart {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut mark = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            if child.local_name() == b"r" {
                mark.run = Some(Run::decode(stream, &child)?);
            } else {
                mark.extra.extend(stream.opaque(&child)?);
            }
            Ok(())
        })?;
        Ok(mark)
    }
}

impl Encode for BookmarkStart {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:bookmarkStart", &self.attributes);
        if let Some(run) = &self.run {
            run.encode(writer);
        }
        for raw in &self.extra {
            writer.raw(raw);
        }
        writer.end();
    }
}

/// End of a bookmarked range (`w:bookmarkEnd`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEnd {
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl BookmarkEnd {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }
}

impl Decode for BookmarkEnd {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        Ok(Self {
            attributes: stream.leaf(start)?,
        })
    }
}

impl Encode for BookmarkEnd {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.leaf("w:bookmarkEnd", &self.attributes);
    }
}
