//! Text runs.

use super::RunProperties;
use crate::error::Result;
use crate::xml::{Attributes, Decode, Element, Encode, RawElement, XmlStream, XmlWriter};
use serde::{Deserialize, Serialize};

/// Run children that have no typed form but are always kept.
const PASS_THROUGH: &[&str] = &[
    "fldChar",
    "lastRenderedPageBreak",
    "sym",
    "softHyphen",
    "noBreakHyphen",
    "footnoteReference",
    "endnoteReference",
    "commentReference",
    "separator",
    "continuationSeparator",
    "ptab",
    "object",
    "pict",
    "AlternateContent",
    "delText",
];

/// One piece of run content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunContent {
    /// Character data from `w:t`.
    Text {
        text: String,
        /// `xml:space="preserve"` was set.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        preserve_space: bool,
        /// Attributes other than `xml:space`, written after it.
        #[serde(default, skip_serializing_if = "Attributes::is_empty")]
        attributes: Attributes,
    },
    /// `w:tab`
    Tab,
    /// `w:br`, with its attributes (`w:type`, `w:clear`).
    Break { attributes: Attributes },
    /// `w:cr`
    CarriageReturn,
    /// Field instruction text. Not part of the visible text.
    InstrText {
        text: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        preserve_space: bool,
        #[serde(default, skip_serializing_if = "Attributes::is_empty")]
        attributes: Attributes,
    },
    /// Embedded drawing, kept verbatim.
    Drawing { element: RawElement },
    /// Content kept verbatim without a typed decoder.
    Unknown { element: RawElement },
}

/// A run of text sharing one set of properties (`w:r`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RunProperties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<RunContent>,
}

impl Run {
    /// Create an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a run holding a single piece of text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let preserve_space = text.starts_with(char::is_whitespace)
            || text.ends_with(char::is_whitespace);
        Self {
            contents: vec![RunContent::Text {
                text,
                preserve_space,
                attributes: Attributes::new(),
            }],
            ..Default::default()
        }
    }

    /// Visible text: `w:t` content, tabs as `\t`, breaks as `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for content in &self.contents {
            match content {
                RunContent::Text { text, .. } => out.push_str(text),
                RunContent::Tab => out.push('\t'),
                RunContent::Break { .. } | RunContent::CarriageReturn => out.push('\n'),
                RunContent::InstrText { .. }
                | RunContent::Drawing { .. }
                | RunContent::Unknown { .. } => {}
            }
        }
        out
    }
}

impl Decode for Run {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut run = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            let content = match child.local_name() {
                b"rPr" => {
                    run.properties = Some(RunProperties::decode(stream, &child)?);
                    return Ok(());
                }
                b"t" => {
                    let (preserve_space, attributes) = text_attributes(&child)?;
                    RunContent::Text {
                        preserve_space,
                        attributes,
                        text: stream.read_text(&child)?,
                    }
                }
                b"instrText" => {
                    let (preserve_space, attributes) = text_attributes(&child)?;
                    RunContent::InstrText {
                        preserve_space,
                        attributes,
                        text: stream.read_text(&child)?,
                    }
                }
                b"tab" => {
                    stream.skip(&child)?;
                    RunContent::Tab
                }
                b"br" => RunContent::Break {
                    attributes: stream.leaf(&child)?,
                },
                b"cr" => {
                    stream.skip(&child)?;
                    RunContent::CarriageReturn
                }
                b"drawing" => RunContent::Drawing {
                    element: stream.capture(&child)?,
                },
                _ => match stream.capture_listed(&child, PASS_THROUGH)? {
                    Some(element) => RunContent::Unknown { element },
                    None => return Ok(()),
                },
            };
            run.contents.push(content);
            Ok(())
        })?;
        Ok(run)
    }
}

impl Encode for Run {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:r", &self.attributes);
        if let Some(props) = &self.properties {
            props.encode(writer);
        }
        for content in &self.contents {
            match content {
                RunContent::Text {
                    text,
                    preserve_space,
                    attributes,
                } => text_element(writer, "w:t", text, *preserve_space, attributes),
                RunContent::InstrText {
                    text,
                    preserve_space,
                    attributes,
                } => text_element(writer, "w:instrText", text, *preserve_space, attributes),
                RunContent::Tab => writer.start_with("w:tab", &[]),
                RunContent::Break { attributes } => writer.start("w:br", attributes),
                RunContent::CarriageReturn => writer.start_with("w:cr", &[]),
                RunContent::Drawing { element } | RunContent::Unknown { element } => {
                    writer.raw(element);
                    continue;
                }
            }
            writer.end();
        }
        writer.end();
    }
}

/// Split `xml:space="preserve"` from the other attributes of a text element.
fn text_attributes(element: &Element<'_>) -> Result<(bool, Attributes)> {
    let mut preserve_space = false;
    let mut rest = Attributes::new();
    for attr in element.attributes()?.iter() {
        if attr.name == "xml:space" && attr.value == "preserve" {
            preserve_space = true;
        } else {
            rest.set(attr.name.as_str(), attr.value.as_str());
        }
    }
    Ok((preserve_space, rest))
}

fn text_element(
    writer: &mut XmlWriter,
    name: &str,
    text: &str,
    preserve_space: bool,
    attributes: &Attributes,
) {
    if preserve_space {
        let attrs = Attributes::new()
            .with("xml:space", "preserve")
            .with_all(attributes);
        writer.start(name, &attrs);
    } else {
        writer.start(name, attributes);
    }
    writer.text(text);
}
