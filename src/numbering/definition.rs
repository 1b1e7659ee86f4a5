//! The numbering definitions part (`word/numbering.xml`).

use super::NumberFormat;
use crate::error::{Error, Result};
use crate::model::{ParagraphProperties, RunProperties};
use crate::xml::{
    Attributes, Decode, DecodeOptions, Element, Encode, Interleave, RawElement, XmlStream,
    XmlWriter,
};
use serde::{Deserialize, Serialize};

/// Highest level index a list definition may use (`w:ilvl` is 0..=8).
pub const MAX_LEVEL: usize = 8;

const NUMBERING_ORDER: &[&str] = &["numPicBullet", "abstractNum", "num", "numIdMacAtCleanup"];

const ABSTRACT_ORDER: &[&str] = &[
    "nsid",
    "multiLevelType",
    "tmpl",
    "name",
    "styleLink",
    "numStyleLink",
    "lvl",
];

const LEVEL_ORDER: &[&str] = &[
    "start",
    "numFmt",
    "lvlRestart",
    "pStyle",
    "isLgl",
    "suff",
    "lvlText",
    "lvlPicBulletId",
    "legacy",
    "lvlJc",
    "pPr",
    "rPr",
];

/// One level of an abstract numbering definition (`w:lvl`).
///
/// Values are kept as written; the typed accessors apply the defaults used
/// for label rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// `w:ilvl`, `w:tplc`, `w:tentative`.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Raw `w:start/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Raw `w:numFmt/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Raw `w:lvlText/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw `w:lvlJc/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_properties: Option<ParagraphProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_properties: Option<RunProperties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
    /// Inserted to fill a gap in the level indices; never written out.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl Level {
    /// A level with the given index, start value, format and template.
    pub fn new(ilvl: usize, start: u32, format: &str, text: &str) -> Self {
        Self {
            attributes: Attributes::new().with("w:ilvl", ilvl.to_string()),
            start: Some(start.to_string()),
            format: Some(format.to_string()),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// An empty stand-in for a level index the definition skipped.
    pub fn placeholder(ilvl: usize) -> Self {
        Self {
            attributes: Attributes::new().with("w:ilvl", ilvl.to_string()),
            placeholder: true,
            ..Default::default()
        }
    }

    /// Level index from `w:ilvl`, if it parses.
    pub fn index(&self) -> Option<usize> {
        self.attributes.get("ilvl")?.trim().parse().ok()
    }

    /// Start value. Missing or unparsable values mean 0.
    pub fn start_value(&self) -> u32 {
        match self.start.as_deref().map(|v| v.trim().parse::<u32>()) {
            Some(Ok(start)) => start,
            Some(Err(_)) => {
                log::warn!("invalid start value {:?}, using 0", self.start);
                0
            }
            None => 0,
        }
    }

    /// Number format. A missing `w:numFmt` means decimal.
    pub fn number_format(&self) -> NumberFormat {
        self.format
            .as_deref()
            .map(NumberFormat::parse)
            .unwrap_or_default()
    }

    /// Level-text template, empty when absent.
    pub fn template(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl Decode for Level {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut level = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"start" => level.start = stream.leaf_val(&child)?,
                b"numFmt" => level.format = stream.leaf_val(&child)?,
                b"lvlText" => level.text = stream.leaf_val(&child)?,
                b"lvlJc" => level.justification = stream.leaf_val(&child)?,
                b"pPr" => {
                    level.paragraph_properties = Some(ParagraphProperties::decode(stream, &child)?)
                }
                b"rPr" => level.run_properties = Some(RunProperties::decode(stream, &child)?),
                _ => level.extra.extend(stream.capture_listed(&child, LEVEL_ORDER)?),
            }
            Ok(())
        })?;
        Ok(level)
    }
}

impl Encode for Level {
    fn encode(&self, writer: &mut XmlWriter) {
        if self.placeholder {
            return;
        }
        writer.start("w:lvl", &self.attributes);
        let mut extras = Interleave::new(LEVEL_ORDER, &self.extra);
        for (local, name, val) in [
            ("start", "w:start", &self.start),
            ("numFmt", "w:numFmt", &self.format),
            ("lvlText", "w:lvlText", &self.text),
            ("lvlJc", "w:lvlJc", &self.justification),
        ] {
            if let Some(val) = val {
                extras.before(writer, local);
                writer.val_leaf(name, Some(val));
            }
        }
        if let Some(ppr) = &self.paragraph_properties {
            extras.before(writer, "pPr");
            ppr.encode(writer);
        }
        if let Some(rpr) = &self.run_properties {
            extras.before(writer, "rPr");
            rpr.encode(writer);
        }
        extras.finish(writer);
        writer.end();
    }
}

/// An abstract numbering definition (`w:abstractNum`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractNum {
    /// `w:abstractNumId` and any other root attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_level_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmpl: Option<String>,
    /// Levels indexed by `w:ilvl`; gaps are filled with placeholders.
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl AbstractNum {
    /// An empty definition with the given id.
    pub fn new(id: u32) -> Self {
        Self {
            attributes: Attributes::new().with("w:abstractNumId", id.to_string()),
            ..Default::default()
        }
    }

    /// Raw `w:abstractNumId`.
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("abstractNumId")
    }

    /// Level at index `ilvl`, placeholders included.
    pub fn level(&self, ilvl: usize) -> Option<&Level> {
        self.levels.get(ilvl)
    }

    /// Store a level at its own index, padding any gap with placeholders.
    ///
    /// A level without a usable index goes after the last one. A level whose
    /// slot is already taken replaces it. Levels past [`MAX_LEVEL`] are
    /// dropped.
    pub fn insert_level(&mut self, level: Level) {
        let index = level.index().unwrap_or(self.levels.len());
        if index > MAX_LEVEL {
            log::warn!(
                "abstractNum {:?}: level index {} is out of range, skipping",
                self.id(),
                index
            );
            return;
        }
        while self.levels.len() < index {
            self.levels.push(Level::placeholder(self.levels.len()));
        }
        if index < self.levels.len() {
            self.levels[index] = level;
        } else {
            self.levels.push(level);
        }
    }

    /// Builder form of [`AbstractNum::insert_level`].
    pub fn with_level(mut self, level: Level) -> Self {
        self.insert_level(level);
        self
    }
}

impl Decode for AbstractNum {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut def = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"nsid" => def.nsid = stream.leaf_val(&child)?,
                b"multiLevelType" => def.multi_level_type = stream.leaf_val(&child)?,
                b"tmpl" => def.tmpl = stream.leaf_val(&child)?,
                b"lvl" => {
                    let level = Level::decode(stream, &child)?;
                    def.insert_level(level);
                }
                _ => def.extra.extend(stream.capture_listed(&child, ABSTRACT_ORDER)?),
            }
            Ok(())
        })?;
        Ok(def)
    }
}

impl Encode for AbstractNum {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:abstractNum", &self.attributes);
        let mut extras = Interleave::new(ABSTRACT_ORDER, &self.extra);
        for (local, name, val) in [
            ("nsid", "w:nsid", &self.nsid),
            ("multiLevelType", "w:multiLevelType", &self.multi_level_type),
            ("tmpl", "w:tmpl", &self.tmpl),
        ] {
            if let Some(val) = val {
                extras.before(writer, local);
                writer.val_leaf(name, Some(val));
            }
        }
        extras.before(writer, "lvl");
        for level in &self.levels {
            level.encode(writer);
        }
        extras.finish(writer);
        writer.end();
    }
}

/// A numbering instance (`w:num`) pointing at an abstract definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Num {
    /// `w:numId` and any other root attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Raw `w:abstractNumId/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_num_id: Option<String>,
    /// Level overrides, kept verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<RawElement>,
}

impl Num {
    /// Instance `num_id` of abstract definition `abstract_num_id`.
    pub fn new(num_id: u32, abstract_num_id: u32) -> Self {
        Self {
            attributes: Attributes::new().with("w:numId", num_id.to_string()),
            abstract_num_id: Some(abstract_num_id.to_string()),
            overrides: Vec::new(),
        }
    }

    /// Raw `w:numId`.
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("numId")
    }
}

impl Decode for Num {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut num = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"abstractNumId" => num.abstract_num_id = stream.leaf_val(&child)?,
                _ => num.overrides.extend(stream.capture_listed(&child, &["lvlOverride"])?),
            }
            Ok(())
        })?;
        Ok(num)
    }
}

impl Encode for Num {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:num", &self.attributes);
        if let Some(id) = &self.abstract_num_id {
            writer.val_leaf("w:abstractNumId", Some(id));
        }
        for raw in &self.overrides {
            writer.raw(raw);
        }
        writer.end();
    }
}

/// A decoded numbering definitions part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    /// Attributes of the root element, namespace declarations included.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub abstract_nums: Vec<AbstractNum>,
    #[serde(default)]
    pub nums: Vec<Num>,
    /// Picture bullets and other root children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl Numbering {
    /// Create an empty numbering part.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `word/numbering.xml` markup.
    pub fn from_xml(xml: &str, options: DecodeOptions) -> Result<Self> {
        let mut stream = XmlStream::new(xml, options);
        let root = stream.root()?;
        if root.local_name() != b"numbering" {
            return Err(Error::InvalidData(format!(
                "expected <w:numbering>, found <{}>",
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

    /// Whether the part defines nothing.
    pub fn is_empty(&self) -> bool {
        self.abstract_nums.is_empty() && self.nums.is_empty()
    }
}

impl Decode for Numbering {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut numbering = Self {
            attributes: start.attributes()?,
            ..Default::default()
        };
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"abstractNum" => numbering
                    .abstract_nums
                    .push(AbstractNum::decode(stream, &child)?),
                b"num" => numbering.nums.push(Num::decode(stream, &child)?),
                _ => numbering
                    .extra
                    .extend(stream.capture_listed(&child, NUMBERING_ORDER)?),
            }
            Ok(())
        })?;
        Ok(numbering)
    }
}

impl Encode for Numbering {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start("w:numbering", &self.attributes.declaring_wordml());
        let mut extras = Interleave::new(NUMBERING_ORDER, &self.extra);
        extras.before(writer, "abstractNum");
        for def in &self.abstract_nums {
            def.encode(writer);
        }
        extras.before(writer, "num");
        for num in &self.nums {
            num.encode(writer);
        }
        extras.finish(writer);
        writer.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:nsid w:val="1A2B3C4D"/><w:multiLevelType w:val="hybridMultilevel"/><w:lvl w:ilvl="0" w:tplc="0409000F"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl><w:lvl w:ilvl="2" w:tentative="1"><w:start w:val="1"/><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%3."/></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;

    #[test]
    fn test_levels_are_dense() {
        let numbering = Numbering::from_xml(NUMBERING, DecodeOptions::default()).unwrap();
        let def = &numbering.abstract_nums[0];
        assert_eq!(def.id(), Some("0"));
        assert_eq!(def.levels.len(), 3);
        assert!(!def.levels[0].placeholder);
        assert!(def.levels[1].placeholder);
        assert_eq!(def.levels[1].index(), Some(1));
        assert_eq!(def.levels[2].number_format(), NumberFormat::LowerRoman);
        assert_eq!(def.levels[2].template(), "%3.");
    }

    #[test]
    fn test_level_defaults() {
        let level = Level::placeholder(1);
        assert_eq!(level.start_value(), 0);
        assert_eq!(level.number_format(), NumberFormat::Decimal);
        assert_eq!(level.template(), "");

        let mut bad = Level::new(0, 1, "decimal", "%1");
        bad.start = Some("one".into());
        assert_eq!(bad.start_value(), 0);
    }

    #[test]
    fn test_out_of_order_levels() {
        let def = AbstractNum::new(4)
            .with_level(Level::new(3, 1, "decimal", "%4"))
            .with_level(Level::new(0, 5, "decimal", "%1"));
        assert_eq!(def.levels.len(), 4);
        assert_eq!(def.levels[0].start_value(), 5);
        assert!(def.levels[1].placeholder && def.levels[2].placeholder);
    }

    #[test]
    fn test_level_index_is_bounded() {
        let xml = r#"<w:numbering><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="200000"><w:start w:val="1"/></w:lvl><w:lvl w:ilvl="2000000000"/><w:lvl w:ilvl="8"/></w:abstractNum></w:numbering>"#;
        let numbering = Numbering::from_xml(xml, DecodeOptions::default()).unwrap();
        let def = &numbering.abstract_nums[0];
        assert_eq!(def.levels.len(), MAX_LEVEL + 1);
        assert!(!def.levels[MAX_LEVEL].placeholder);

        let mut def = AbstractNum::new(1);
        for _ in 0..20 {
            def.insert_level(Level::default());
        }
        assert_eq!(def.levels.len(), MAX_LEVEL + 1);
    }

    #[test]
    fn test_nums() {
        let numbering = Numbering::from_xml(NUMBERING, DecodeOptions::default()).unwrap();
        assert_eq!(numbering.nums.len(), 1);
        assert_eq!(numbering.nums[0].id(), Some("1"));
        assert_eq!(numbering.nums[0].abstract_num_id.as_deref(), Some("0"));
    }

    #[test]
    fn test_placeholders_not_written() {
        let numbering = Numbering::from_xml(NUMBERING, DecodeOptions::default()).unwrap();
        let xml = numbering.to_xml();
        assert_eq!(xml.matches("<w:lvl ").count(), 2);
        assert!(xml.contains(
            r#"<w:lvl w:ilvl="0" w:tplc="0409000F"><w:start w:val="1" /><w:numFmt w:val="decimal" /><w:lvlText w:val="%1." /><w:lvlJc w:val="left" /><w:pPr><w:ind w:left="720" w:hanging="360" /></w:pPr></w:lvl>"#
        ));
        assert!(xml.contains(r#"<w:num w:numId="1"><w:abstractNumId w:val="0" /></w:num>"#));
    }

    #[test]
    fn test_new_part_declares_namespace() {
        let numbering = Numbering::new();
        assert!(numbering
            .to_xml()
            .contains(r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" />"#));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        assert!(Numbering::from_xml("<w:document/>", DecodeOptions::default()).is_err());
    }
}
