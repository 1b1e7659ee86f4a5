//! Paragraph and run property blocks.

use crate::error::Result;
use crate::xml::{
    Attributes, Decode, Element, Encode, Interleave, RawElement, XmlStream, XmlWriter,
};
use serde::{Deserialize, Serialize};

const PPR_ORDER: &[&str] = &[
    "pStyle",
    "keepNext",
    "keepLines",
    "pageBreakBefore",
    "framePr",
    "widowControl",
    "numPr",
    "suppressLineNumbers",
    "pBdr",
    "shd",
    "tabs",
    "suppressAutoHyphens",
    "kinsoku",
    "wordWrap",
    "overflowPunct",
    "topLinePunct",
    "autoSpaceDE",
    "autoSpaceDN",
    "bidi",
    "adjustRightInd",
    "snapToGrid",
    "spacing",
    "ind",
    "contextualSpacing",
    "mirrorIndents",
    "suppressOverlap",
    "jc",
    "textDirection",
    "textAlignment",
    "textboxTightWrap",
    "outlineLvl",
    "divId",
    "cnfStyle",
    "rPr",
    "sectPr",
    "pPrChange",
];

const RPR_ORDER: &[&str] = &[
    "ins",
    "del",
    "rStyle",
    "rFonts",
    "b",
    "bCs",
    "i",
    "iCs",
    "caps",
    "smallCaps",
    "strike",
    "dstrike",
    "outline",
    "shadow",
    "emboss",
    "imprint",
    "noProof",
    "snapToGrid",
    "vanish",
    "webHidden",
    "color",
    "spacing",
    "w",
    "kern",
    "position",
    "sz",
    "szCs",
    "highlight",
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
    "rPrChange",
];

const NUMPR_ORDER: &[&str] = &["ilvl", "numId", "numberingChange", "ins"];

/// An attribute-only on/off element such as `w:keepNext` or `w:b`.
///
/// The raw `w:val` is kept as written so the element round-trips; absence
/// is resolved by the reader through [`Toggle::value_or`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<String>,
}

impl Toggle {
    /// A toggle with an explicit value.
    pub fn new(val: impl Into<String>) -> Self {
        Self {
            val: Some(val.into()),
        }
    }

    /// The written value, or `default` when the attribute was absent.
    pub fn value_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.val.as_deref().unwrap_or(default)
    }

    /// Whether the toggle switches its property on.
    ///
    /// A bare element is on; `0`, `false`, `off` and `none` switch it off.
    pub fn is_on(&self) -> bool {
        !matches!(self.value_or("1"), "0" | "false" | "off" | "none")
    }

    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        Ok(Self {
            val: stream.leaf_val(start)?,
        })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) {
        writer.val_leaf(name, self.val.as_deref());
    }
}

/// A paragraph's list membership (`w:numPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingReference {
    /// Raw `w:ilvl/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ilvl: Option<String>,
    /// Raw `w:numId/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl NumberingReference {
    /// Reference level `ilvl` of numbering instance `num_id`.
    pub fn new(num_id: u32, ilvl: usize) -> Self {
        Self {
            ilvl: Some(ilvl.to_string()),
            num_id: Some(num_id.to_string()),
            extra: Vec::new(),
        }
    }

    /// The referenced level. Missing or unparsable values mean level 0.
    pub fn level(&self) -> usize {
        match self.ilvl.as_deref().map(|v| v.trim().parse::<usize>()) {
            Some(Ok(level)) => level,
            Some(Err(_)) => {
                log::warn!("invalid ilvl {:?}, using 0", self.ilvl);
                0
            }
            None => 0,
        }
    }

    /// The referenced numbering instance, if it parses as an integer.
    pub fn list_id(&self) -> Option<i64> {
        let raw = self.num_id.as_deref()?;
        match raw.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("invalid numId {:?}", raw);
                None
            }
        }
    }
}

impl Decode for NumberingReference {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut numbering = Self::default();
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"ilvl" => numbering.ilvl = stream.leaf_val(&child)?,
                b"numId" => numbering.num_id = stream.leaf_val(&child)?,
                b"numberingChange" | b"ins" => numbering.extra.push(stream.capture(&child)?),
                _ => numbering.extra.extend(stream.opaque(&child)?),
            }
            Ok(())
        })?;
        Ok(numbering)
    }
}

impl Encode for NumberingReference {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:numPr", &[]);
        let mut extras = Interleave::new(NUMPR_ORDER, &self.extra);
        if let Some(ilvl) = &self.ilvl {
            extras.before(writer, "ilvl");
            writer.val_leaf("w:ilvl", Some(ilvl));
        }
        if let Some(num_id) = &self.num_id {
            extras.before(writer, "numId");
            writer.val_leaf("w:numId", Some(num_id));
        }
        extras.finish(writer);
        writer.end();
    }
}

/// Paragraph properties (`w:pPr`).
///
/// Properties without a typed field are kept verbatim in `extra` and written
/// back at their schema position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphProperties {
    /// Paragraph style id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_next: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_lines: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_break_before: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widow_control: Option<Toggle>,
    /// List membership.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbering: Option<NumberingReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indentation: Option<Attributes>,
    /// Raw `w:jc/@w:val`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    /// Properties of the paragraph mark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_properties: Option<RunProperties>,
    /// Section break carried by this paragraph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_properties: Option<RawElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl ParagraphProperties {
    /// Create empty paragraph properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a numbering reference.
    pub fn with_numbering(mut self, numbering: NumberingReference) -> Self {
        self.numbering = Some(numbering);
        self
    }

    /// Set the paragraph style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

impl Decode for ParagraphProperties {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut props = Self::default();
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"pStyle" if child.is_val_leaf()? => props.style = stream.leaf_val(&child)?,
                b"keepNext" if child.is_plain_leaf()? => props.keep_next = Some(Toggle::decode(stream, &child)?),
                b"keepLines" if child.is_plain_leaf()? => props.keep_lines = Some(Toggle::decode(stream, &child)?),
                b"pageBreakBefore" if child.is_plain_leaf()? => {
                    props.page_break_before = Some(Toggle::decode(stream, &child)?)
                }
                b"widowControl" if child.is_plain_leaf()? => props.widow_control = Some(Toggle::decode(stream, &child)?),
                b"numPr" => props.numbering = Some(NumberingReference::decode(stream, &child)?),
                b"spacing" => props.spacing = Some(stream.leaf(&child)?),
                b"ind" => props.indentation = Some(stream.leaf(&child)?),
                b"jc" if child.is_val_leaf()? => props.justification = stream.leaf_val(&child)?,
                b"rPr" => props.run_properties = Some(RunProperties::decode(stream, &child)?),
                b"sectPr" => props.section_properties = Some(stream.capture(&child)?),
                _ => props.extra.extend(stream.capture_listed(&child, PPR_ORDER)?),
            }
            Ok(())
        })?;
        Ok(props)
    }
}

impl Encode for ParagraphProperties {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:pPr", &[]);
        let mut extras = Interleave::new(PPR_ORDER, &self.extra);
        if let Some(style) = &self.style {
            extras.before(writer, "pStyle");
            writer.val_leaf("w:pStyle", Some(style));
        }
        for (local, name, toggle) in [
            ("keepNext", "w:keepNext", &self.keep_next),
            ("keepLines", "w:keepLines", &self.keep_lines),
            ("pageBreakBefore", "w:pageBreakBefore", &self.page_break_before),
            ("widowControl", "w:widowControl", &self.widow_control),
        ] {
            if let Some(toggle) = toggle {
                extras.before(writer, local);
                toggle.encode(writer, name);
            }
        }
        if let Some(numbering) = &self.numbering {
            extras.before(writer, "numPr");
            numbering.encode(writer);
        }
        if let Some(spacing) = &self.spacing {
            extras.before(writer, "spacing");
            writer.leaf("w:spacing", spacing);
        }
        if let Some(ind) = &self.indentation {
            extras.before(writer, "ind");
            writer.leaf("w:ind", ind);
        }
        if let Some(jc) = &self.justification {
            extras.before(writer, "jc");
            writer.val_leaf("w:jc", Some(jc));
        }
        if let Some(rpr) = &self.run_properties {
            extras.before(writer, "rPr");
            rpr.encode(writer);
        }
        if let Some(sect) = &self.section_properties {
            extras.before(writer, "sectPr");
            writer.raw(sect);
        }
        extras.finish(writer);
        writer.end();
    }
}

/// Run properties (`w:rPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProperties {
    /// Character style id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Attributes>,
    /// Font size in half-points, raw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawElement>,
}

impl RunProperties {
    /// Create empty run properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether bold is switched on.
    pub fn is_bold(&self) -> bool {
        self.bold.as_ref().is_some_and(Toggle::is_on)
    }

    /// Whether italic is switched on.
    pub fn is_italic(&self) -> bool {
        self.italic.as_ref().is_some_and(Toggle::is_on)
    }
}

impl Decode for RunProperties {
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self> {
        let mut props = Self::default();
        stream.read_children(start, |stream, child| {
            match child.local_name() {
                b"rStyle" if child.is_val_leaf()? => props.style = stream.leaf_val(&child)?,
                b"rFonts" => props.fonts = Some(stream.leaf(&child)?),
                b"b" if child.is_plain_leaf()? => props.bold = Some(Toggle::decode(stream, &child)?),
                b"i" if child.is_plain_leaf()? => props.italic = Some(Toggle::decode(stream, &child)?),
                b"strike" if child.is_plain_leaf()? => props.strike = Some(Toggle::decode(stream, &child)?),
                b"color" => props.color = Some(stream.leaf(&child)?),
                b"sz" if child.is_val_leaf()? => props.size = stream.leaf_val(&child)?,
                b"highlight" if child.is_val_leaf()? => props.highlight = stream.leaf_val(&child)?,
                b"u" => props.underline = Some(stream.leaf(&child)?),
                b"vertAlign" if child.is_val_leaf()? => props.vertical_align = stream.leaf_val(&child)?,
                _ => props.extra.extend(stream.capture_listed(&child, RPR_ORDER)?),
            }
            Ok(())
        })?;
        Ok(props)
    }
}

impl Encode for RunProperties {
    fn encode(&self, writer: &mut XmlWriter) {
        writer.start_with("w:rPr", &[]);
        let mut extras = Interleave::new(RPR_ORDER, &self.extra);
        if let Some(style) = &self.style {
            extras.before(writer, "rStyle");
            writer.val_leaf("w:rStyle", Some(style));
        }
        if let Some(fonts) = &self.fonts {
            extras.before(writer, "rFonts");
            writer.leaf("w:rFonts", fonts);
        }
        for (local, name, toggle) in [
            ("b", "w:b", &self.bold),
            ("i", "w:i", &self.italic),
            ("strike", "w:strike", &self.strike),
        ] {
            if let Some(toggle) = toggle {
                extras.before(writer, local);
                toggle.encode(writer, name);
            }
        }
        if let Some(color) = &self.color {
            extras.before(writer, "color");
            writer.leaf("w:color", color);
        }
        if let Some(size) = &self.size {
            extras.before(writer, "sz");
            writer.val_leaf("w:sz", Some(size));
        }
        if let Some(highlight) = &self.highlight {
            extras.before(writer, "highlight");
            writer.val_leaf("w:highlight", Some(highlight));
        }
        if let Some(u) = &self.underline {
            extras.before(writer, "u");
            writer.leaf("w:u", u);
        }
        if let Some(va) = &self.vertical_align {
            extras.before(writer, "vertAlign");
            writer.val_leaf("w:vertAlign", Some(va));
        }
        extras.finish(writer);
        writer.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::DecodeOptions;

    fn decode_ppr(xml: &str, options: DecodeOptions) -> ParagraphProperties {
        let mut stream = XmlStream::new(xml, options);
        let root = stream.root().unwrap();
        ParagraphProperties::decode(&mut stream, &root).unwrap()
    }

    fn encode<T: Encode>(value: &T) -> String {
        let mut w = XmlWriter::new();
        value.encode(&mut w);
        w.into_string()
    }

    #[test]
    fn test_numbering_reference() {
        let ppr = decode_ppr(
            r#"<w:pPr><w:pStyle w:val="List"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr></w:pPr>"#,
            DecodeOptions::default(),
        );
        assert_eq!(ppr.style.as_deref(), Some("List"));
        let num = ppr.numbering.unwrap();
        assert_eq!(num.level(), 1);
        assert_eq!(num.list_id(), Some(3));
    }

    #[test]
    fn test_invalid_numbering_values_recover() {
        let num = NumberingReference {
            ilvl: Some("x".into()),
            num_id: Some("abc".into()),
            extra: Vec::new(),
        };
        assert_eq!(num.level(), 0);
        assert_eq!(num.list_id(), None);
        assert_eq!(NumberingReference::default().level(), 0);
    }

    #[test]
    fn test_toggle_defaults() {
        let ppr = decode_ppr(
            r#"<w:pPr><w:keepNext/><w:keepLines w:val="1"/></w:pPr>"#,
            DecodeOptions::default(),
        );
        let keep_next = ppr.keep_next.unwrap();
        assert_eq!(keep_next.value_or("0"), "0");
        assert!(keep_next.is_on());
        assert_eq!(ppr.keep_lines.unwrap().value_or("0"), "1");
        assert!(!Toggle::new("false").is_on());
    }

    #[test]
    fn test_empty_ppr_self_closes() {
        let ppr = decode_ppr("<w:pPr></w:pPr>", DecodeOptions::default());
        assert_eq!(encode(&ppr), "<w:pPr />");
    }

    #[test]
    fn test_schema_properties_kept_unknown_dropped() {
        let xml = r#"<w:pPr><w:pStyle w:val="A"/><w:pBdr><w:top w:val="single"/></w:pBdr><w:fooExt/><w:jc w:val="center"/></w:pPr>"#;
        let ppr = decode_ppr(xml, DecodeOptions::default());
        assert_eq!(ppr.extra.len(), 1);
        assert_eq!(
            encode(&ppr),
            r#"<w:pPr><w:pStyle w:val="A" /><w:pBdr><w:top w:val="single"/></w:pBdr><w:jc w:val="center" /></w:pPr>"#
        );
    }

    #[test]
    fn test_unknown_preserved_on_request() {
        let xml = r#"<w:pPr><w:fooExt a="1"/></w:pPr>"#;
        let ppr = decode_ppr(xml, DecodeOptions::default().with_preserve_unknown(true));
        assert_eq!(encode(&ppr), r#"<w:pPr><w:fooExt a="1"/></w:pPr>"#);
    }

    #[test]
    fn test_run_properties_round_trip() {
        let xml = r#"<w:rPr><w:rFonts w:ascii="Arial"/><w:b/><w:color w:val="FF0000"/><w:sz w:val="24"/></w:rPr>"#;
        let mut stream = XmlStream::new(xml, DecodeOptions::default());
        let root = stream.root().unwrap();
        let rpr = RunProperties::decode(&mut stream, &root).unwrap();
        assert!(rpr.is_bold());
        assert!(!rpr.is_italic());
        assert_eq!(rpr.size.as_deref(), Some("24"));
        assert_eq!(
            encode(&rpr),
            r#"<w:rPr><w:rFonts w:ascii="Arial" /><w:b /><w:color w:val="FF0000" /><w:sz w:val="24" /></w:rPr>"#
        );
    }

    #[test]
    fn test_leaves_richer_than_a_value_are_kept_verbatim() {
        let xml = r#"<w:pPr><w:pStyle/><w:keepNext w:val="1" w14:paraId="7"/><w:jc w:val="left" w:x="1"/><w:rPr><w:b w:val="0"/><w:sz/></w:rPr></w:pPr>"#;
        let ppr = decode_ppr(xml, DecodeOptions::default());
        assert_eq!(ppr.style, None);
        assert_eq!(ppr.keep_next, None);
        assert_eq!(ppr.justification, None);
        assert_eq!(ppr.extra.len(), 3);
        let rpr = ppr.run_properties.as_ref().unwrap();
        assert!(!rpr.is_bold());
        assert_eq!(rpr.size, None);
        assert_eq!(
            encode(&ppr),
            r#"<w:pPr><w:pStyle/><w:keepNext w:val="1" w14:paraId="7"/><w:jc w:val="left" w:x="1"/><w:rPr><w:b w:val="0" /><w:sz/></w:rPr></w:pPr>"#
        );
    }
}
