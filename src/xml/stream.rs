//! Token stream over part markup and the generic child-dispatch driver.

use super::{Attributes, RawElement};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Options controlling how content is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep unrecognized subtrees as opaque nodes instead of dropping them.
    pub preserve_unknown: bool,
}

impl DecodeOptions {
    /// Create default decode options (unknown content is dropped).
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep unrecognized subtrees so a re-serialized part still carries them.
    pub fn with_preserve_unknown(mut self, preserve: bool) -> Self {
        self.preserve_unknown = preserve;
        self
    }
}

/// A start tag read from the stream.
///
/// Self-closing tags are reported as elements with `empty` set; they have no
/// children and no matching end tag.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    start: BytesStart<'a>,
    empty: bool,
}

impl<'a> Element<'a> {
    /// Qualified tag name.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &[u8] {
        self.start.local_name().into_inner()
    }

    /// Whether the tag was written as `<tag/>`.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// All attributes, in document order.
    pub fn attributes(&self) -> Result<Attributes> {
        Attributes::from_start(&self.start)
    }

    /// Value of a single attribute by local name.
    pub fn attr(&self, local: &str) -> Result<Option<String>> {
        Ok(self.attributes()?.get(local).map(str::to_string))
    }

    /// Whether the element is `<tag/>` with no attribute besides `val`.
    ///
    /// Only such elements fit a typed toggle without loss.
    pub fn is_plain_leaf(&self) -> Result<bool> {
        Ok(self.empty
            && self
                .attributes()?
                .iter()
                .all(|attr| super::local_part(&attr.name) == "val"))
    }

    /// Like [`Element::is_plain_leaf`], with `val` present.
    pub fn is_val_leaf(&self) -> Result<bool> {
        Ok(self.is_plain_leaf()? && self.attr("val")?.is_some())
    }
}

/// Pull-based token stream over one part's markup.
pub struct XmlStream<'a> {
    reader: Reader<&'a [u8]>,
    options: DecodeOptions,
}

impl<'a> XmlStream<'a> {
    /// Create a stream over markup text.
    pub fn new(xml: &'a str, options: DecodeOptions) -> Self {
        let mut reader = Reader::from_str(xml);
        // Whitespace inside w:t is content.
        reader.config_mut().trim_text(false);
        Self { reader, options }
    }

    /// Decode options in effect for this stream.
    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Advance to the document element, skipping the prolog.
    pub fn root(&mut self) -> Result<Element<'a>> {
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => return Ok(Element { start, empty: false }),
                Event::Empty(start) => return Ok(Element { start, empty: true }),
                Event::Eof => {
                    return Err(Error::InvalidData("markup has no root element".to_string()))
                }
                _ => {}
            }
        }
    }

    /// Drive the children of `parent`, one handler call per child element.
    ///
    /// The handler must consume the child it is given (decode it, or call
    /// [`XmlStream::skip`] / [`XmlStream::opaque`]). Text, comments and
    /// processing instructions between children are passed over. Returns
    /// once the parent's end tag has been read.
    pub fn read_children<F>(&mut self, parent: &Element<'a>, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut Self, Element<'a>) -> Result<()>,
    {
        if parent.empty {
            return Ok(());
        }
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => visit(self, Element { start, empty: false })?,
                Event::Empty(start) => visit(self, Element { start, empty: true })?,
                Event::End(_) => return Ok(()),
                Event::Eof => {
                    return Err(Error::UnexpectedEof {
                        element: parent.name(),
                    })
                }
                _ => {}
            }
        }
    }

    /// Consume an element's whole subtree without producing anything.
    pub fn skip(&mut self, element: &Element<'a>) -> Result<()> {
        if element.empty {
            return Ok(());
        }
        let mut depth = 0usize;
        loop {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => {
                    return Err(Error::UnexpectedEof {
                        element: element.name(),
                    })
                }
                _ => {}
            }
        }
    }

    /// Read an attribute-only element, skipping anything nested in it.
    pub fn leaf(&mut self, element: &Element<'a>) -> Result<Attributes> {
        let attrs = element.attributes()?;
        self.skip(element)?;
        Ok(attrs)
    }

    /// Read the `val` attribute of a single-value element.
    pub fn leaf_val(&mut self, element: &Element<'a>) -> Result<Option<String>> {
        Ok(self.leaf(element)?.get("val").map(str::to_string))
    }

    /// Handle an element kind that has no registered decoder.
    ///
    /// With `preserve_unknown` the subtree is captured verbatim, otherwise
    /// it is skipped and `None` is returned.
    pub fn opaque(&mut self, element: &Element<'a>) -> Result<Option<RawElement>> {
        if self.options.preserve_unknown {
            return self.capture(element).map(Some);
        }
        log::debug!("skipping unsupported element <{}>", element.name());
        self.skip(element)?;
        Ok(None)
    }

    /// Capture `element` if its local name is one of `names`, otherwise
    /// apply the unknown-element policy of [`XmlStream::opaque`].
    pub fn capture_listed(
        &mut self,
        element: &Element<'a>,
        names: &[&str],
    ) -> Result<Option<RawElement>> {
        let local = element.local_name();
        if names.iter().any(|name| name.as_bytes() == local) {
            self.capture(element).map(Some)
        } else {
            self.opaque(element)
        }
    }

    /// Capture an element's subtree as verbatim markup.
    pub fn capture(&mut self, element: &Element<'a>) -> Result<RawElement> {
        let name = element.name();
        let mut writer = Writer::new(Vec::new());
        if element.empty {
            writer.write_event(Event::Empty(element.start.borrow()))?;
        } else {
            writer.write_event(Event::Start(element.start.borrow()))?;
            let mut depth = 0usize;
            loop {
                let event = self.reader.read_event()?;
                let closes = match &event {
                    Event::Start(_) => {
                        depth += 1;
                        false
                    }
                    Event::End(_) if depth == 0 => true,
                    Event::End(_) => {
                        depth -= 1;
                        false
                    }
                    Event::Eof => return Err(Error::UnexpectedEof { element: name }),
                    _ => false,
                };
                writer.write_event(event)?;
                if closes {
                    break;
                }
            }
        }
        let xml = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Encoding(e.to_string()))?;
        Ok(RawElement { name, xml })
    }

    /// Read the character content of a text-bearing element.
    ///
    /// Nested elements are skipped; their text is not included.
    pub fn read_text(&mut self, element: &Element<'a>) -> Result<String> {
        let mut text = String::new();
        if element.empty {
            return Ok(text);
        }
        let mut depth = 0usize;
        loop {
            match self.reader.read_event()? {
                Event::Text(t) if depth == 0 => text.push_str(&t.unescape()?),
                Event::CData(c) if depth == 0 => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(text),
                Event::End(_) => depth -= 1,
                Event::Eof => {
                    return Err(Error::UnexpectedEof {
                        element: element.name(),
                    })
                }
                _ => {}
            }
        }
    }
}
