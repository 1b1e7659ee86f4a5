//! Structural markup writer.

use super::{Attributes, RawElement};
use quick_xml::escape::{escape, partial_escape};

/// Declaration written at the top of every serialized part.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

struct OpenElement {
    name: String,
    has_content: bool,
}

/// Writes markup while tracking, for every open element, whether anything
/// was emitted inside it.
///
/// The start tag of an element is left unterminated until its first child
/// or text arrives. An element closed with nothing inside is written as
/// `<tag attrs />`, so empty elements never produce an open/close pair and
/// no textual post-pass is needed.
#[derive(Default)]
pub struct XmlWriter {
    out: String,
    open: Vec<OpenElement>,
}

impl XmlWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the XML declaration.
    pub fn declaration(&mut self) {
        self.out.push_str(XML_HEADER);
    }

    /// Open an element with the given attributes.
    pub fn start(&mut self, name: &str, attrs: &Attributes) {
        self.begin(name);
        for attr in attrs.iter() {
            self.push_attr(&attr.name, &attr.value);
        }
    }

    /// Open an element with a literal attribute list.
    pub fn start_with(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.begin(name);
        for (key, value) in attrs {
            self.push_attr(key, value);
        }
    }

    /// Write escaped character content into the current element.
    pub fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.mark_content();
        self.out.push_str(&partial_escape(text));
    }

    /// Write verbatim markup of a captured subtree.
    pub fn raw(&mut self, element: &RawElement) {
        self.mark_content();
        self.out.push_str(&element.xml);
    }

    /// Close the innermost open element.
    pub fn end(&mut self) {
        let Some(element) = self.open.pop() else {
            return;
        };
        if element.has_content {
            self.out.push_str("</");
            self.out.push_str(&element.name);
            self.out.push('>');
        } else {
            self.out.push_str(" />");
        }
    }

    /// Write an element carrying only attributes.
    pub fn leaf(&mut self, name: &str, attrs: &Attributes) {
        self.start(name, attrs);
        self.end();
    }

    /// Write an element carrying a single `w:val`, if a value is present.
    pub fn val_leaf(&mut self, name: &str, val: Option<&str>) {
        match val {
            Some(val) => self.start_with(name, &[("w:val", val)]),
            None => self.start_with(name, &[]),
        }
        self.end();
    }

    /// Finish writing, closing anything still open.
    pub fn into_string(mut self) -> String {
        while !self.open.is_empty() {
            self.end();
        }
        self.out
    }

    fn begin(&mut self, name: &str) {
        self.mark_content();
        self.out.push('<');
        self.out.push_str(name);
        self.open.push(OpenElement {
            name: name.to_string(),
            has_content: false,
        });
    }

    fn push_attr(&mut self, key: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(key);
        self.out.push_str("=\"");
        self.out.push_str(&escape(value));
        self.out.push('"');
    }

    fn mark_content(&mut self) {
        if let Some(parent) = self.open.last_mut() {
            if !parent.has_content {
                parent.has_content = true;
                self.out.push('>');
            }
        }
    }
}
