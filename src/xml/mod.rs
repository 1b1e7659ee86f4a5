//! Markup plumbing shared by every part decoder and serializer.
//!
//! Decoding is a depth-first walk over a [`XmlStream`]: each element kind
//! reads its attributes from the start tag and hands a per-kind child
//! handler to [`XmlStream::read_children`]. Serialization goes through
//! [`XmlWriter`], which decides at close time whether an element collapses
//! into the `<tag attrs />` shorthand.

mod normalize;
mod order;
mod stream;
mod writer;

pub use normalize::normalize_self_closing;
pub(crate) use order::Interleave;
pub use stream::{DecodeOptions, Element, XmlStream};
pub use writer::{XmlWriter, XML_HEADER};

use crate::error::Result;
use quick_xml::events::BytesStart;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Namespace of WordprocessingML elements, written with the `w:` prefix.
pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// An element kind that knows how to read itself.
///
/// `decode` is called with the element's start tag and a stream positioned
/// just after it, and must leave the stream positioned after the matching
/// end tag.
pub trait Decode: Sized {
    /// Decode one element.
    fn decode<'a>(stream: &mut XmlStream<'a>, start: &Element<'a>) -> Result<Self>;
}

/// An element kind that knows how to write itself back out.
pub trait Encode {
    /// Write this element, start and end tags included.
    fn encode(&self, writer: &mut XmlWriter);
}

/// One attribute as it appeared on a start tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Qualified name, prefix included (e.g. `w:val`, `r:id`).
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

/// Ordered attribute list of an element.
///
/// Order and prefixes are kept exactly as decoded so that writing the
/// element back reproduces the original start tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all attributes of a start tag.
    ///
    /// A syntactically broken attribute (missing quotes, duplicate name)
    /// is a stream error.
    pub fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push(Attribute { name, value });
        }
        Ok(Self(attrs))
    }

    /// Root attributes with `xmlns:w` declared.
    ///
    /// Typed elements are always written as `w:...`, but a part may have
    /// been read with a default namespace or another prefix. The original
    /// declarations are kept alongside so verbatim markup still resolves.
    pub fn declaring_wordml(&self) -> Cow<'_, Attributes> {
        if self.0.iter().any(|a| a.name == "xmlns:w") {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.clone().with("xmlns:w", WORDML_NS))
        }
    }

    /// Look up a value by local name, ignoring the namespace prefix.
    pub fn get(&self, local: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|a| local_part(&a.name) == local)
            .map(|a| a.value.as_str())
    }

    /// Set a value by qualified name, replacing an existing entry in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Attribute { name, value }),
        }
    }

    /// Builder form of [`Attributes::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Append every attribute of `other`, in order.
    pub fn with_all(mut self, other: &Attributes) -> Self {
        for attr in other.iter() {
            self.set(attr.name.as_str(), attr.value.as_str());
        }
        self
    }

    /// Iterate over attributes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Strip the namespace prefix from a qualified name.
pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// An element kept verbatim instead of being decoded into a typed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElement {
    /// Qualified tag name.
    pub name: String,
    /// The complete markup of the subtree, start and end tags included.
    pub xml: String,
}

impl RawElement {
    /// Local part of the tag name.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }
}
