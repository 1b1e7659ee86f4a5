//! Empty-element normalization for already serialized markup.
//!
//! Parts written by [`XmlWriter`](super::XmlWriter) are emitted in the
//! shorthand form already. This pass exists for markup produced elsewhere
//! (for example parts copied from a template) that must follow the same
//! `<tag attrs />` convention.

use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Collapse every `<tag attrs></tag>` pair with nothing between the two
/// tags into `<tag attrs />`.
///
/// The input is tokenized, so a start tag is only collapsed when the very
/// next token is its own end tag. Text content, including text that looks
/// like markup once unescaped, is copied through untouched.
pub fn normalize_self_closing(input: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(input.len()));
    let mut buf = Vec::new();
    let mut pending: Option<BytesStart<'static>> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::End(end) => match pending.take() {
                Some(start) => {
                    let out = writer.get_mut();
                    out.push(b'<');
                    out.extend_from_slice(&start);
                    out.extend_from_slice(b" />");
                }
                None => writer.write_event(Event::End(end))?,
            },
            Event::Eof => {
                if let Some(start) = pending.take() {
                    writer.write_event(Event::Start(start))?;
                }
                break;
            }
            other => {
                if let Some(start) = pending.take() {
                    writer.write_event(Event::Start(start))?;
                }
                match other {
                    Event::Start(start) => pending = Some(start.into_owned()),
                    other => writer.write_event(other)?,
                }
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}
