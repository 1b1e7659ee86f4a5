//! JSON output of decoded parts.

use crate::error::Result;
use serde::Serialize;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Serialize a decoded tree ([`Document`](crate::Document),
/// [`Numbering`](crate::numbering::Numbering) or any node) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(value)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BodyItem, Document, Node, Paragraph, Run};
    use crate::numbering::{AbstractNum, Level, Numbering};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.body.items.push(BodyItem::Paragraph(
            Paragraph::new().with_node(Node::Run(Run::with_text("Hello"))),
        ));
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"type\": \"Paragraph\""));
        assert!(json.contains("\"text\": \"Hello\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"type\":\"Run\""));
    }

    #[test]
    fn test_document_roundtrip() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_numbering_json() {
        let mut numbering = Numbering::new();
        numbering
            .abstract_nums
            .push(AbstractNum::new(3).with_level(Level::new(0, 1, "upperRoman", "%1.")));
        let json = to_json(&numbering, JsonFormat::Compact).unwrap();
        assert!(json.contains("upperRoman"));
        let parsed: Numbering = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, numbering);
    }
}
