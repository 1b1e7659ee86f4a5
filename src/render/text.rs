//! Plain text renderer with list labels.

use crate::error::Result;
use crate::model::{BodyItem, Document, Hyperlink, Node, Paragraph, Sdt, SdtContent, Table};
use crate::numbering::{Numbering, NumberingResolver};
use crate::package::RelationshipResolver;

use super::options::{HyperlinkStyle, RenderOptions};

/// Convert a document to plain text, numbering labels included.
///
/// Each call runs its own numbering session.
pub fn to_text(
    doc: &Document,
    numbering: &Numbering,
    relationships: &dyn RelationshipResolver,
    options: &RenderOptions,
) -> Result<String> {
    TextRenderer::new(numbering, options)
        .with_relationships(relationships)
        .render_document(doc)
}

/// Walks a document in reading order, producing text and resolving list
/// labels as numbered paragraphs go by.
///
/// A renderer owns one numbering session: render a document once per
/// renderer, or call [`TextRenderer::reset`] in between.
pub struct TextRenderer<'a> {
    resolver: NumberingResolver<'a>,
    relationships: Option<&'a dyn RelationshipResolver>,
    options: &'a RenderOptions,
}

impl<'a> TextRenderer<'a> {
    /// Create a renderer over a document's numbering definitions.
    pub fn new(numbering: &'a Numbering, options: &'a RenderOptions) -> Self {
        Self {
            resolver: NumberingResolver::with_options(numbering, options.numbering.clone()),
            relationships: None,
            options,
        }
    }

    /// Resolve hyperlink targets through `relationships`.
    pub fn with_relationships(mut self, relationships: &'a dyn RelationshipResolver) -> Self {
        self.relationships = Some(relationships);
        self
    }

    /// Start a fresh numbering session.
    pub fn reset(&mut self) {
        self.resolver.reset();
    }

    /// Render the whole body; blocks are joined with the configured
    /// separator.
    pub fn render_document(&mut self, doc: &Document) -> Result<String> {
        let mut blocks = Vec::new();
        self.render_blocks(&doc.body.items, &mut blocks)?;
        Ok(blocks.join(&self.options.paragraph_separator))
    }

    /// Render one paragraph: its label (if numbered) followed by the text of
    /// its children, in document order.
    pub fn render_paragraph(&mut self, paragraph: &Paragraph) -> Result<String> {
        let mut out = String::new();
        self.render_nodes(&paragraph.nodes, &mut out)?;
        Ok(out)
    }

    /// Labels of every numbered paragraph, in reading order.
    pub fn labels(&mut self, doc: &Document) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for paragraph in doc.body.all_paragraphs() {
            if let Some(reference) = paragraph.numbering() {
                labels.push(self.resolver.label(reference)?);
            }
        }
        Ok(labels)
    }

    fn render_blocks(&mut self, items: &[BodyItem], out: &mut Vec<String>) -> Result<()> {
        for item in items {
            match item {
                BodyItem::Paragraph(p) => self.push_paragraph(p, out)?,
                BodyItem::Table(t) => out.push(self.render_table(t)?),
                BodyItem::Sdt(s) => self.render_sdt_blocks(s, out)?,
                BodyItem::SectionProperties(_) | BodyItem::Unknown(_) => {}
            }
        }
        Ok(())
    }

    fn push_paragraph(&mut self, paragraph: &Paragraph, out: &mut Vec<String>) -> Result<()> {
        let text = self.render_paragraph(paragraph)?;
        if !text.is_empty() || self.options.include_empty_paragraphs {
            out.push(text);
        }
        Ok(())
    }

    fn render_sdt_blocks(&mut self, sdt: &Sdt, out: &mut Vec<String>) -> Result<()> {
        let mut inline = String::new();
        for item in sdt.children() {
            match item {
                SdtContent::Paragraph(p) => self.push_paragraph(p, out)?,
                SdtContent::Table(t) => out.push(self.render_table(t)?),
                SdtContent::Sdt(inner) => self.render_sdt_blocks(inner, out)?,
                SdtContent::Run(run) => inline.push_str(&run.text()),
                SdtContent::Hyperlink(link) => self.render_hyperlink(link, &mut inline)?,
                SdtContent::Unknown(_) => {}
            }
        }
        if !inline.is_empty() {
            out.push(inline);
        }
        Ok(())
    }

    fn render_table(&mut self, table: &Table) -> Result<String> {
        let mut rows = Vec::new();
        for row in table.rows() {
            let mut cells = Vec::new();
            for cell in row.cells() {
                let mut blocks = Vec::new();
                self.render_blocks(&cell.content, &mut blocks)?;
                blocks.retain(|b| !b.is_empty());
                cells.push(blocks.join(" "));
            }
            rows.push(cells.join("\t"));
        }
        Ok(rows.join("\n"))
    }

    fn render_nodes(&mut self, nodes: &[Node], out: &mut String) -> Result<()> {
        for node in nodes {
            match node {
                Node::ParagraphProperties(props) => {
                    if let Some(reference) = &props.numbering {
                        out.push_str(&self.resolver.label(reference)?);
                    }
                }
                Node::Run(run) => out.push_str(&run.text()),
                Node::Hyperlink(link) => self.render_hyperlink(link, out)?,
                Node::Sdt(sdt) => {
                    for item in sdt.children() {
                        match item {
                            SdtContent::Run(run) => out.push_str(&run.text()),
                            SdtContent::Hyperlink(link) => self.render_hyperlink(link, out)?,
                            SdtContent::Sdt(inner) => out.push_str(&inner.text()),
                            _ => {}
                        }
                    }
                }
                Node::BookmarkStart(mark) => {
                    if let Some(run) = &mark.run {
                        out.push_str(&run.text());
                    }
                }
                Node::BookmarkEnd(_) | Node::RunProperties(_) | Node::Unknown(_) => {}
            }
        }
        Ok(())
    }

    fn render_hyperlink(&mut self, link: &Hyperlink, out: &mut String) -> Result<()> {
        let mut text = String::new();
        self.render_nodes(&link.nodes, &mut text)?;
        if self.options.hyperlinks == HyperlinkStyle::TextOnly {
            out.push_str(&text);
            return Ok(());
        }
        match self.link_target(link) {
            Some(target) => {
                out.push('[');
                out.push_str(&text);
                out.push_str("](");
                out.push_str(&target);
                out.push(')');
            }
            None => out.push_str(&text),
        }
        Ok(())
    }

    fn link_target(&self, link: &Hyperlink) -> Option<String> {
        if let Some(id) = link.relationship_id() {
            let resolved = self.relationships.and_then(|rels| rels.resolve(id));
            return Some(resolved.unwrap_or(id).to_string());
        }
        link.anchor().map(|anchor| format!("#{}", anchor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        NumberingReference, ParagraphProperties, RowContent, Run, TableCell, TableContent, TableRow,
    };
    use crate::numbering::{AbstractNum, Level, Num, NumberingOptions, UnresolvedMode};
    use crate::package::{Relationship, Relationships};
    use crate::xml::{Attributes, DecodeOptions};

    fn numbering() -> Numbering {
        Numbering {
            abstract_nums: vec![AbstractNum::new(0)
                .with_level(Level::new(0, 1, "decimal", "%1."))
                .with_level(Level::new(1, 1, "irohaFullWidth", "%2)"))],
            nums: vec![Num::new(1, 0)],
            ..Default::default()
        }
    }

    fn item(text: &str, ilvl: usize) -> Paragraph {
        Paragraph::new()
            .with_node(Node::ParagraphProperties(
                ParagraphProperties::new().with_numbering(NumberingReference::new(1, ilvl)),
            ))
            .with_node(Node::Run(Run::with_text(text)))
    }

    fn document(paragraphs: Vec<Paragraph>) -> Document {
        let mut doc = Document::new();
        doc.body.items = paragraphs.into_iter().map(BodyItem::Paragraph).collect();
        doc
    }

    #[test]
    fn test_labels_are_spliced_before_text() {
        let numbering = numbering();
        let options = RenderOptions::default();
        let doc = document(vec![
            item("One", 0),
            item("Two", 0),
            item("Sub", 1),
            Paragraph::new().with_node(Node::Run(Run::with_text("Plain"))),
        ]);
        let text = TextRenderer::new(&numbering, &options)
            .render_document(&doc)
            .unwrap();
        assert_eq!(text, "1.One\n2.Two\nイ)Sub\nPlain");
    }

    #[test]
    fn test_empty_paragraphs() {
        let numbering = Numbering::new();
        let doc = document(vec![
            Paragraph::new().with_node(Node::Run(Run::with_text("a"))),
            Paragraph::new(),
            Paragraph::new().with_node(Node::Run(Run::with_text("b"))),
        ]);

        let options = RenderOptions::default();
        let text = to_text(&doc, &numbering, &Relationships::new(), &options).unwrap();
        assert_eq!(text, "a\nb");

        let options = RenderOptions::new().with_empty_paragraphs(true);
        let text = to_text(&doc, &numbering, &Relationships::new(), &options).unwrap();
        assert_eq!(text, "a\n\nb");
    }

    #[test]
    fn test_hyperlink_styles() {
        let xml = r##"<w:document><w:body><w:p>
            <w:hyperlink r:id="rId4"><w:r><w:t>site</w:t></w:r></w:hyperlink>
            <w:r><w:t xml:space="preserve"> and </w:t></w:r>
            <w:hyperlink w:anchor="intro"><w:r><w:t>intro</w:t></w:r></w:hyperlink>
            <w:r><w:t xml:space="preserve"> and </w:t></w:r>
            <w:hyperlink r:id="rId9"><w:r><w:t>raw</w:t></w:r></w:hyperlink>
        </w:p></w:body></w:document>"##;
        let doc = Document::from_xml(xml, DecodeOptions::default()).unwrap();
        let numbering = Numbering::new();
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId4".into(),
            rel_type: "hyperlink".into(),
            target: "https://example.com".into(),
            external: true,
        });

        let options = RenderOptions::default();
        let text = to_text(&doc, &numbering, &rels, &options).unwrap();
        assert_eq!(
            text,
            "[site](https://example.com) and [intro](#intro) and [raw](rId9)"
        );

        let options = RenderOptions::new().with_hyperlinks(HyperlinkStyle::TextOnly);
        let text = to_text(&doc, &numbering, &rels, &options).unwrap();
        assert_eq!(text, "site and intro and raw");
    }

    #[test]
    fn test_table_cells_are_numbered_in_order() {
        let numbering = numbering();
        let options = RenderOptions::default();
        let table = Table {
            content: vec![TableContent::Row(TableRow {
                content: vec![
                    RowContent::Cell(TableCell {
                        content: vec![BodyItem::Paragraph(item("a", 0))],
                        ..Default::default()
                    }),
                    RowContent::Cell(TableCell {
                        content: vec![BodyItem::Paragraph(item("b", 0))],
                        ..Default::default()
                    }),
                ],
                ..Default::default()
            })],
            ..Default::default()
        };
        let mut doc = document(vec![item("before", 0)]);
        doc.body.items.push(BodyItem::Table(table));

        let mut renderer = TextRenderer::new(&numbering, &options);
        assert_eq!(renderer.render_document(&doc).unwrap(), "1.before\n2.a\t3.b");
        renderer.reset();
        assert_eq!(renderer.labels(&doc).unwrap(), ["1.", "2.", "3."]);
    }

    #[test]
    fn test_unresolved_reference_in_strict_mode() {
        let numbering = Numbering::new();
        let options = RenderOptions::new()
            .with_numbering(NumberingOptions::new().with_unresolved(UnresolvedMode::Error));
        let doc = document(vec![item("x", 0)]);
        assert!(TextRenderer::new(&numbering, &options)
            .render_document(&doc)
            .is_err());

        let options = RenderOptions::default();
        let text = TextRenderer::new(&numbering, &options)
            .render_document(&doc)
            .unwrap();
        assert_eq!(text, "＠x");
    }

    #[test]
    fn test_num_id_zero_has_no_label() {
        let numbering = numbering();
        let options = RenderOptions::default();
        let mut props = ParagraphProperties::new();
        props.numbering = Some(NumberingReference::new(0, 0));
        let paragraph = Paragraph {
            attributes: Attributes::new(),
            nodes: vec![
                Node::ParagraphProperties(props),
                Node::Run(Run::with_text("plain")),
            ],
        };
        let mut renderer = TextRenderer::new(&numbering, &options);
        assert_eq!(renderer.render_paragraph(&paragraph).unwrap(), "plain");
    }
}
