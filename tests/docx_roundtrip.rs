//! Decoding, rewriting and reopening complete packages.

mod common;

use common::{abstract_num, level, list_item, num, paragraph, DocxBuilder};
use redocx::render::{to_json, JsonFormat};
use redocx::{BodyItem, DecodeOptions, Docx, Node, Package, RenderOptions};

const MIXED_PARAGRAPH: &str = r#"<w:p w:rsidR="00A1">
<w:pPr><w:pStyle w:val="Body"/><w:jc w:val="both"/></w:pPr>
<w:bookmarkStart w:id="0" w:name="top"/>
<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Read </w:t></w:r>
<w:hyperlink r:id="rId5"><w:r><w:t>the docs</w:t></w:r></w:hyperlink>
<w:bookmarkEnd w:id="0"/>
<w14:shinyExt xmlns:w14="http://example.com/ext"><w:r><w:t>hidden</w:t></w:r></w14:shinyExt>
<w:proofErr w:type="spellStart"/>
<w:r><w:t xml:space="preserve"> now.</w:t></w:r>
</w:p>"#;

const LINK_RELS: &str = r#"<Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/docs" TargetMode="External"/>"#;

fn mixed_package() -> Vec<u8> {
    DocxBuilder::new(MIXED_PARAGRAPH)
        .relationships(LINK_RELS)
        .part("word/styles.xml", "<w:styles><w:style w:styleId=\"Body\"></w:style></w:styles>")
        .part("docProps/core.xml", "<cp:coreProperties/>")
        .build()
}

fn node_kinds(docx: &Docx) -> Vec<&'static str> {
    let BodyItem::Paragraph(p) = &docx.document().body.items[0] else {
        panic!("expected a paragraph");
    };
    p.nodes
        .iter()
        .map(|node| match node {
            Node::Run(_) => "r",
            Node::Hyperlink(_) => "hyperlink",
            Node::BookmarkStart(_) => "bookmarkStart",
            Node::BookmarkEnd(_) => "bookmarkEnd",
            Node::Sdt(_) => "sdt",
            Node::ParagraphProperties(_) => "pPr",
            Node::RunProperties(_) => "rPr",
            Node::Unknown(_) => "unknown",
        })
        .collect()
}

#[test]
fn test_node_order_follows_markup() {
    let docx = Docx::from_bytes(mixed_package()).unwrap();
    assert_eq!(
        node_kinds(&docx),
        ["pPr", "bookmarkStart", "r", "hyperlink", "bookmarkEnd", "unknown", "r"]
    );
}

#[test]
fn test_unknown_extension_is_preserved_on_request() {
    let docx =
        Docx::from_bytes_with(mixed_package(), DecodeOptions::new().with_preserve_unknown(true))
            .unwrap();
    assert_eq!(
        node_kinds(&docx),
        ["pPr", "bookmarkStart", "r", "hyperlink", "bookmarkEnd", "unknown", "unknown", "r"]
    );

    let rewritten = Package::from_bytes(docx.to_bytes().unwrap()).unwrap();
    let xml = rewritten.read_xml("word/document.xml").unwrap();
    assert!(xml.contains("shinyExt"));
}

#[test]
fn test_plain_text_with_links() {
    let docx = Docx::from_bytes(mixed_package()).unwrap();
    let text = docx.plain_text(&RenderOptions::default()).unwrap();
    assert_eq!(text, "Read [the docs](https://example.com/docs) now.");
    assert_eq!(docx.document().text(), "Read the docs now.");
}

#[test]
fn test_save_and_reopen() {
    let docx = Docx::from_bytes(mixed_package()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.docx");
    docx.save(&path).unwrap();

    let reopened = Docx::open(&path).unwrap();
    assert_eq!(reopened.document(), docx.document());
    assert_eq!(
        reopened.plain_text(&RenderOptions::default()).unwrap(),
        "Read [the docs](https://example.com/docs) now."
    );

    let original = Package::from_bytes(mixed_package()).unwrap();
    let copy = reopened.package();
    assert_eq!(copy.list_files(), original.list_files());
    for part in ["word/styles.xml", "docProps/core.xml", "word/_rels/document.xml.rels"] {
        assert_eq!(
            copy.read_binary(part).unwrap(),
            original.read_binary(part).unwrap(),
            "{} changed",
            part
        );
    }
}

#[test]
fn test_rewritten_markup_uses_self_closing_tags() {
    let body = format!(
        "{}<w:p><w:pPr></w:pPr><w:r><w:t>&lt;/r&gt; stays text</w:t></w:r></w:p>",
        paragraph("first")
    );
    let docx = Docx::from_bytes(DocxBuilder::new(&body).build()).unwrap();
    let rewritten = Package::from_bytes(docx.to_bytes().unwrap()).unwrap();
    let xml = rewritten.read_xml("word/document.xml").unwrap();

    assert!(xml.contains("<w:p><w:pPr /><w:r><w:t>&lt;/r&gt; stays text</w:t></w:r></w:p>"));
    assert!(!xml.contains("></w:pPr>"));

    let reopened = Docx::from_bytes(docx.to_bytes().unwrap()).unwrap();
    assert_eq!(reopened.document().text(), "first\n</r> stays text");
}

#[test]
fn test_tables_and_content_controls() {
    let numbering = [
        abstract_num(0, &[level(0, 1, "upperLetter", "%1)")]),
        num(1, 0),
    ]
    .concat();
    let body = format!(
        r#"{}<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid><w:gridCol w:w="100"/></w:tblGrid><w:tr><w:tc><w:tcPr><w:tcW w:w="100"/></w:tcPr>{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl><w:sdt><w:sdtPr><w:alias w:val="Box"/><w:id w:val="7"/></w:sdtPr><w:sdtContent>{}</w:sdtContent></w:sdt>"#,
        list_item(1, 0, "intro"),
        list_item(1, 0, "in cell"),
        paragraph("plain cell"),
        list_item(1, 0, "in control"),
    );
    let docx = Docx::from_bytes(DocxBuilder::new(&body).numbering(&numbering).build()).unwrap();

    assert_eq!(docx.numbering_labels().unwrap(), ["A)", "B)", "C)"]);
    assert_eq!(
        docx.plain_text(&RenderOptions::default()).unwrap(),
        "A)intro\nB)in cell\tplain cell\nC)in control"
    );

    let BodyItem::Sdt(sdt) = &docx.document().body.items[2] else {
        panic!("expected a content control");
    };
    let props = sdt.properties.as_ref().unwrap();
    assert_eq!(props.alias.as_deref(), Some("Box"));
    assert_eq!(props.id.as_deref(), Some("7"));

    let reopened = Docx::from_bytes(docx.to_bytes().unwrap()).unwrap();
    assert_eq!(reopened.document(), docx.document());
}

#[test]
fn test_json_output() {
    let docx = Docx::from_bytes(mixed_package()).unwrap();
    let json = to_json(docx.document(), JsonFormat::Compact).unwrap();
    assert!(json.contains(r#""type":"Hyperlink""#));
    assert!(json.contains(r#""text":"the docs""#));
    assert!(!json.contains("hidden"));

    let parsed: redocx::Document = serde_json::from_str(&json).unwrap();
    assert_eq!(&parsed, docx.document());
}

#[test]
fn test_truncated_document_is_a_hard_error() {
    let data = DocxBuilder::with_document_xml("<w:document><w:body><w:p><w:r><w:t>cut").build();
    assert!(Docx::from_bytes(data).is_err());
}
