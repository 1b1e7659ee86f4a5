//! Benchmarks for redocx decoding and text rendering.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic numbered lists of increasing length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use redocx::{Docx, RenderOptions};
use std::io::Cursor;

/// Creates a synthetic DOCX with the given number of list paragraphs.
fn create_test_docx(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("word/numbering.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2)"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#,
    )
    .unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>"#,
    );

    for i in 0..paragraph_count {
        content.push_str(&format!(
            r#"
    <w:p>
      <w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="1"/></w:numPr></w:pPr>
      <w:r><w:rPr><w:b/></w:rPr><w:t>Item {} with some test content for benchmarking purposes.</w:t></w:r>
    </w:p>"#,
            i % 2,
            i
        ));
    }

    content.push_str(
        r#"
  </w:body>
</w:document>"#,
    );

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark package decoding at various sizes.
fn bench_docx_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("docx_decoding");

    for para_count in [10, 100, 500, 1000].iter() {
        let data = create_test_docx(*para_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = Docx::from_bytes(black_box(data.clone()));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark text rendering with list labels.
fn bench_text_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_rendering");

    for para_count in [10, 100, 500, 1000].iter() {
        let docx = Docx::from_bytes(create_test_docx(*para_count)).unwrap();
        let options = RenderOptions::default();

        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &docx,
            |b, docx| {
                b.iter(|| {
                    let _ = black_box(docx).plain_text(&options);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark re-serialization of the document part.
fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    for para_count in [10, 100, 500].iter() {
        let docx = Docx::from_bytes(create_test_docx(*para_count)).unwrap();

        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &docx,
            |b, docx| {
                b.iter(|| {
                    let _ = black_box(docx).document().to_xml();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_docx_decoding,
    bench_text_rendering,
    bench_serialization,
);
criterion_main!(benches);
