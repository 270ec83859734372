//! Benchmarks for pdfhtml conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks group and render synthetic page snapshots.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pdfhtml::assets::MemoryStorage;
use pdfhtml::{
    BBox, Block, ConvertOptions, Converter, FixedLanguage, Line, Page, SourceDocument, Span,
    StyleFlags,
};

/// Creates a synthetic document with headings, paragraphs and lists.
fn create_document(page_count: u32) -> SourceDocument {
    let mut doc = SourceDocument::new();
    for number in 1..=page_count {
        let mut page = Page::letter(number);
        let mut top = 60.0;

        page.add_block(Block::new(vec![Line::new(vec![Span::new(
            format!("Section {}", number),
            BBox::new(72.0, top, 300.0, top + 20.0),
        )
        .with_font("Helvetica-Bold", 18.0)
        .with_flags(StyleFlags::BOLD)])]));
        top += 30.0;

        for paragraph in 0..10 {
            let lines = (0..4)
                .map(|i| {
                    let y = top + i as f32 * 14.0;
                    Line::new(vec![Span::new(
                        format!("Paragraph {} line {} with benchmark body text. ", paragraph, i),
                        BBox::new(72.0, y, 540.0, y + 12.0),
                    )
                    .with_font("Times-Roman", 11.0)])
                })
                .collect();
            page.add_block(Block::new(lines));
            top += 60.0;
        }

        let items = (1..=5)
            .map(|i| {
                let y = top + i as f32 * 14.0;
                Line::new(vec![Span::new(
                    format!("{}. List entry\n", i),
                    BBox::new(90.0, y, 300.0, y + 12.0),
                )])
            })
            .collect();
        page.add_block(Block::new(items));
        doc.add_page(page);
    }
    doc
}

fn bench_convert(c: &mut Criterion) {
    let detector = FixedLanguage::new("en");
    let storage = MemoryStorage::new();
    let mut group = c.benchmark_group("convert");

    for pages in [1u32, 10, 50] {
        let doc = create_document(pages);
        group.bench_with_input(BenchmarkId::from_parameter(pages), &doc, |b, doc| {
            let converter = Converter::new(&detector, ConvertOptions::default()).with_storage(&storage);
            b.iter(|| {
                let mut snapshot = doc.clone();
                black_box(converter.convert(&mut snapshot).map(|r| r.html.len()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
