//! End-to-end tests for the grouping and rendering pipeline.

use std::io;
use std::path::Path;
use std::sync::Mutex;

use pdfhtml::assets::{MemoryStorage, Storage};
use pdfhtml::render::AssembledDocument;
use pdfhtml::structure::{ListKind, PageItem, StructuralUnit};
use pdfhtml::{
    BBox, Block, ConvertOptions, ConvertResult, Converter, Direction, FixedLanguage, ImageRecord,
    LayoutMode, Line, LinkRegion, Page, PageSelection, Point, RenderOptions, SourceDocument, Span,
    StyleFlags, WarningKind,
};

fn span(text: &str, left: f32, top: f32) -> Span {
    Span::new(text, BBox::new(left, top, left + 60.0, top + 12.0))
}

fn single_page(blocks: Vec<Block>) -> SourceDocument {
    let mut page = Page::letter(1);
    for block in blocks {
        page.add_block(block);
    }
    let mut doc = SourceDocument::new();
    doc.add_page(page);
    doc
}

fn convert(mut doc: SourceDocument, options: ConvertOptions) -> ConvertResult {
    let detector = FixedLanguage::new("en");
    let storage = MemoryStorage::new();
    Converter::new(&detector, options.with_image_dir("images"))
        .with_storage(&storage)
        .convert(&mut doc)
        .unwrap()
}

fn items(doc: &AssembledDocument) -> &[PageItem] {
    &doc.pages[0].items
}

#[test]
fn test_plain_line_is_one_paragraph() {
    let doc = single_page(vec![Block::new(vec![Line::new(vec![span("Hello\n", 72.0, 72.0)])])]);
    let result = convert(doc, ConvertOptions::default());

    assert_eq!(result.document.classes.len(), 1);
    assert_eq!(result.document.classes[0].id, "style-0");
    match items(&result.document) {
        [PageItem::Unit(StructuralUnit::Paragraph { fragments })] => {
            assert_eq!(fragments.len(), 1);
            assert_eq!(fragments[0].text, "Hello");
            assert_eq!(fragments[0].class_id, "style-0");
        }
        other => panic!("unexpected items: {:?}", other),
    }
}

#[test]
fn test_numbered_lines_form_one_list() {
    let doc = single_page(vec![Block::new(vec![
        Line::new(vec![span("1. First item", 72.0, 72.0)]),
        Line::new(vec![span("2. Second item", 72.0, 90.0)]),
    ])]);
    let result = convert(doc, ConvertOptions::default());

    match items(&result.document) {
        [PageItem::List(list)] => {
            assert_eq!(list.kind, ListKind::Numeric);
            assert_eq!(list.items.len(), 2);
            assert!(list
                .items
                .iter()
                .all(|item| matches!(item, StructuralUnit::ListItem { .. })));
        }
        other => panic!("unexpected items: {:?}", other),
    }
    assert!(result.html.contains(r#"<ol class="list list-numeric" type="1">"#));
}

#[test]
fn test_bold_large_span_becomes_heading() {
    let title = span("Title", 72.0, 72.0)
        .with_font("Helvetica-Bold", 16.0)
        .with_flags(StyleFlags::BOLD);
    let body = span("Body text", 72.0, 100.0);
    let doc = single_page(vec![
        Block::new(vec![Line::new(vec![title])]),
        Block::new(vec![Line::new(vec![body])]),
    ]);
    let result = convert(doc, ConvertOptions::default());

    match items(&result.document) {
        [PageItem::Unit(StructuralUnit::Heading { level, .. }), PageItem::Unit(StructuralUnit::Paragraph { .. })] => {
            assert_eq!(*level, 2);
        }
        other => panic!("unexpected items: {:?}", other),
    }
    assert_eq!(result.document.classes.len(), 2);
    assert!(result.html.contains("<h2>"));
}

#[test]
fn test_links_require_full_containment() {
    let inside = span("inside", 72.0, 72.0);
    let partial = span("partial", 72.0, 200.0);
    let mut doc = single_page(vec![
        Block::new(vec![Line::new(vec![inside.clone()])]),
        Block::new(vec![Line::new(vec![partial])]),
    ]);
    doc.pages[0].add_link(LinkRegion::new(inside.bbox, "https://example.com/a"));
    doc.pages[0].add_link(LinkRegion::new(
        BBox::new(100.0, 195.0, 300.0, 215.0),
        "https://example.com/b",
    ));

    let result = convert(doc, ConvertOptions::default());
    assert!(result.html.contains(r#"<a href="https://example.com/a"><span"#));
    assert!(!result.html.contains("https://example.com/b"));
}

struct FailFirst {
    failed: Mutex<bool>,
    inner: MemoryStorage,
}

impl Storage for FailFirst {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut failed = self.failed.lock().unwrap();
        if !*failed {
            *failed = true;
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.inner.write(path, bytes)
    }
}

#[test]
fn test_failed_image_keeps_its_number() {
    let mut doc = single_page(vec![]);
    doc.pages[0].add_image(ImageRecord::png(vec![1], BBox::new(0.0, 0.0, 10.0, 10.0)));
    doc.pages[0].add_image(ImageRecord::jpeg(vec![2], BBox::new(0.0, 20.0, 10.0, 30.0)));

    let storage = FailFirst {
        failed: Mutex::new(false),
        inner: MemoryStorage::new(),
    };
    let detector = FixedLanguage::new("en");
    let result = Converter::new(&detector, ConvertOptions::new().with_image_dir("img"))
        .with_storage(&storage)
        .convert(&mut doc)
        .unwrap();

    let anchors: Vec<_> = result.document.images().collect();
    assert_eq!(anchors.len(), 1);
    assert_eq!(anchors[0].sequence, 1);
    assert_eq!(anchors[0].src, "img/image_1.jpg");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::AssetPersist);
    assert_eq!(storage.inner.paths().len(), 1);
    assert!(!result.html.contains("image_0"));
}

#[test]
fn test_image_numbers_increase_across_pages() {
    let mut doc = SourceDocument::new();
    for number in 1..=2 {
        let mut page = Page::letter(number);
        page.add_image(ImageRecord::png(vec![0], BBox::new(0.0, 0.0, 5.0, 5.0)));
        page.add_image(ImageRecord::png(vec![0], BBox::new(0.0, 10.0, 5.0, 15.0)));
        doc.add_page(page);
    }
    let result = convert(doc, ConvertOptions::default());
    let sequences: Vec<u32> = result.document.images().map(|a| a.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
}

#[test]
fn test_image_placed_between_blocks() {
    let mut doc = single_page(vec![
        Block::new(vec![Line::new(vec![span("Above\n", 72.0, 50.0)])]),
        Block::new(vec![Line::new(vec![span("Below\n", 72.0, 300.0)])]),
    ]);
    doc.pages[0].add_image(ImageRecord::png(vec![0], BBox::new(72.0, 100.0, 172.0, 200.0)));

    let result = convert(doc, ConvertOptions::default());
    let kinds: Vec<&str> = items(&result.document)
        .iter()
        .map(|item| match item {
            PageItem::Unit(_) => "unit",
            PageItem::List(_) => "list",
            PageItem::Image(_) => "image",
        })
        .collect();
    assert_eq!(kinds, vec!["unit", "image", "unit"]);
    assert!(result.html.contains(
        r#"<img class="image" src="images/image_0.png" alt="Image 0" width="100" height="100" style="left: 72px; top: 100px; width: 100px; height: 100px;">"#
    ));
}

#[test]
fn test_vertical_text_rotates() {
    let line = Line::new(vec![span("Down", 20.0, 20.0)]).with_direction(Direction::new(0.0, 1.0));
    let doc = single_page(vec![Block::new(vec![line])]);
    let result = convert(doc, ConvertOptions::default());

    let fragment = &result.document.pages[0].items[0];
    match fragment {
        PageItem::Unit(unit) => assert_eq!(unit.fragments()[0].placement.rotation, -90.0),
        other => panic!("unexpected item: {:?}", other),
    }
    assert!(result.html.contains("transform: rotate(90deg)"));
}

#[test]
fn test_identical_styles_share_a_class() {
    let doc = single_page(vec![Block::new(vec![
        Line::new(vec![span("One\n", 72.0, 72.0)]),
        Line::new(vec![span("Two\n", 72.0, 90.0)]),
        Line::new(vec![span("Red\n", 72.0, 108.0).with_color(0xFF0000)]),
    ])]);
    let result = convert(doc, ConvertOptions::default());

    let ids: Vec<&str> = result.document.classes.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["style-0", "style-1"]);
    assert_eq!(result.html.matches(".style-0 {").count(), 1);
    assert!(result.html.contains("color: #ff0000;"));
}

#[test]
fn test_table_block_renders_grid() {
    let row = |top: f32, a: &str, b: &str| {
        Line::new(vec![
            Span::new(a, BBox::new(72.0, top, 120.0, top + 12.0)),
            Span::new(b, BBox::new(200.0, top, 260.0, top + 12.0)),
        ])
    };
    let doc = single_page(vec![Block::new(vec![
        row(72.0, "Name", "Qty"),
        row(90.0, "Apples", "3"),
        row(108.0, "Pears", "5"),
    ])]);
    let result = convert(doc, ConvertOptions::default());

    match items(&result.document) {
        [PageItem::Unit(StructuralUnit::Table(table))] => {
            assert_eq!(table.row_count(), 3);
            assert_eq!(table.column_count(), 2);
        }
        other => panic!("unexpected items: {:?}", other),
    }
    assert!(result.html.contains(r#"<table class="grid""#));
    assert!(result.html.contains("<td>"));
}

#[test]
fn test_table_shares_page_origin_with_text() {
    let row = |top: f32, a: &str, b: &str| {
        Line::new(vec![
            Span::new(a, BBox::new(72.0, top, 120.0, top + 12.0)),
            Span::new(b, BBox::new(200.0, top, 260.0, top + 12.0)),
        ])
    };
    let mut doc = single_page(vec![
        Block::new(vec![row(100.0, "Name", "Qty"), row(118.0, "Apples", "3")]),
        Block::new(vec![Line::new(vec![span("After the table\n", 72.0, 300.0)])]),
    ]);
    doc.pages[0].origin = Point::new(50.0, 50.0);
    let result = convert(doc, ConvertOptions::default());

    assert!(result
        .html
        .contains(r#"<table class="grid" style="left: 22px; top: 50px;">"#));
    assert!(result.html.contains(r#"style="left: 22px; top: 250px;">After the table</span>"#));
}

#[test]
fn test_flow_layout_drops_offsets() {
    let doc = single_page(vec![Block::new(vec![Line::new(vec![span("Hello\n", 72.0, 72.0)])])]);
    let options = ConvertOptions::new()
        .with_render_options(RenderOptions::default().with_layout(LayoutMode::Flow));
    let result = convert(doc, options);

    assert!(result.html.contains(r#"class="page flow""#));
    assert!(!result.html.contains("left: 72px"));
    assert!(result.html.contains(r#"<span class="style-0">Hello</span>"#));
}

#[test]
fn test_page_selection_restricts_output() {
    let mut doc = SourceDocument::new();
    for number in 1..=3 {
        let mut page = Page::letter(number);
        page.add_block(Block::new(vec![Line::new(vec![span(
            &format!("Page {}\n", number),
            72.0,
            72.0,
        )])]));
        doc.add_page(page);
    }
    let options = ConvertOptions::new().with_render_options(
        RenderOptions::default().with_pages(PageSelection::parse("1,3").unwrap()),
    );
    let result = convert(doc, options);

    let numbers: Vec<u32> = result.document.pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert!(!result.html.contains("Page 2"));
}

#[test]
fn test_markup_is_escaped() {
    let doc = single_page(vec![Block::new(vec![Line::new(vec![span(
        "<script>alert('x')</script>",
        72.0,
        72.0,
    )])])]);
    let result = convert(doc, ConvertOptions::default());
    assert!(!result.html.contains("<script>"));
    assert!(result.html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
}

#[test]
fn test_conversion_is_deterministic() {
    let build = || {
        single_page(vec![Block::new(vec![
            Line::new(vec![span("• bullet", 72.0, 72.0)]),
            Line::new(vec![span("plain\n", 72.0, 90.0)]),
        ])])
    };
    let first = convert(build(), ConvertOptions::default());
    let second = convert(build(), ConvertOptions::default());
    assert_eq!(first.html, second.html);
    assert_eq!(first.document, second.document);
}

#[test]
fn test_empty_document_renders_empty_body() {
    let result = convert(SourceDocument::new(), ConvertOptions::default());
    assert!(result.document.pages.is_empty());
    assert!(result.html.contains("<body></body>"));
}
