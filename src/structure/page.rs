//! Per-page driver feeding the grouper from a page snapshot.

use unicode_normalization::UnicodeNormalization;

use super::{Fragment, GroupingOptions, Grouper, PageItem, TableDetector, TableUnit};
use crate::assets::ImageAnchorManager;
use crate::error::Warning;
use crate::layout::Positioner;
use crate::links::LinkResolver;
use crate::model::{Alignment, Direction, ImageRecord, Page, Span};
use crate::style::{StyleKey, StyleRegistry};

/// Conversion-wide state shared by all pages of one run.
pub struct PageContext<'a, 's> {
    /// Style classes allocated so far
    pub registry: &'a mut StyleRegistry,
    /// Image sequence and storage
    pub images: &'a mut ImageAnchorManager<'s>,
    /// Recovered errors
    pub warnings: &'a mut Vec<Warning>,
    /// Apply Unicode NFC normalization to fragment text
    pub normalize: bool,
}

/// Group one page into its ordered content stream.
///
/// Images are inserted before the first block whose top lies below the
/// image's top; the rest follow the last block.
pub fn group_page(page: &Page, options: &GroupingOptions, ctx: &mut PageContext<'_, '_>) -> Vec<PageItem> {
    let positioner = Positioner::for_page(page);
    let links = LinkResolver::new(&page.links);
    let detector = TableDetector::with_config(options.table.clone());
    let image_slots = slot_images(page);

    let mut grouper = Grouper::new(options);
    let mut line_id = 0usize;

    for (index, block) in page.blocks.iter().enumerate() {
        place_images(&image_slots[index], page, &positioner, &mut grouper, ctx);

        let table = if options.detect_tables {
            detector.detect(block)
        } else {
            None
        };

        if let Some(table) = table {
            let header_rows = table.header_rows();
            let rows = table
                .rows
                .iter()
                .zip(&block.lines)
                .map(|(cells, line)| {
                    cells
                        .iter()
                        .map(|span| {
                            make_fragment(span, line.dir, block.alignment, &positioner, &links, ctx)
                        })
                        .collect()
                })
                .collect();
            grouper.push_table(TableUnit {
                rows,
                header_rows,
                bbox: block.bbox,
                placement: positioner.place_upright(&block.bbox),
            });
            line_id += block.lines.len();
            continue;
        }

        for line in &block.lines {
            for span in &line.spans {
                grouper.push_span(span, line_id, || {
                    make_fragment(span, line.dir, block.alignment, &positioner, &links, ctx)
                });
            }
            line_id += 1;
        }
        grouper.end_block();
    }

    if let Some(rest) = image_slots.last() {
        place_images(rest, page, &positioner, &mut grouper, ctx);
    }

    grouper.finish()
}

/// Bucket images by the index of the block they precede.
fn slot_images(page: &Page) -> Vec<Vec<&ImageRecord>> {
    let mut slots: Vec<Vec<&ImageRecord>> = vec![Vec::new(); page.blocks.len() + 1];
    for image in &page.images {
        let slot = page
            .blocks
            .iter()
            .position(|block| block.bbox.top > image.bbox.top)
            .unwrap_or(page.blocks.len());
        slots[slot].push(image);
    }
    slots
}

fn place_images(
    images: &[&ImageRecord],
    page: &Page,
    positioner: &Positioner,
    grouper: &mut Grouper<'_>,
    ctx: &mut PageContext<'_, '_>,
) {
    for image in images {
        match ctx.images.anchor(image, positioner.place_upright(&image.bbox)) {
            Ok(anchor) => grouper.push_image(anchor),
            Err(err) => match Warning::from_error(&err, Some(page.number)) {
                Some(warning) => {
                    log::warn!("Omitting image on page {}: {}", page.number, err);
                    ctx.warnings.push(warning);
                }
                None => log::warn!("Unexpected image error on page {}: {}", page.number, err),
            },
        }
    }
}

fn make_fragment(
    span: &Span,
    dir: Direction,
    alignment: Alignment,
    positioner: &Positioner,
    links: &LinkResolver<'_>,
    ctx: &mut PageContext<'_, '_>,
) -> Fragment {
    let class_id = ctx
        .registry
        .intern_class(StyleKey::from_span(span, alignment))
        .id
        .clone();

    let raw = span.text.trim_end_matches(['\n', '\r']);
    let text = if ctx.normalize {
        raw.nfc().collect()
    } else {
        raw.to_string()
    };

    Fragment {
        text,
        class_id,
        placement: positioner.place(&span.bbox, dir),
        bbox: span.bbox,
        link: links.resolve(&span.bbox).map(str::to_string),
    }
}
