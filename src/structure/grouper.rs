//! Single-pass state machine grouping spans into structural units.
//!
//! Each span is classified in a fixed priority order:
//!
//! 1. blank text (never rendered; ends an open paragraph),
//! 2. heading (size above the threshold and bold),
//! 3. list marker,
//! 4. plain text.
//!
//! The first rule that matches decides the transition.

use super::{Fragment, ListBlock, ListKind, PageItem, StructuralUnit, TableUnit};
use crate::assets::ImageAnchor;
use crate::model::Span;

/// Configuration for heading detection.
#[derive(Debug, Clone)]
pub struct HeadingConfig {
    /// Spans strictly larger than this (and bold) are headings
    pub min_size: f32,

    /// Minimum size for a level 1 heading
    pub h1_min_size: f32,

    /// Minimum size for a level 2 heading
    pub h2_min_size: f32,
}

impl HeadingConfig {
    /// Check whether a span opens or continues a heading.
    pub fn is_heading(&self, span: &Span) -> bool {
        span.effective_size() > self.min_size && span.flags.is_bold()
    }

    /// Heading level for a font size.
    pub fn level_for(&self, size: f32) -> u8 {
        if size >= self.h1_min_size {
            1
        } else if size >= self.h2_min_size {
            2
        } else {
            3
        }
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            min_size: 14.0,
            h1_min_size: 20.0,
            h2_min_size: 16.0,
        }
    }
}

/// Options for structural grouping.
#[derive(Debug, Clone)]
pub struct GroupingOptions {
    /// Heading detection thresholds
    pub heading: HeadingConfig,

    /// Flush paragraph and heading buffers at block boundaries
    pub flush_on_block: bool,

    /// Detect tables from column alignment
    pub detect_tables: bool,

    /// Table detector thresholds
    pub table: super::TableDetectorConfig,
}

impl GroupingOptions {
    /// Create grouping options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heading configuration.
    pub fn with_heading_config(mut self, config: HeadingConfig) -> Self {
        self.heading = config;
        self
    }

    /// Enable or disable flushing at block boundaries.
    pub fn with_block_flush(mut self, flush: bool) -> Self {
        self.flush_on_block = flush;
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Set table detector configuration.
    pub fn with_table_config(mut self, config: super::TableDetectorConfig) -> Self {
        self.table = config;
        self
    }
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            flush_on_block: true,
            detect_tables: true,
            table: super::TableDetectorConfig::default(),
        }
    }
}

/// Current grouping state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// Nothing buffered
    None,
    /// Buffering a paragraph
    InParagraph,
    /// Buffering a heading
    InHeading,
    /// Inside a list of the given kind
    InList(ListKind),
}

struct OpenItem {
    line: usize,
    fragments: Vec<Fragment>,
}

/// Groups one page's span stream into page items.
pub struct Grouper<'o> {
    options: &'o GroupingOptions,
    state: GroupState,
    buffer: Vec<Fragment>,
    heading_level: u8,
    list: Option<ListBlock>,
    item: Option<OpenItem>,
    items: Vec<PageItem>,
}

impl<'o> Grouper<'o> {
    /// Create a grouper for one page.
    pub fn new(options: &'o GroupingOptions) -> Self {
        Self {
            options,
            state: GroupState::None,
            buffer: Vec::new(),
            heading_level: 3,
            list: None,
            item: None,
            items: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Feed one span.
    ///
    /// `line` identifies the provider line the span belongs to, unique
    /// within the page. `render` builds the fragment and is only called when
    /// the span is emitted.
    pub fn push_span<F>(&mut self, span: &Span, line: usize, render: F)
    where
        F: FnOnce() -> Fragment,
    {
        if span.is_blank() {
            if self.state == GroupState::InParagraph {
                self.flush_text();
            }
            return;
        }

        if self.options.heading.is_heading(span) {
            if self.state != GroupState::InHeading {
                self.close_all();
                self.state = GroupState::InHeading;
                self.heading_level = self.options.heading.level_for(span.effective_size());
            }
            self.buffer.push(render());
            return;
        }

        if let Some(kind) = ListKind::detect(&span.text) {
            self.flush_text();
            if self.list.as_ref().is_some_and(|list| list.kind != kind) {
                self.close_list();
            }
            self.close_item();
            self.list.get_or_insert_with(|| ListBlock::new(kind));
            self.item = Some(OpenItem {
                line,
                fragments: vec![render()],
            });
            self.state = GroupState::InList(kind);
            return;
        }

        match self.state {
            GroupState::InList(_) => {
                if let Some(item) = self.item.as_mut().filter(|item| item.line == line) {
                    item.fragments.push(render());
                    return;
                }
                self.close_list();
            }
            GroupState::InHeading => self.flush_text(),
            GroupState::None | GroupState::InParagraph => {}
        }

        self.state = GroupState::InParagraph;
        self.buffer.push(render());
        if span.ends_line() {
            self.flush_text();
        }
    }

    /// Mark the end of a provider block.
    pub fn end_block(&mut self) {
        if self.options.flush_on_block {
            self.flush_text();
        }
    }

    /// Emit a detected table, closing any open structure first.
    pub fn push_table(&mut self, table: TableUnit) {
        self.close_all();
        self.items.push(PageItem::Unit(StructuralUnit::Table(table)));
    }

    /// Emit an image anchor, closing any open structure first.
    pub fn push_image(&mut self, anchor: ImageAnchor) {
        self.close_all();
        self.items.push(PageItem::Image(anchor));
    }

    /// Flush remaining state and return the page items in stream order.
    pub fn finish(mut self) -> Vec<PageItem> {
        self.close_all();
        self.items
    }

    /// Flush the paragraph or heading buffer.
    fn flush_text(&mut self) {
        if self.buffer.is_empty() {
            if matches!(self.state, GroupState::InParagraph | GroupState::InHeading) {
                self.state = GroupState::None;
            }
            return;
        }

        let fragments = std::mem::take(&mut self.buffer);
        let unit = match self.state {
            GroupState::InHeading => {
                log::debug!("Grouper: heading level {} ({} spans)", self.heading_level, fragments.len());
                StructuralUnit::Heading {
                    level: self.heading_level,
                    fragments,
                }
            }
            _ => StructuralUnit::Paragraph { fragments },
        };
        self.items.push(PageItem::Unit(unit));
        if !matches!(self.state, GroupState::InList(_)) {
            self.state = GroupState::None;
        }
    }

    fn close_item(&mut self) {
        if let (Some(item), Some(list)) = (self.item.take(), self.list.as_mut()) {
            list.items.push(StructuralUnit::ListItem {
                kind: list.kind,
                fragments: item.fragments,
            });
        }
    }

    fn close_list(&mut self) {
        self.close_item();
        if let Some(list) = self.list.take() {
            log::debug!("Grouper: closed {:?} list with {} items", list.kind, list.items.len());
            self.items.push(PageItem::List(list));
        }
        if matches!(self.state, GroupState::InList(_)) {
            self.state = GroupState::None;
        }
    }

    fn close_all(&mut self) {
        self.flush_text();
        self.close_list();
    }
}
