//! Extraction statistics over an assembled document.

use serde::{Deserialize, Serialize};

use super::AssembledDocument;
use crate::structure::{PageItem, StructuralUnit};

/// Statistics collected during content extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Number of paragraphs extracted
    pub paragraph_count: u32,

    /// Number of headings extracted
    pub heading_count: u32,

    /// Number of lists extracted
    pub list_count: u32,

    /// Number of list items extracted
    pub list_item_count: u32,

    /// Number of tables extracted
    pub table_count: u32,

    /// Number of images placed
    pub image_count: u32,

    /// Number of fragments wrapped in a hyperlink
    pub link_count: u32,

    /// Number of distinct style classes
    pub style_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from an assembled document.
    pub fn from_document(doc: &AssembledDocument) -> Self {
        let mut stats = Self {
            page_count: doc.pages.len() as u32,
            style_count: doc.classes.len() as u32,
            ..Self::default()
        };

        for item in doc.pages.iter().flat_map(|p| p.items.iter()) {
            match item {
                PageItem::Unit(unit) => stats.add_unit(unit),
                PageItem::List(list) => {
                    stats.list_count += 1;
                    for unit in &list.items {
                        stats.add_unit(unit);
                    }
                }
                PageItem::Image(_) => stats.image_count += 1,
            }
        }
        stats
    }

    fn add_unit(&mut self, unit: &StructuralUnit) {
        match unit {
            StructuralUnit::Paragraph { .. } => self.paragraph_count += 1,
            StructuralUnit::Heading { .. } => self.heading_count += 1,
            StructuralUnit::ListItem { .. } => self.list_item_count += 1,
            StructuralUnit::Table(_) => self.table_count += 1,
        }
        for fragment in unit.fragments() {
            if fragment.link.is_some() {
                self.link_count += 1;
            }
            self.count_text(&fragment.text);
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        // Word count: whitespace-separated tokens
        self.word_count += text.split_whitespace().count() as u32;

        // Character count: non-whitespace characters
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.list_count += other.list_count;
        self.list_item_count += other.list_item_count;
        self.table_count += other.table_count;
        self.image_count += other.image_count;
        self.link_count += other.link_count;
        self.style_count += other.style_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
