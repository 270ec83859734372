//! Page-level types.

use serde::{Deserialize, Deserializer, Serialize};

use super::{BBox, ImageRecord, Line, Point};

/// A single page snapshot as delivered by the document provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, 0 = assign from position)
    #[serde(default)]
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Page box origin; element coordinates are made relative to it
    #[serde(default)]
    pub origin: Point,

    /// Text blocks in reading order
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Hyperlink annotation regions
    #[serde(default)]
    pub links: Vec<LinkRegion>,

    /// Embedded images
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            origin: Point::default(),
            blocks: Vec::new(),
            links: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Add a text block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a link region.
    pub fn add_link(&mut self, link: LinkRegion) {
        self.links.push(link);
    }

    /// Add an image record.
    pub fn add_image(&mut self, image: ImageRecord) {
        self.images.push(image);
    }

    /// Plain text of the page, one line per provider line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(|l| l.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of spans on the page.
    pub fn span_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(|l| l.spans.len())
            .sum()
    }

    /// Check if the page has no text and no images.
    pub fn is_empty(&self) -> bool {
        self.span_count() == 0 && self.images.is_empty()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// A text block: lines that the provider grouped together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    /// Bounding box of the block
    #[serde(default)]
    pub bbox: BBox,

    /// Alignment hint
    #[serde(default)]
    pub alignment: Alignment,

    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Block {
    /// Create a block from lines, deriving its bounding box.
    pub fn new(lines: Vec<Line>) -> Self {
        let bbox = lines
            .iter()
            .filter_map(|l| l.bbox())
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        Self {
            bbox,
            alignment: Alignment::Left,
            lines,
        }
    }

    /// Set the alignment hint.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Text alignment hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Map a provider alignment code (0 left, 1 center, 2 right, 3 justify).
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Alignment::Center,
            2 => Alignment::Right,
            3 => Alignment::Justify,
            _ => Alignment::Left,
        }
    }

    /// Map an alignment name; unknown names fall back to left.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Alignment::Center,
            "right" => Alignment::Right,
            "justify" | "justified" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }

    /// CSS `text-align` value.
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl<'de> Deserialize<'de> for Alignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Name(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Alignment::from_code(code),
            Repr::Name(name) => Alignment::from_name(&name),
        })
    }
}

/// A hyperlink annotation region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRegion {
    /// Clickable area on the page
    pub bbox: BBox,

    /// Link target
    pub uri: String,
}

impl LinkRegion {
    /// Create a new link region.
    pub fn new(bbox: BBox, uri: impl Into<String>) -> Self {
        Self {
            bbox,
            uri: uri.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    #[test]
    fn test_page_new() {
        let page = Page::new(1, 612.0, 792.0);
        assert_eq!(page.number, 1);
        assert_eq!(page.origin, Point::default());
        assert!(page.is_empty());
    }

    #[test]
    fn test_block_bbox_from_lines() {
        let block = Block::new(vec![
            Line::new(vec![Span::new("a", BBox::new(10.0, 10.0, 20.0, 22.0))]),
            Line::new(vec![Span::new("b", BBox::new(10.0, 24.0, 40.0, 36.0))]),
        ]);
        assert_eq!(block.bbox, BBox::new(10.0, 10.0, 40.0, 36.0));
    }

    #[test]
    fn test_plain_text_and_counts() {
        let mut page = Page::letter(1);
        page.add_block(Block::new(vec![
            Line::new(vec![
                Span::new("Hello ", BBox::default()),
                Span::new("world", BBox::default()),
            ]),
            Line::new(vec![Span::new("again", BBox::default())]),
        ]));
        assert_eq!(page.plain_text(), "Hello world\nagain");
        assert_eq!(page.span_count(), 3);
    }

    #[test]
    fn test_alignment_deserialize() {
        let a: Alignment = serde_json::from_str("1").unwrap();
        assert_eq!(a, Alignment::Center);
        let a: Alignment = serde_json::from_str("\"justify\"").unwrap();
        assert_eq!(a, Alignment::Justify);
        let a: Alignment = serde_json::from_str("9").unwrap();
        assert_eq!(a, Alignment::Left);
    }
}
