//! Rendering options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::structure::GroupingOptions;
use crate::style::DEFAULT_CLASS_PREFIX;

/// Title used when the document metadata has none.
pub const DEFAULT_TITLE: &str = "PDF to HTML";

/// Generator tag written into the document head.
pub fn default_generator() -> String {
    format!("pdfhtml {}", env!("CARGO_PKG_VERSION"))
}

/// How elements are placed on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Absolute left/top offsets and rotation transforms
    #[default]
    Positioned,
    /// Document flow; structure and classes only
    Flow,
}

impl LayoutMode {
    /// Parse a mode name (`positioned` or `flow`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "positioned" | "absolute" => Some(LayoutMode::Positioned),
            "flow" => Some(LayoutMode::Flow),
            _ => None,
        }
    }
}

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Placement strategy
    pub layout: LayoutMode,

    /// Page selection
    pub page_selection: PageSelection,

    /// Structural grouping configuration
    pub grouping: GroupingOptions,

    /// Prefix for generated style classes
    pub class_prefix: String,

    /// Prefix for image paths in output (e.g., "images/").
    ///
    /// `None` derives it from the image directory.
    pub image_path_prefix: Option<String>,

    /// Generator/Originator tag
    pub generator: String,

    /// Apply Unicode NFC normalization to text
    pub normalize_unicode: bool,

    /// Collect extraction statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout mode.
    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set grouping options.
    pub fn with_grouping(mut self, grouping: GroupingOptions) -> Self {
        self.grouping = grouping;
        self
    }

    /// Set the style class prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = Some(prefix.into());
        self
    }

    /// Set the generator tag.
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: LayoutMode::Positioned,
            page_selection: PageSelection::All,
            grouping: GroupingOptions::default(),
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            image_path_prefix: None,
            generator: default_generator(),
            normalize_unicode: false,
            collect_stats: false,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_bounds(s, start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Comma-separated list with possible ranges
        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_bounds(part, start, end)?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p = parse_page(part)?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        pages.sort();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange("pages are numbered from 1".into())),
        Ok(p) => Ok(p),
        Err(_) => Err(Error::InvalidPageRange(format!("invalid page number '{}'", s.trim()))),
    }
}

fn parse_bounds(range: &str, start: &str, end: &str) -> Result<(u32, u32)> {
    let start = parse_page(start)?;
    let end = parse_page(end)?;
    if start > end {
        return Err(Error::InvalidPageRange(format!("'{}' ends before it starts", range)));
    }
    Ok((start, end))
}
