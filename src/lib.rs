//! # pdfhtml
//!
//! Style-preserving HTML reconstruction from parsed PDF page primitives.
//!
//! The library takes a page model (blocks, lines and styled spans, plus
//! link regions and image records) delivered by a document provider and
//! rebuilds a self-contained HTML document: deduplicated CSS classes,
//! paragraphs, headings, lists and tables, absolutely positioned text with
//! rotation, linked spans, and persisted images.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfhtml::convert_file;
//!
//! fn main() -> pdfhtml::Result<()> {
//!     // Convert a JSON page snapshot to HTML
//!     let result = convert_file("snapshot.json", "out/document.html")?;
//!     println!("language: {}", result.language());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Style registry**: one CSS class per distinct span style, in first-seen order
//! - **Structure**: headings, paragraphs, bullet and numbered lists, simple tables
//! - **Layout**: absolute placement with rotation, or document flow
//! - **Links and images**: containment-based link overlay, numbered image assets
//! - **Parallel batches**: independent documents converted on Rayon

pub mod assets;
pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod links;
pub mod model;
pub mod provider;
pub mod render;
pub mod structure;
pub mod style;

// Re-export commonly used types
pub use convert::{convert_batch, BatchJob, ConvertOptions, ConvertResult, Converter};
pub use detect::{FixedLanguage, LanguageDetector, WhatlangDetector, UNKNOWN_LANGUAGE};
pub use error::{Error, Result, Warning, WarningKind};
pub use model::{
    Alignment, BBox, Block, Direction, ImageFormat, ImageRecord, Line, LinkRegion, Metadata,
    Page, Point, Rgb, SourceDocument, Span, StyleFlags,
};
pub use provider::{DocumentProvider, FlagLayout, JsonProvider};
pub use render::{JsonFormat, LayoutMode, PageSelection, RenderOptions};
pub use structure::{GroupingOptions, HeadingConfig, TableDetectorConfig};

use std::path::{Path, PathBuf};

/// Convert a JSON snapshot file to an HTML file.
///
/// Images are written to `images/` next to the output.
///
/// # Example
///
/// ```no_run
/// use pdfhtml::convert_file;
///
/// let result = convert_file("snapshot.json", "document.html").unwrap();
/// for warning in &result.warnings {
///     eprintln!("{}", warning);
/// }
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertResult> {
    convert_file_with_options(input, output, ConvertOptions::default())
}

/// Convert a JSON snapshot file to an HTML file with custom options.
pub fn convert_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    let detector = WhatlangDetector::new();
    let mut provider = options.json_provider(input);
    Converter::new(&detector, options).convert_to_file(&mut provider, output)
}

/// Convert an in-memory document to HTML text.
///
/// No image directory is configured, so images are omitted with warnings.
///
/// # Example
///
/// ```
/// use pdfhtml::{to_html, BBox, Block, Line, Page, SourceDocument, Span};
///
/// let mut doc = SourceDocument::new();
/// let mut page = Page::letter(1);
/// page.add_block(Block::new(vec![Line::new(vec![Span::new(
///     "Hello",
///     BBox::new(72.0, 72.0, 100.0, 84.0),
/// )])]));
/// doc.add_page(page);
///
/// let html = to_html(doc).unwrap();
/// assert!(html.contains("Hello"));
/// ```
pub fn to_html(doc: SourceDocument) -> Result<String> {
    Ok(PdfHtml::new().convert(doc)?.html)
}

/// Convert JSON snapshot bytes to HTML text.
pub fn json_to_html(data: &[u8]) -> Result<String> {
    Ok(PdfHtml::new().convert(JsonProvider::from_bytes(data))?.html)
}

/// Builder for configuring and running conversions.
///
/// # Example
///
/// ```no_run
/// use pdfhtml::{JsonProvider, LayoutMode, PdfHtml};
///
/// let result = PdfHtml::new()
///     .with_layout(LayoutMode::Flow)
///     .with_image_dir("./images")
///     .with_stats()
///     .convert(JsonProvider::from_path("snapshot.json"))?;
/// println!("{:?}", result.stats);
/// # Ok::<(), pdfhtml::Error>(())
/// ```
pub struct PdfHtml {
    options: ConvertOptions,
    detector: Box<dyn LanguageDetector>,
}

impl PdfHtml {
    /// Create a builder with default options and the `whatlang` detector.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            detector: Box::new(WhatlangDetector::new()),
        }
    }

    /// Set the layout mode.
    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.options.render = self.options.render.with_layout(layout);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options.render = self.options.render.with_pages(pages);
        self
    }

    /// Set image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_image_dir(dir);
        self
    }

    /// Set structural grouping options.
    pub fn with_grouping(mut self, grouping: GroupingOptions) -> Self {
        self.options.render = self.options.render.with_grouping(grouping);
        self
    }

    /// Use a fixed language instead of detection.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.detector = Box::new(FixedLanguage::new(code));
        self
    }

    /// Use a custom language detector.
    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Collect extraction statistics.
    pub fn with_stats(mut self) -> Self {
        self.options.render = self.options.render.with_stats(true);
        self
    }

    /// Apply Unicode NFC normalization to text.
    pub fn with_normalization(mut self) -> Self {
        self.options.render = self.options.render.with_normalization(true);
        self
    }

    /// Replace all options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Convert a document without writing files other than images.
    pub fn convert<D: DocumentProvider>(&self, mut provider: D) -> Result<ConvertResult> {
        Converter::new(self.detector.as_ref(), self.options.clone()).convert(&mut provider)
    }

    /// Convert a document and write the HTML to `output`.
    pub fn convert_to_file<D: DocumentProvider>(
        &self,
        mut provider: D,
        output: impl AsRef<Path>,
    ) -> Result<ConvertResult> {
        Converter::new(self.detector.as_ref(), self.options.clone())
            .convert_to_file(&mut provider, output)
    }
}

impl Default for PdfHtml {
    fn default() -> Self {
        Self::new()
    }
}
