//! Conversion driver: one pipeline run from provider to HTML.
//!
//! # Example
//!
//! ```no_run
//! use pdfhtml::convert::{ConvertOptions, Converter};
//! use pdfhtml::detect::WhatlangDetector;
//! use pdfhtml::provider::JsonProvider;
//!
//! fn main() -> pdfhtml::Result<()> {
//!     let detector = WhatlangDetector::new();
//!     let converter = Converter::new(&detector, ConvertOptions::default());
//!
//!     let mut provider = JsonProvider::from_path("snapshot.json");
//!     let result = converter.convert_to_file(&mut provider, "out/document.html")?;
//!     for warning in &result.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!     Ok(())
//! }
//! ```

mod batch;
mod output;

pub use batch::{convert_batch, BatchJob};
pub use output::{json_dump_path, write_atomic};

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{src_prefix_for, FsStorage, ImageAnchorManager, Storage, DEFAULT_IMAGE_DIR};
use crate::detect::LanguageDetector;
use crate::error::{Result, Warning};
use crate::model::SourceDocument;
use crate::provider::{DocumentProvider, FlagLayout, JsonProvider};
use crate::render::{to_json, AssembledDocument, Assembler, ExtractionStats, JsonFormat, RenderOptions};

/// Options for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Rendering options
    pub render: RenderOptions,

    /// Directory for persisted images.
    ///
    /// `None` places them in `images/` next to the output file when writing
    /// to a file, and omits them otherwise. Unless the render options carry
    /// an explicit prefix, `src` references point into this directory.
    pub image_dir: Option<PathBuf>,

    /// Persist images at all
    pub extract_images: bool,

    /// Flag bit layout of JSON snapshots.
    ///
    /// Applied when the provider is built through [`ConvertOptions::json_provider`].
    pub flag_layout: FlagLayout,

    /// Write a JSON dump of the assembled document next to the output
    pub dump_json: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Skip image persistence; every image is omitted with a warning.
    pub fn without_images(mut self) -> Self {
        self.extract_images = false;
        self
    }

    /// Set the snapshot flag layout.
    pub fn with_flag_layout(mut self, layout: FlagLayout) -> Self {
        self.flag_layout = layout;
        self
    }

    /// Enable the JSON dump.
    pub fn with_json_dump(mut self, dump: bool) -> Self {
        self.dump_json = dump;
        self
    }

    /// JSON snapshot provider for `path` using the configured flag layout.
    pub fn json_provider(&self, path: impl AsRef<Path>) -> JsonProvider {
        JsonProvider::from_path(path).with_flag_layout(self.flag_layout)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            image_dir: None,
            extract_images: true,
            flag_layout: FlagLayout::default(),
            dump_json: false,
        }
    }
}

/// Result of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The HTML document
    pub html: String,

    /// The assembled document the HTML was rendered from
    pub document: AssembledDocument,

    /// Extraction statistics (if collected)
    pub stats: Option<ExtractionStats>,

    /// Recovered errors, in the order they occurred
    pub warnings: Vec<Warning>,
}

impl ConvertResult {
    /// MIME type of the output.
    pub const MIME_TYPE: &'static str = "text/html";

    /// Detected language code.
    pub fn language(&self) -> &str {
        &self.document.language
    }

    /// Check whether any error was recovered.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.html.len()
    }
}

/// Runs conversions with a shared language detector.
pub struct Converter<'a> {
    detector: &'a dyn LanguageDetector,
    storage: &'a dyn Storage,
    options: ConvertOptions,
}

impl<'a> Converter<'a> {
    /// Create a converter persisting images to the filesystem.
    pub fn new(detector: &'a dyn LanguageDetector, options: ConvertOptions) -> Self {
        Self {
            detector,
            storage: &FsStorage,
            options,
        }
    }

    /// Persist images through another storage backend.
    pub fn with_storage(mut self, storage: &'a dyn Storage) -> Self {
        self.storage = storage;
        self
    }

    /// Conversion options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a document without writing any output file.
    ///
    /// Image references are relative to the working directory.
    pub fn convert(&self, provider: &mut dyn DocumentProvider) -> Result<ConvertResult> {
        let doc = provider.read_document()?;
        self.run(&doc, self.options.image_dir.as_deref(), Path::new(""))
    }

    /// Convert a document and write it to `output`.
    ///
    /// Image references are relative to the output file. A fatal error
    /// leaves neither the HTML file nor the JSON dump behind.
    pub fn convert_to_file(
        &self,
        provider: &mut dyn DocumentProvider,
        output: impl AsRef<Path>,
    ) -> Result<ConvertResult> {
        let output = output.as_ref();
        let doc = provider.read_document()?;

        let base = output.parent().unwrap_or_else(|| Path::new(""));
        let image_dir = self
            .options
            .image_dir
            .clone()
            .unwrap_or_else(|| base.join(DEFAULT_IMAGE_DIR));
        let result = self.run(&doc, Some(&image_dir), base)?;

        write_atomic(output, result.html.as_bytes())?;
        if self.options.dump_json {
            let dump = to_json(&result.document, JsonFormat::Pretty)
                .and_then(|json| write_atomic(&json_dump_path(output), json.as_bytes()));
            if let Err(err) = dump {
                if let Err(remove) = fs::remove_file(output) {
                    log::warn!("Failed to remove {}: {}", output.display(), remove);
                }
                return Err(err);
            }
        }
        log::info!(
            "Wrote {} ({} bytes, {} warnings)",
            output.display(),
            result.content_len(),
            result.warnings.len()
        );

        Ok(result)
    }

    fn run(&self, doc: &SourceDocument, image_dir: Option<&Path>, base: &Path) -> Result<ConvertResult> {
        let render = &self.options.render;
        let mut warnings = Vec::new();

        let text = selected_text(doc, render);
        let (language, err) = self.detector.detect_or_unknown(&text);
        if let Some(err) = err {
            log::warn!("Language detection failed, using '{}': {}", language, err);
            warnings.extend(Warning::from_error(&err, None));
        }

        let mut images = match image_dir {
            Some(dir) if self.options.extract_images => ImageAnchorManager::new(self.storage, dir),
            _ => ImageAnchorManager::disabled(),
        };
        let prefix = render
            .image_path_prefix
            .clone()
            .or_else(|| image_dir.map(|dir| src_prefix_for(dir, base)));
        if let Some(prefix) = prefix {
            images = images.with_src_prefix(prefix);
        }

        let assembler = Assembler::new(render);
        let document = assembler.assemble(doc, language, &mut images, &mut warnings);
        let html = assembler.render(&document);

        let stats = render
            .collect_stats
            .then(|| ExtractionStats::from_document(&document));

        log::debug!(
            "Converted {} pages, {} classes, {} images",
            document.pages.len(),
            document.classes.len(),
            images.allocated()
        );

        Ok(ConvertResult {
            html,
            document,
            stats,
            warnings,
        })
    }
}

/// Plain text of the selected pages, fed to language detection.
fn selected_text(doc: &SourceDocument, options: &RenderOptions) -> String {
    doc.pages
        .iter()
        .filter(|p| options.page_selection.includes(p.number))
        .map(|p| p.plain_text())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryStorage;
    use crate::detect::FixedLanguage;
    use crate::error::{Error, WarningKind};
    use crate::model::{BBox, Block, ImageRecord, Line, Page, Span};
    use crate::render::PageSelection;

    fn sample() -> SourceDocument {
        let mut doc = SourceDocument::new();
        let mut page = Page::letter(1);
        page.add_block(Block::new(vec![Line::new(vec![Span::new(
            "Hello\n",
            BBox::new(72.0, 72.0, 110.0, 84.0),
        )])]));
        page.add_image(ImageRecord::png(vec![0x89, b'P', b'N', b'G'], BBox::new(72.0, 200.0, 172.0, 300.0)));
        doc.add_page(page);
        doc
    }

    struct FailingProvider;

    impl DocumentProvider for FailingProvider {
        fn read_document(&mut self) -> Result<SourceDocument> {
            Err(Error::Provider("truncated".into()))
        }
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_image_dir("assets")
            .with_flag_layout(FlagLayout::MuPdf)
            .with_json_dump(true);

        assert_eq!(options.image_dir, Some(PathBuf::from("assets")));
        assert_eq!(options.flag_layout, FlagLayout::MuPdf);
        assert!(options.dump_json);
        assert!(options.extract_images);
    }

    #[test]
    fn test_convert_with_memory_storage() {
        let detector = FixedLanguage::new("en");
        let storage = MemoryStorage::new();
        let converter = Converter::new(&detector, ConvertOptions::new().with_image_dir("img"))
            .with_storage(&storage);

        let result = converter.convert(&mut sample()).unwrap();
        assert_eq!(result.language(), "en");
        assert!(!result.has_warnings());
        assert!(result.html.contains(r#"src="img/image_0.png""#));
        assert_eq!(storage.paths(), vec![PathBuf::from("img/image_0.png")]);
    }

    #[test]
    fn test_explicit_image_prefix_wins() {
        let detector = FixedLanguage::new("en");
        let storage = MemoryStorage::new();
        let options = ConvertOptions::new()
            .with_image_dir("img")
            .with_render_options(RenderOptions::default().with_image_prefix("https://cdn.example.com/"));
        let converter = Converter::new(&detector, options).with_storage(&storage);

        let result = converter.convert(&mut sample()).unwrap();
        assert!(result.html.contains(r#"src="https://cdn.example.com/image_0.png""#));
    }

    #[test]
    fn test_json_provider_uses_flag_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bold.json");
        fs::write(
            &path,
            r#"{"pages": [{"width": 100, "height": 100, "blocks": [{"lines": [{"spans": [
                {"text": "B", "flags": 16, "bbox": {"left": 0, "top": 0, "right": 10, "bottom": 10}}
            ]}]}]}]}"#,
        )
        .unwrap();

        let options = ConvertOptions::new().with_flag_layout(FlagLayout::MuPdf);
        let doc = options.json_provider(&path).read_document().unwrap();
        let span = &doc.pages[0].blocks[0].lines[0].spans[0];
        assert!(span.flags.contains(crate::model::StyleFlags::BOLD));
    }

    #[test]
    fn test_convert_without_image_dir_warns() {
        let detector = FixedLanguage::new("en");
        let converter = Converter::new(&detector, ConvertOptions::default());

        let result = converter.convert(&mut sample()).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::AssetPersist);
        assert_eq!(result.warnings[0].page, Some(1));
        assert!(!result.html.contains("<img"));
    }

    #[test]
    fn test_detection_failure_is_recovered() {
        let detector = crate::detect::WhatlangDetector::new();
        let converter = Converter::new(&detector, ConvertOptions::new().without_images());

        let result = converter.convert(&mut SourceDocument::new()).unwrap();
        assert_eq!(result.language(), "unknown");
        assert_eq!(result.warnings[0].kind, WarningKind::Detection);
        assert!(result.html.contains(r#"<html lang="unknown">"#));
    }

    #[test]
    fn test_provider_error_is_fatal() {
        let detector = FixedLanguage::new("en");
        let converter = Converter::new(&detector, ConvertOptions::default());
        let err = converter.convert(&mut FailingProvider).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_stats_collected_on_request() {
        let detector = FixedLanguage::new("en");
        let storage = MemoryStorage::new();
        let options = ConvertOptions::new()
            .with_image_dir("img")
            .with_render_options(RenderOptions::default().with_stats(true));
        let converter = Converter::new(&detector, options).with_storage(&storage);

        let stats = converter.convert(&mut sample()).unwrap().stats.unwrap();
        assert_eq!(stats.page_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.image_count, 1);
        assert_eq!(stats.word_count, 1);
    }

    #[test]
    fn test_selected_text_follows_selection() {
        let mut doc = SourceDocument::new();
        for (number, text) in [(1, "one"), (2, "two")] {
            let mut page = Page::letter(number);
            page.add_block(Block::new(vec![Line::new(vec![Span::new(
                text,
                BBox::new(0.0, 0.0, 10.0, 10.0),
            )])]));
            doc.add_page(page);
        }
        let options = RenderOptions::default().with_pages(PageSelection::Pages(vec![2]));
        assert_eq!(selected_text(&doc, &options), "two");
    }
}
