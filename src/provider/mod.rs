//! Document model providers.
//!
//! The pipeline never parses a binary document format itself. It consumes a
//! [`SourceDocument`] through the [`DocumentProvider`] trait. Two providers
//! ship with the crate: an in-memory document, and [`JsonProvider`], which
//! reads a JSON snapshot written by an external extraction tool.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Block, SourceDocument, StyleFlags};

/// Source of a document snapshot for one conversion run.
pub trait DocumentProvider {
    /// Deliver the document. Errors here abort the run.
    fn read_document(&mut self) -> Result<SourceDocument>;
}

/// An in-memory snapshot hands itself over once; later reads are empty.
impl DocumentProvider for SourceDocument {
    fn read_document(&mut self) -> Result<SourceDocument> {
        let mut doc = std::mem::take(self);
        doc.number_pages()?;
        Ok(doc)
    }
}

/// Bit layout of the style flags in a provider snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagLayout {
    /// Flags already use the crate's bit table
    #[default]
    Canonical,
    /// MuPDF span flags: bit 0 superscript, bit 1 italic, bit 2 serif,
    /// bit 3 monospaced, bit 4 bold
    MuPdf,
}

impl FlagLayout {
    /// Translate raw provider bits into canonical flags.
    pub fn map(&self, raw: u32) -> StyleFlags {
        match self {
            FlagLayout::Canonical => StyleFlags::from_raw(raw),
            FlagLayout::MuPdf => {
                const TABLE: [(u32, StyleFlags); 5] = [
                    (1 << 0, StyleFlags::SUPERSCRIPT),
                    (1 << 1, StyleFlags::ITALIC),
                    (1 << 2, StyleFlags::SERIF),
                    (1 << 3, StyleFlags::MONOSPACED),
                    (1 << 4, StyleFlags::BOLD),
                ];
                TABLE
                    .iter()
                    .filter(|(bit, _)| raw & bit != 0)
                    .fold(StyleFlags::empty(), |acc, (_, flag)| acc | *flag)
            }
        }
    }

    /// Parse a layout name (`canonical` or `mupdf`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "canonical" => Some(FlagLayout::Canonical),
            "mupdf" | "fitz" => Some(FlagLayout::MuPdf),
            _ => None,
        }
    }
}

enum JsonSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Reads a [`SourceDocument`] from a JSON snapshot.
pub struct JsonProvider {
    source: JsonSource,
    flags: FlagLayout,
}

impl JsonProvider {
    /// Read the snapshot from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: JsonSource::Path(path.as_ref().to_path_buf()),
            flags: FlagLayout::default(),
        }
    }

    /// Read the snapshot from bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            source: JsonSource::Bytes(data.into()),
            flags: FlagLayout::default(),
        }
    }

    /// Read the snapshot from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    /// Set the flag bit layout used by the snapshot.
    pub fn with_flag_layout(mut self, flags: FlagLayout) -> Self {
        self.flags = flags;
        self
    }

    fn load(&self) -> Result<Vec<u8>> {
        match &self.source {
            JsonSource::Path(path) => fs::read(path).map_err(|e| {
                Error::Provider(format!("cannot read snapshot {}: {}", path.display(), e))
            }),
            JsonSource::Bytes(data) => Ok(data.clone()),
        }
    }
}

impl DocumentProvider for JsonProvider {
    fn read_document(&mut self) -> Result<SourceDocument> {
        let data = self.load()?;
        let mut doc: SourceDocument = serde_json::from_slice(&data)
            .map_err(|e| Error::Provider(format!("invalid JSON snapshot: {}", e)))?;

        validate(&doc)?;

        if self.flags != FlagLayout::Canonical {
            for span in doc
                .pages
                .iter_mut()
                .flat_map(|p| p.blocks.iter_mut())
                .flat_map(|b| b.lines.iter_mut())
                .flat_map(|l| l.spans.iter_mut())
            {
                span.flags = self.flags.map(span.flags.bits());
            }
        }

        for block in doc.pages.iter_mut().flat_map(|p| p.blocks.iter_mut()) {
            fill_block_bbox(block);
        }
        doc.number_pages()?;

        log::debug!(
            "JsonProvider: loaded {} pages ({:?} flags)",
            doc.page_count(),
            self.flags
        );
        Ok(doc)
    }
}

fn validate(doc: &SourceDocument) -> Result<()> {
    for (index, page) in doc.pages.iter().enumerate() {
        let size_ok = page.width.is_finite()
            && page.height.is_finite()
            && page.width >= 0.0
            && page.height >= 0.0;
        if !size_ok {
            return Err(Error::Provider(format!(
                "page {} has invalid dimensions {}x{}",
                index + 1,
                page.width,
                page.height
            )));
        }
    }
    Ok(())
}

/// Blocks delivered without a box get the union of their lines.
fn fill_block_bbox(block: &mut Block) {
    if block.bbox.width() > 0.0 || block.bbox.height() > 0.0 {
        return;
    }
    if let Some(bbox) = block
        .lines
        .iter()
        .filter_map(|l| l.bbox())
        .reduce(|acc, b| acc.union(&b))
    {
        block.bbox = bbox;
    }
}
