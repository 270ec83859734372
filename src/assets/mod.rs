//! Image anchor manager: persists image bytes and emits positioned references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::layout::Placement;
use crate::model::{ImageFormat, ImageRecord};

/// Default directory name for persisted images, relative to the output.
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// `src` prefix that reaches `dir` from a document written into `base`.
///
/// A directory outside `base` is referenced by its own path.
pub fn src_prefix_for(dir: &Path, base: &Path) -> String {
    let relative = dir.strip_prefix(base).unwrap_or(dir);
    let mut prefix = relative.to_string_lossy().replace('\\', "/");
    if !prefix.is_empty() && !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

/// A scoped write target for image bytes.
pub trait Storage: Send + Sync {
    /// Write `bytes` to `path`, leaving no partial file on failure.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Filesystem storage writing through a temporary file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory storage keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path.as_ref()).cloned())
    }

    /// Stored paths in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Storage for MemoryStorage {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "storage lock poisoned"))?;
        files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// A persisted image ready to be placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnchor {
    /// Document-wide sequence number
    pub sequence: u32,
    /// Reference used in the markup, e.g. `images/image_0.png`
    pub src: String,
    /// Alternative text
    pub alt: String,
    /// Resolved image format
    pub format: ImageFormat,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Placed width on the page
    pub display_width: f32,
    /// Placed height on the page
    pub display_height: f32,
    /// Page-relative position
    pub placement: Placement,
}

/// Assigns sequence numbers and persists image records.
///
/// Numbers are handed out in first-encountered order and never reused,
/// including for images whose persistence fails.
pub struct ImageAnchorManager<'s> {
    target: Option<(&'s dyn Storage, PathBuf)>,
    src_prefix: String,
    next: u32,
}

impl<'s> ImageAnchorManager<'s> {
    /// Persist images into `dir` through `storage`.
    pub fn new(storage: &'s dyn Storage, dir: impl Into<PathBuf>) -> Self {
        Self {
            target: Some((storage, dir.into())),
            src_prefix: format!("{}/", DEFAULT_IMAGE_DIR),
            next: 0,
        }
    }

    /// A manager with no image directory; every image is omitted.
    pub fn disabled() -> Self {
        Self {
            target: None,
            src_prefix: format!("{}/", DEFAULT_IMAGE_DIR),
            next: 0,
        }
    }

    /// Set the prefix used in `src` references.
    pub fn with_src_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.src_prefix = prefix.into();
        self
    }

    /// Number of sequence numbers handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }

    /// Persist `image` and return its anchor.
    ///
    /// The sequence number advances before the write, so a failed image
    /// still consumes its number.
    pub fn anchor(&mut self, image: &ImageRecord, placement: Placement) -> Result<ImageAnchor> {
        let sequence = self.next;
        self.next += 1;

        let format = image.resolved_format();
        let file_name = format!("image_{}.{}", sequence, format.extension());

        let Some((storage, dir)) = &self.target else {
            return Err(Error::AssetPersist {
                path: PathBuf::from(&file_name),
                source: io::Error::new(io::ErrorKind::NotFound, "no image directory configured"),
            });
        };

        let path = dir.join(&file_name);
        storage
            .write(&path, &image.data)
            .map_err(|source| Error::AssetPersist {
                path: path.clone(),
                source,
            })?;
        log::debug!("Persisted image {} ({} bytes)", path.display(), image.size());

        let (width, height) = image.resolution();
        Ok(ImageAnchor {
            sequence,
            src: format!("{}{}", self.src_prefix, file_name),
            alt: format!("Image {}", sequence),
            format,
            width,
            height,
            display_width: image.bbox.width(),
            display_height: image.bbox.height(),
            placement,
        })
    }
}
