//! Embedded image records.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::BBox;

/// An image placed on a page, with its encoded bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Encoded image bytes (base64 string or byte array in JSON)
    #[serde(serialize_with = "serialize_bytes", deserialize_with = "deserialize_bytes")]
    pub data: Vec<u8>,

    /// Encoding reported by the provider
    #[serde(default)]
    pub format: ImageFormat,

    /// Placement on the page
    pub bbox: BBox,

    /// Width in pixels
    #[serde(default)]
    pub width: u32,

    /// Height in pixels
    #[serde(default)]
    pub height: u32,
}

impl ImageRecord {
    /// Create a new image record.
    pub fn new(data: Vec<u8>, format: ImageFormat, bbox: BBox) -> Self {
        Self {
            data,
            format,
            bbox,
            width: 0,
            height: 0,
        }
    }

    /// Create a PNG image record.
    pub fn png(data: Vec<u8>, bbox: BBox) -> Self {
        Self::new(data, ImageFormat::Png, bbox)
    }

    /// Create a JPEG image record.
    pub fn jpeg(data: Vec<u8>, bbox: BBox) -> Self {
        Self::new(data, ImageFormat::Jpeg, bbox)
    }

    /// Set the pixel resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Pixel resolution, falling back to the placement size when unknown.
    pub fn resolution(&self) -> (u32, u32) {
        if self.width > 0 && self.height > 0 {
            (self.width, self.height)
        } else {
            (
                self.bbox.width().round() as u32,
                self.bbox.height().round() as u32,
            )
        }
    }

    /// Format as reported, or sniffed from the bytes when unknown.
    pub fn resolved_format(&self) -> ImageFormat {
        match self.format {
            ImageFormat::Unknown => ImageFormat::sniff(&self.data),
            known => known,
        }
    }

    /// Get the size of the encoded data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Image encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG
    #[serde(alias = "jpg")]
    Jpeg,
    /// GIF
    Gif,
    /// TIFF
    Tiff,
    /// Windows bitmap
    Bmp,
    /// WebP
    Webp,
    /// JPEG 2000
    #[serde(alias = "jp2")]
    Jpx,
    /// Unrecognized encoding
    #[default]
    #[serde(other)]
    Unknown,
}

impl ImageFormat {
    /// File extension for persisted assets.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
            ImageFormat::Jpx => "jp2",
            ImageFormat::Unknown => "bin",
        }
    }

    /// MIME type of the encoding.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Jpx => "image/jp2",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }

    /// Detect the encoding from magic bytes.
    pub fn sniff(data: &[u8]) -> ImageFormat {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return ImageFormat::Jpeg;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return ImageFormat::Png;
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return ImageFormat::Gif;
        }
        // TIFF: II*\0 (little-endian) or MM\0* (big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return ImageFormat::Tiff;
        }
        if data.starts_with(b"BM") {
            return ImageFormat::Bmp;
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return ImageFormat::Webp;
        }
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            return ImageFormat::Jpx;
        }
        ImageFormat::Unknown
    }
}

fn serialize_bytes<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

fn deserialize_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Encoded(String),
        Raw(Vec<u8>),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Encoded(text) => STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom),
        Repr::Raw(bytes) => Ok(bytes),
    }
}
