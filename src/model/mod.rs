//! Page model types delivered by the document provider.
//!
//! A [`SourceDocument`] is a read-only snapshot: pages of blocks, lines and
//! spans, plus each page's link regions and image records. The pipeline
//! owns the snapshot for the duration of one conversion run.

mod document;
mod geometry;
mod image;
mod page;
mod span;

pub use document::{Metadata, SourceDocument};
pub use geometry::{BBox, Direction, Point};
pub use image::{ImageFormat, ImageRecord};
pub use page::{Alignment, Block, LinkRegion, Page};
pub use span::{Line, Rgb, Span, StyleFlags, DEFAULT_FONT_SIZE};
