//! HTML assembly and rendering.

mod assembler;
pub mod html;
mod json;
mod options;
mod result;

pub use assembler::{AssembledDocument, AssembledPage, Assembler, BASE_STYLESHEET};
pub use json::{to_json, JsonFormat};
pub use options::{default_generator, LayoutMode, PageSelection, RenderOptions, DEFAULT_TITLE};
pub use result::ExtractionStats;
