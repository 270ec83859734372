//! Style registry: deduplicates span styles into CSS classes.

mod declaration;
mod registry;

pub use declaration::Declaration;
pub use registry::{StyleClass, StyleKey, StyleRegistry, DEFAULT_CLASS_PREFIX};
