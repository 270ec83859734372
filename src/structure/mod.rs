//! Structural grouping of span streams into paragraphs, headings, lists
//! and tables.

mod grouper;
mod list;
mod page;
mod table;
mod unit;

pub use grouper::{GroupState, Grouper, GroupingOptions, HeadingConfig};
pub use list::ListKind;
pub use page::{group_page, PageContext};
pub use table::{DetectedTable, TableDetector, TableDetectorConfig};
pub use unit::{Fragment, ListBlock, PageItem, StructuralUnit, TableUnit};
