//! Structural units produced by the grouper.

use serde::{Deserialize, Serialize};

use super::ListKind;
use crate::assets::ImageAnchor;
use crate::layout::Placement;
use crate::model::BBox;

/// A rendered span: text, class, placement and optional link target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Span text (trailing line breaks removed)
    pub text: String,
    /// Style class identifier
    pub class_id: String,
    /// Page-relative placement
    pub placement: Placement,
    /// Source bounding box
    pub bbox: BBox,
    /// Hyperlink target when the span lies inside a link region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Tagged content unit owning its fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralUnit {
    /// Body text
    Paragraph {
        /// Fragments in stream order
        fragments: Vec<Fragment>,
    },
    /// Section heading
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Fragments in stream order
        fragments: Vec<Fragment>,
    },
    /// One item of a list
    ListItem {
        /// Marker kind of the owning list
        kind: ListKind,
        /// Fragments in stream order, marker included
        fragments: Vec<Fragment>,
    },
    /// Grid of cells detected from column alignment
    Table(TableUnit),
}

impl StructuralUnit {
    /// All fragments in stream order.
    pub fn fragments(&self) -> Vec<&Fragment> {
        match self {
            StructuralUnit::Paragraph { fragments }
            | StructuralUnit::Heading { fragments, .. }
            | StructuralUnit::ListItem { fragments, .. } => fragments.iter().collect(),
            StructuralUnit::Table(table) => table.rows.iter().flatten().collect(),
        }
    }

    /// Plain text of the unit, fragments separated by spaces.
    pub fn plain_text(&self) -> String {
        self.fragments()
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Table content: rows of cells, header rows first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableUnit {
    /// Cells per row
    pub rows: Vec<Vec<Fragment>>,
    /// Number of leading header rows
    pub header_rows: usize,
    /// Bounding box of the source block
    pub bbox: BBox,
    /// Page-relative placement of the grid
    pub placement: Placement,
}

impl TableUnit {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}

/// Consecutive list items of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    /// Marker kind shared by all items
    pub kind: ListKind,
    /// Items, each a [`StructuralUnit::ListItem`] of `kind`
    pub items: Vec<StructuralUnit>,
}

impl ListBlock {
    /// Create an empty list.
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }
}

/// One entry of a page's content stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum PageItem {
    /// A paragraph, heading or table
    Unit(StructuralUnit),
    /// A list of items
    List(ListBlock),
    /// A positioned image
    Image(ImageAnchor),
}
