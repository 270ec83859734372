//! Style deduplication into stable class identifiers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::declaration::strip_subset_tag;
use super::Declaration;
use crate::model::{Alignment, Rgb, Span, StyleFlags};

/// Default prefix for generated class names.
pub const DEFAULT_CLASS_PREFIX: &str = "style";

/// The deduplication key of a visual style.
///
/// Font size is stored in hundredths of a point so the key has total
/// equality and a stable hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleKey {
    /// Font family name, subset tag removed
    pub font: String,
    /// Font size in hundredths of a point
    pub size_centipoints: u32,
    /// Paint color
    pub color: Rgb,
    /// Background fill, `None` for transparent
    pub background: Option<Rgb>,
    /// Typographic flags
    pub flags: StyleFlags,
    /// Text alignment of the owning block
    pub alignment: Alignment,
}

impl StyleKey {
    /// Create a style key; malformed sizes fall back to the default.
    ///
    /// Subset tags such as `ABCDEF+` are dropped, so subsets of one font
    /// share a key.
    pub fn new(
        font: impl AsRef<str>,
        size: f32,
        color: Rgb,
        background: Option<Rgb>,
        flags: StyleFlags,
        alignment: Alignment,
    ) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size
        } else {
            crate::model::DEFAULT_FONT_SIZE
        };
        Self {
            font: strip_subset_tag(font.as_ref()).to_string(),
            size_centipoints: (size * 100.0).round() as u32,
            color,
            background,
            flags,
            alignment,
        }
    }

    /// Build the key of a span inside a block with the given alignment.
    pub fn from_span(span: &Span, alignment: Alignment) -> Self {
        Self::new(
            &span.font,
            span.effective_size(),
            span.paint(),
            span.fill(),
            span.flags,
            alignment,
        )
    }

    /// Font size in points.
    pub fn size(&self) -> f32 {
        self.size_centipoints as f32 / 100.0
    }
}

/// A generated class: identifier plus its derived declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleClass {
    /// Class name, e.g. `style-0`
    pub id: String,
    /// Declaration derived once from the key
    pub declaration: Declaration,
}

impl StyleClass {
    /// Render as a CSS rule.
    pub fn to_css_rule(&self) -> String {
        format!(".{} {{ {} }}", self.id, self.declaration.to_css())
    }
}

/// Registry of distinct styles seen during one conversion.
///
/// Classes are allocated in first-seen order and never change afterwards.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    prefix: String,
    classes: IndexMap<StyleKey, StyleClass>,
}

impl StyleRegistry {
    /// Create an empty registry with the default class prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_CLASS_PREFIX)
    }

    /// Create an empty registry with a custom class prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            classes: IndexMap::new(),
        }
    }

    /// Return the class for `key`, allocating it on first sight.
    pub fn intern_class(&mut self, key: StyleKey) -> &StyleClass {
        let prefix = &self.prefix;
        let next = self.classes.len();
        self.classes.entry(key).or_insert_with_key(|key| {
            let id = format!("{}-{}", prefix, next);
            log::debug!("StyleRegistry: allocated {} for {:?}", id, key);
            StyleClass {
                id,
                declaration: Declaration::derive(key),
            }
        })
    }

    /// Look up an existing class without allocating.
    pub fn get(&self, key: &StyleKey) -> Option<&StyleClass> {
        self.classes.get(key)
    }

    /// Number of distinct styles.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no style has been registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in allocation order.
    pub fn classes(&self) -> impl Iterator<Item = &StyleClass> {
        self.classes.values()
    }

    /// Render every class as a CSS rule, one per line, in allocation order.
    pub fn stylesheet(&self) -> String {
        self.classes
            .values()
            .map(StyleClass::to_css_rule)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
