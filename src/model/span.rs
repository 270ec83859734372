//! Span and line-level types.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{BBox, Direction, Point};

/// Font size assumed when the provider reports none or a nonsensical value.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

bitflags! {
    /// Typographic flags attached to a span.
    ///
    /// | bit | flag        |
    /// |-----|-------------|
    /// | 0   | ITALIC      |
    /// | 1   | BOLD        |
    /// | 2   | SERIF       |
    /// | 3   | MONOSPACED  |
    /// | 4   | SUPERSCRIPT |
    /// | 5   | UNDERLINE   |
    /// | 6   | STRIKEOUT   |
    ///
    /// Providers with a different bit layout are mapped by
    /// [`crate::provider::FlagLayout`] while loading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct StyleFlags: u32 {
        /// Italic or oblique face
        const ITALIC = 1 << 0;
        /// Bold weight
        const BOLD = 1 << 1;
        /// Serif face
        const SERIF = 1 << 2;
        /// Monospaced face
        const MONOSPACED = 1 << 3;
        /// Raised above the baseline
        const SUPERSCRIPT = 1 << 4;
        /// Underlined
        const UNDERLINE = 1 << 5;
        /// Struck through
        const STRIKEOUT = 1 << 6;
    }
}

impl StyleFlags {
    /// Build flags from raw provider bits, dropping unknown bits.
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Check for the bold flag.
    pub fn is_bold(&self) -> bool {
        self.contains(StyleFlags::BOLD)
    }

    /// Check for the italic flag.
    pub fn is_italic(&self) -> bool {
        self.contains(StyleFlags::ITALIC)
    }
}

impl Default for StyleFlags {
    fn default() -> Self {
        StyleFlags::empty()
    }
}

impl Serialize for StyleFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for StyleFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(StyleFlags::from_raw(bits))
    }
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Pure black
    pub const BLACK: Rgb = Rgb(0x000000);

    /// Largest valid 24-bit value.
    pub const MAX: u32 = 0xFF_FF_FF;

    /// Validate a raw provider color, rejecting values wider than 24 bits.
    pub fn checked(raw: u32) -> Option<Rgb> {
        (raw <= Self::MAX).then_some(Rgb(raw))
    }

    /// Render as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.0 & Self::MAX)
    }
}

/// An atomic styled text run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,

    /// Font family name as reported by the provider
    #[serde(default)]
    pub font: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub size: f32,

    /// Paint color (24-bit RGB)
    #[serde(default)]
    pub color: Option<u32>,

    /// Background color, `None` when the span has no fill
    #[serde(default)]
    pub background: Option<u32>,

    /// Typographic flags
    #[serde(default)]
    pub flags: StyleFlags,

    /// Baseline origin
    #[serde(default)]
    pub origin: Point,

    /// Bounding box on the page
    pub bbox: BBox,
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

impl Span {
    /// Create a span with default styling.
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            font: String::new(),
            size: DEFAULT_FONT_SIZE,
            color: None,
            background: None,
            flags: StyleFlags::empty(),
            origin: Point::new(bbox.left, bbox.bottom),
            bbox,
        }
    }

    /// Set the font family and size.
    pub fn with_font(mut self, font: impl Into<String>, size: f32) -> Self {
        self.font = font.into();
        self.size = size;
        self
    }

    /// Set the typographic flags.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the paint color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: u32) -> Self {
        self.background = Some(color);
        self
    }

    /// Font size with malformed values replaced by the default.
    pub fn effective_size(&self) -> f32 {
        if self.size.is_finite() && self.size > 0.0 {
            self.size
        } else {
            DEFAULT_FONT_SIZE
        }
    }

    /// Paint color, black when absent or malformed.
    pub fn paint(&self) -> Rgb {
        self.color.and_then(Rgb::checked).unwrap_or(Rgb::BLACK)
    }

    /// Background fill, `None` when transparent or malformed.
    pub fn fill(&self) -> Option<Rgb> {
        self.background.and_then(Rgb::checked)
    }

    /// Check whether the text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check whether the text ends in a line break.
    pub fn ends_line(&self) -> bool {
        self.text.ends_with('\n') || self.text.ends_with('\r')
    }
}

/// An ordered run of spans sharing a baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Line {
    /// Spans in reading order
    pub spans: Vec<Span>,

    /// Writing direction
    #[serde(default)]
    pub dir: Direction,
}

impl Line {
    /// Create a horizontal line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans,
            dir: Direction::HORIZONTAL,
        }
    }

    /// Set the writing direction.
    pub fn with_direction(mut self, dir: Direction) -> Self {
        self.dir = dir;
        self
    }

    /// Concatenated text of the line.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Bounding box covering all spans.
    pub fn bbox(&self) -> Option<BBox> {
        self.spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_are_fixed() {
        assert_eq!(StyleFlags::ITALIC.bits(), 1);
        assert_eq!(StyleFlags::BOLD.bits(), 2);
        assert_eq!(StyleFlags::MONOSPACED.bits(), 8);

        let flags = StyleFlags::from_raw(0b11 | 1 << 20);
        assert!(flags.is_bold());
        assert!(flags.is_italic());
        assert_eq!(flags.bits(), 0b11);
    }

    #[test]
    fn test_span_defaults() {
        let span = Span::new("x", BBox::default()).with_font("Arial", -3.0);
        assert_eq!(span.effective_size(), DEFAULT_FONT_SIZE);
        assert_eq!(span.paint(), Rgb::BLACK);
        assert_eq!(span.fill(), None);

        let span = span.with_color(0x1FF_FFFF).with_background(0x00FF00);
        assert_eq!(span.paint(), Rgb::BLACK);
        assert_eq!(span.fill(), Some(Rgb(0x00FF00)));
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(0xFF0000).to_hex(), "#ff0000");
        assert_eq!(Rgb(0x12).to_hex(), "#000012");
    }

    #[test]
    fn test_span_deserialize_flags() {
        let json = r#"{"text":"Hi","size":16,"flags":2,"bbox":{"left":0,"top":0,"right":10,"bottom":10}}"#;
        let span: Span = serde_json::from_str(json).unwrap();
        assert!(span.flags.is_bold());
        assert_eq!(span.size, 16.0);
        assert_eq!(span.color, None);
    }

    #[test]
    fn test_blank_and_line_end() {
        assert!(Span::new("  \t", BBox::default()).is_blank());
        assert!(Span::new("Hello\n", BBox::default()).ends_line());
        assert!(!Span::new("Hello", BBox::default()).ends_line());
    }

    #[test]
    fn test_line_bbox() {
        let line = Line::new(vec![
            Span::new("a", BBox::new(0.0, 0.0, 10.0, 12.0)),
            Span::new("b", BBox::new(12.0, 1.0, 30.0, 13.0)),
        ]);
        assert_eq!(line.bbox(), Some(BBox::new(0.0, 0.0, 30.0, 13.0)));
        assert_eq!(line.plain_text(), "ab");
    }
}
