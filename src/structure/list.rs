//! List-marker lexicon.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const CIRCLE_MARKERS: &[char] = &['●', '○', '◯', '⦿', '◉', '⦾', '◦', '◘'];
const DISC_MARKERS: &[char] = &['•', '‣', '⁃', '∙', '⁍', '⁌'];
const SQUARE_MARKERS: &[char] = &['■', '□', '▪', '▫'];

/// Kind of list inferred from an item's leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    /// Hollow or ring bullets
    Circle,
    /// Filled round bullets
    Disc,
    /// Square bullets
    Square,
    /// `1.`, `2.`, ...
    Numeric,
    /// `A.`, `B.`, ...
    UpperLetter,
    /// `a.`, `b.`, ...
    LowerLetter,
}

impl ListKind {
    /// Infer the kind from the leading marker of `text`.
    ///
    /// Glyph bullets match as the first character. Ordinal markers must be
    /// followed by whitespace or the end of the text, so `e.g.` is not a list.
    pub fn detect(text: &str) -> Option<ListKind> {
        let text = text.trim_start();
        let first = text.chars().next()?;

        if CIRCLE_MARKERS.contains(&first) {
            return Some(ListKind::Circle);
        }
        if DISC_MARKERS.contains(&first) {
            return Some(ListKind::Disc);
        }
        if SQUARE_MARKERS.contains(&first) {
            return Some(ListKind::Square);
        }

        let captures = ordinal_marker()?.captures(text)?;
        if captures.get(1).is_some() {
            Some(ListKind::Numeric)
        } else if captures.get(2).is_some() {
            Some(ListKind::UpperLetter)
        } else {
            Some(ListKind::LowerLetter)
        }
    }

    /// Check whether the list is ordered.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            ListKind::Numeric | ListKind::UpperLetter | ListKind::LowerLetter
        )
    }

    /// Markup tag of the list container.
    pub fn tag(&self) -> &'static str {
        if self.is_ordered() {
            "ol"
        } else {
            "ul"
        }
    }

    /// Value of the `type` attribute for ordered lists.
    pub fn ordinal_type(&self) -> Option<&'static str> {
        match self {
            ListKind::Numeric => Some("1"),
            ListKind::UpperLetter => Some("A"),
            ListKind::LowerLetter => Some("a"),
            _ => None,
        }
    }

    /// Class name used on the list container.
    pub fn css_class(&self) -> &'static str {
        match self {
            ListKind::Circle => "list-circle",
            ListKind::Disc => "list-disc",
            ListKind::Square => "list-square",
            ListKind::Numeric => "list-numeric",
            ListKind::UpperLetter => "list-upper-letter",
            ListKind::LowerLetter => "list-lower-letter",
        }
    }
}

fn ordinal_marker() -> Option<&'static Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER
        .get_or_init(|| Regex::new(r"^(?:(\d+)|([A-Z])|([a-z]))\.(?:\s|$)").ok())
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_markers() {
        assert_eq!(ListKind::detect("● item"), Some(ListKind::Circle));
        assert_eq!(ListKind::detect("◦item"), Some(ListKind::Circle));
        assert_eq!(ListKind::detect("• item"), Some(ListKind::Disc));
        assert_eq!(ListKind::detect("‣ item"), Some(ListKind::Disc));
        assert_eq!(ListKind::detect("▪ item"), Some(ListKind::Square));
        assert_eq!(ListKind::detect("  ■"), Some(ListKind::Square));
    }

    #[test]
    fn test_ordinal_markers() {
        assert_eq!(ListKind::detect("1. First item"), Some(ListKind::Numeric));
        assert_eq!(ListKind::detect("12. Twelfth"), Some(ListKind::Numeric));
        assert_eq!(ListKind::detect("3."), Some(ListKind::Numeric));
        assert_eq!(ListKind::detect("B. Second"), Some(ListKind::UpperLetter));
        assert_eq!(ListKind::detect("c. third"), Some(ListKind::LowerLetter));
    }

    #[test]
    fn test_non_markers() {
        assert_eq!(ListKind::detect("Hello"), None);
        assert_eq!(ListKind::detect("3.14 is pi"), None);
        assert_eq!(ListKind::detect("e.g. this"), None);
        assert_eq!(ListKind::detect("AB. no"), None);
        assert_eq!(ListKind::detect("- dash"), None);
        assert_eq!(ListKind::detect("   "), None);
        assert_eq!(ListKind::detect(""), None);
    }

    #[test]
    fn test_container_markup() {
        assert_eq!(ListKind::Disc.tag(), "ul");
        assert_eq!(ListKind::Numeric.tag(), "ol");
        assert_eq!(ListKind::UpperLetter.ordinal_type(), Some("A"));
        assert_eq!(ListKind::Square.ordinal_type(), None);
    }
}
