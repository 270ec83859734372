//! CSS declarations derived from style keys.

use serde::{Deserialize, Serialize};

use super::StyleKey;
use crate::layout::px;
use crate::model::StyleFlags;

/// An ordered list of CSS property/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Properties in emission order
    pub properties: Vec<(String, String)>,
}

impl Declaration {
    /// Derive the declaration for a style key.
    pub fn derive(key: &StyleKey) -> Self {
        let mut decl = Declaration::default();

        decl.push("font-family", font_family(&key.font, key.flags));
        decl.push("font-size", px(key.size()));
        decl.push("color", key.color.to_hex());
        decl.push(
            "background-color",
            key.background
                .map(|c| c.to_hex())
                .unwrap_or_else(|| "transparent".to_string()),
        );
        decl.push(
            "font-weight",
            if key.flags.is_bold() { "bold" } else { "normal" },
        );
        decl.push(
            "font-style",
            if key.flags.is_italic() { "italic" } else { "normal" },
        );
        decl.push("text-align", key.alignment.as_css());

        let decorations: Vec<&str> = [
            (StyleFlags::UNDERLINE, "underline"),
            (StyleFlags::STRIKEOUT, "line-through"),
        ]
        .into_iter()
        .filter(|(flag, _)| key.flags.contains(*flag))
        .map(|(_, value)| value)
        .collect();
        if !decorations.is_empty() {
            decl.push("text-decoration", decorations.join(" "));
        }

        if key.flags.contains(StyleFlags::SUPERSCRIPT) {
            decl.push("vertical-align", "super");
        }

        decl
    }

    /// Append a property.
    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.push((property.into(), value.into()));
    }

    /// Look up a property value.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Serialize as `prop: value; prop: value;`.
    pub fn to_css(&self) -> String {
        self.properties
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolve the family: monospaced, then serif, then the literal name.
fn font_family(name: &str, flags: StyleFlags) -> String {
    if flags.contains(StyleFlags::MONOSPACED) {
        return "monospace".to_string();
    }
    if flags.contains(StyleFlags::SERIF) {
        return "serif".to_string();
    }

    let cleaned: String = strip_subset_tag(name)
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\' | ';' | '{' | '}' | '<' | '>'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "sans-serif".to_string()
    } else {
        format!("'{}'", cleaned)
    }
}

/// Drop a font subset tag such as `ABCDEF+` from an embedded font name.
pub(crate) fn strip_subset_tag(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() > 7 && bytes[6] == b'+' && bytes[..6].iter().all(|b| b.is_ascii_uppercase()) {
        &name[7..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Rgb};

    fn key(font: &str, flags: StyleFlags) -> StyleKey {
        StyleKey::new(font, 12.0, Rgb::BLACK, None, flags, Alignment::Left)
    }

    #[test]
    fn test_default_declaration() {
        let decl = Declaration::derive(&key("Helvetica", StyleFlags::empty()));
        assert_eq!(
            decl.to_css(),
            "font-family: 'Helvetica'; font-size: 12px; color: #000000; \
             background-color: transparent; font-weight: normal; font-style: normal; \
             text-align: left;"
        );
    }

    #[test]
    fn test_weight_and_slant_bits() {
        let decl = Declaration::derive(&key("Arial", StyleFlags::BOLD));
        assert_eq!(decl.get("font-weight"), Some("bold"));
        assert_eq!(decl.get("font-style"), Some("normal"));

        let decl = Declaration::derive(&key("Arial", StyleFlags::ITALIC));
        assert_eq!(decl.get("font-weight"), Some("normal"));
        assert_eq!(decl.get("font-style"), Some("italic"));
    }

    #[test]
    fn test_family_precedence() {
        let both = StyleFlags::MONOSPACED | StyleFlags::SERIF;
        assert_eq!(
            Declaration::derive(&key("Courier", both)).get("font-family"),
            Some("monospace")
        );
        assert_eq!(
            Declaration::derive(&key("Times", StyleFlags::SERIF)).get("font-family"),
            Some("serif")
        );
        assert_eq!(
            Declaration::derive(&key("", StyleFlags::empty())).get("font-family"),
            Some("sans-serif")
        );
        assert_eq!(
            Declaration::derive(&key("ABCDEF+Calibri", StyleFlags::empty())).get("font-family"),
            Some("'Calibri'")
        );
    }

    #[test]
    fn test_decorations_and_superscript() {
        let flags = StyleFlags::UNDERLINE | StyleFlags::STRIKEOUT | StyleFlags::SUPERSCRIPT;
        let decl = Declaration::derive(&key("Arial", flags));
        assert_eq!(decl.get("text-decoration"), Some("underline line-through"));
        assert_eq!(decl.get("vertical-align"), Some("super"));
    }

    #[test]
    fn test_background_hex() {
        let key = StyleKey::new(
            "Arial",
            10.5,
            Rgb(0xFF0000),
            Some(Rgb(0xFFFF00)),
            StyleFlags::empty(),
            Alignment::Center,
        );
        let decl = Declaration::derive(&key);
        assert_eq!(decl.get("font-size"), Some("10.5px"));
        assert_eq!(decl.get("color"), Some("#ff0000"));
        assert_eq!(decl.get("background-color"), Some("#ffff00"));
        assert_eq!(decl.get("text-align"), Some("center"));
    }
}
