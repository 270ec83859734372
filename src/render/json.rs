//! JSON dump of an assembled document.

use super::AssembledDocument;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize an assembled document to JSON.
pub fn to_json(doc: &AssembledDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metadata;
    use crate::render::AssembledPage;

    fn sample() -> AssembledDocument {
        AssembledDocument {
            language: "en".into(),
            generator: "pdfhtml test".into(),
            title: "Test".into(),
            metadata: Metadata::default(),
            classes: Vec::new(),
            pages: vec![AssembledPage {
                number: 1,
                width: 612.0,
                height: 792.0,
                items: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_round_trips() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        let back: AssembledDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
