//! Document language detection.

use crate::error::{Error, Result};

/// Language tag used when detection fails.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Maps plain text to a language code.
///
/// Implementations are constructed once per process and shared by
/// reference across conversions, so they must be deterministic and `Sync`.
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`.
    fn detect(&self, text: &str) -> Result<String>;

    /// Detect the language, falling back to [`UNKNOWN_LANGUAGE`].
    ///
    /// The error is returned alongside so callers can record it.
    fn detect_or_unknown(&self, text: &str) -> (String, Option<Error>) {
        match self.detect(text) {
            Ok(code) => (code, None),
            Err(err) => (UNKNOWN_LANGUAGE.to_string(), Some(err)),
        }
    }
}

/// Trigram-based detector backed by `whatlang`.
///
/// Returns ISO 639-1 codes where one exists, ISO 639-3 otherwise.
pub struct WhatlangDetector {
    detector: whatlang::Detector,
    min_confidence: f64,
}

impl WhatlangDetector {
    /// Create a detector accepting any confidence.
    pub fn new() -> Self {
        Self {
            detector: whatlang::Detector::new(),
            min_confidence: 0.0,
        }
    }

    /// Reject results below `confidence` (0.0-1.0).
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::Detection("no text to analyze".into()));
        }

        let info = self
            .detector
            .detect(text)
            .ok_or_else(|| Error::Detection("language could not be determined".into()))?;

        if info.confidence() < self.min_confidence {
            return Err(Error::Detection(format!(
                "confidence {:.2} for '{}' below {:.2}",
                info.confidence(),
                info.lang().code(),
                self.min_confidence
            )));
        }

        let code = info.lang().code();
        Ok(iso_639_1(code).unwrap_or(code).to_string())
    }
}

/// Detector that always reports a configured code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguage(pub String);

impl FixedLanguage {
    /// Create a fixed-language detector.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl LanguageDetector for FixedLanguage {
    fn detect(&self, _text: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Two-letter code for a three-letter `whatlang` code.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let two = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(two)
}
