//! Error types for pdfhtml library.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfhtml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document provider could not deliver a readable document.
    #[error("Document provider error: {0}")]
    Provider(String),

    /// An extracted image could not be persisted.
    #[error("Failed to persist image asset {}: {source}", path.display())]
    AssetPersist {
        /// Target path of the asset
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Language detection failed.
    #[error("Language detection failed: {0}")]
    Detection(String),

    /// The final document could not be written.
    #[error("Failed to write output {}: {source}", path.display())]
    OutputWrite {
        /// Target path of the document
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Error during rendering (HTML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check whether the error aborts a conversion run.
    ///
    /// Asset and detection failures are recovered locally and surface as
    /// [`Warning`]s instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::AssetPersist { .. } | Error::Detection(_))
    }
}

/// Category of a recovered, non-fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// An image was omitted because it could not be saved
    AssetPersist,
    /// The language fell back to "unknown"
    Detection,
}

/// A recovered error reported alongside a successfully produced document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// What kind of failure was recovered
    pub kind: WarningKind,

    /// Page the failure occurred on, if any
    pub page: Option<u32>,

    /// Human-readable description
    pub message: String,
}

impl Warning {
    /// Build a warning from a recoverable error.
    ///
    /// Returns `None` for fatal errors, which must be propagated instead.
    pub fn from_error(err: &Error, page: Option<u32>) -> Option<Self> {
        let kind = match err {
            Error::AssetPersist { .. } => WarningKind::AssetPersist,
            Error::Detection(_) => WarningKind::Detection,
            _ => return None,
        };
        Some(Self {
            kind,
            page,
            message: err.to_string(),
        })
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.page {
            Some(page) => write!(f, "page {}: {}", page, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
