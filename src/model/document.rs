//! Document-level types.

use std::collections::HashSet;

use super::Page;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document snapshot produced by the document provider for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document metadata (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Pages in the document
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl SourceDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Give unnumbered pages their 1-indexed position.
    ///
    /// A position already claimed by an explicit number is replaced by the
    /// next number above every number in use. Two pages with the same
    /// explicit number are rejected.
    pub fn number_pages(&mut self) -> Result<()> {
        let mut used = HashSet::new();
        for page in self.pages.iter().filter(|p| p.number != 0) {
            if !used.insert(page.number) {
                return Err(Error::Provider(format!(
                    "duplicate page number {}",
                    page.number
                )));
            }
        }

        let mut next = used.iter().copied().max().unwrap_or(0);
        for (index, page) in self.pages.iter_mut().enumerate() {
            if page.number != 0 {
                continue;
            }
            let mut number = index as u32 + 1;
            if used.contains(&number) {
                while used.contains(&next) || next == 0 {
                    next += 1;
                }
                number = next;
            }
            used.insert(number);
            page.number = number;
        }
        Ok(())
    }

    /// Plain text of the whole document, pages separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Producer application
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Named metadata entries that are present, in a fixed order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        let text_fields = [
            ("author", &self.author),
            ("subject", &self.subject),
            ("keywords", &self.keywords),
            ("creator", &self.creator),
            ("producer", &self.producer),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                entries.push((name, value.clone()));
            }
        }
        if let Some(ref created) = self.created {
            entries.push(("created", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.modified {
            entries.push(("modified", modified.to_rfc3339()));
        }
        entries
    }
}
