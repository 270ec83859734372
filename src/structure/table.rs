//! Block-level table detection from column alignment.
//!
//! A block is read as a table when its lines split into the same number of
//! cells, the cells are separated by wide gaps, and each column's left edges
//! line up across rows.

use super::ListKind;
use crate::model::{Block, Span};

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Minimum horizontal gap between adjacent cells (points)
    pub min_column_gap: f32,
    /// Maximum drift of a column's left edge across rows (points)
    pub column_tolerance: f32,
    /// Reject grids whose first column is made of list markers
    pub reject_list_patterns: bool,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            min_column_gap: 15.0,
            column_tolerance: 3.0,
            reject_list_patterns: true,
        }
    }
}

/// A detected grid of cells borrowed from the source block.
#[derive(Debug, Clone)]
pub struct DetectedTable<'b> {
    /// Cells per row, left to right
    pub rows: Vec<Vec<&'b Span>>,
    /// Left edge of each column, taken from the first row
    pub columns: Vec<f32>,
}

impl DetectedTable<'_> {
    /// Number of leading header rows.
    pub fn header_rows(&self) -> usize {
        if self.rows.len() > 1 {
            1
        } else {
            0
        }
    }
}

/// Detects tables in text blocks.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect whether `block` is a table.
    pub fn detect<'b>(&self, block: &'b Block) -> Option<DetectedTable<'b>> {
        if block.lines.len() < self.config.min_rows {
            return None;
        }

        let rows: Vec<Vec<&Span>> = block
            .lines
            .iter()
            .map(|line| line.spans.iter().filter(|s| !s.is_blank()).collect())
            .collect();

        let width = rows.first()?.len();
        if width < self.config.min_columns {
            log::debug!(
                "TableDetector: not enough columns ({} < {})",
                width,
                self.config.min_columns
            );
            return None;
        }
        if rows.iter().any(|row| row.len() != width) {
            log::debug!("TableDetector: ragged rows, not a table");
            return None;
        }

        for row in &rows {
            let separated = row.windows(2).all(|pair| {
                pair[1].bbox.left - pair[0].bbox.right >= self.config.min_column_gap
            });
            if !separated {
                log::debug!("TableDetector: cells closer than {}pt", self.config.min_column_gap);
                return None;
            }
        }

        let columns: Vec<f32> = rows[0].iter().map(|s| s.bbox.left).collect();
        for row in &rows[1..] {
            let aligned = row
                .iter()
                .zip(&columns)
                .all(|(span, col)| (span.bbox.left - col).abs() <= self.config.column_tolerance);
            if !aligned {
                log::debug!("TableDetector: column edges drift, not a table");
                return None;
            }
        }

        if self.config.reject_list_patterns && is_list_pattern(&rows) {
            log::debug!("TableDetector: skipping block, detected as list pattern");
            return None;
        }

        log::debug!(
            "TableDetector: detected {}x{} table",
            rows.len(),
            columns.len()
        );
        Some(DetectedTable { rows, columns })
    }
}

/// Check whether most rows start with a list marker, as when a marker and
/// its item text are separate spans.
fn is_list_pattern(rows: &[Vec<&Span>]) -> bool {
    let markers = rows
        .iter()
        .filter(|row| {
            row.first()
                .map(|cell| ListKind::detect(&cell.text).is_some())
                .unwrap_or(false)
        })
        .count();
    markers * 2 >= rows.len()
}
