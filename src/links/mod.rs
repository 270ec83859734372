//! Hyperlink overlay resolution by bounding-box containment.

use crate::model::{BBox, LinkRegion};

/// Matches span boxes against a page's link regions.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    regions: &'a [LinkRegion],
}

impl<'a> LinkResolver<'a> {
    /// Create a resolver over regions in page order.
    pub fn new(regions: &'a [LinkRegion]) -> Self {
        Self { regions }
    }

    /// Target of the first region that fully contains `bbox`.
    ///
    /// Partial overlap never links; regions with an empty URI are skipped.
    pub fn resolve(&self, bbox: &BBox) -> Option<&'a str> {
        self.regions
            .iter()
            .filter(|region| !region.uri.trim().is_empty())
            .find(|region| region.bbox.contains(bbox))
            .map(|region| region.uri.as_str())
    }

    /// Number of usable regions.
    pub fn len(&self) -> usize {
        self.regions
            .iter()
            .filter(|region| !region.uri.trim().is_empty())
            .count()
    }

    /// Check if no usable region exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
