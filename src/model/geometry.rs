//! Geometric primitives shared by the page model.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates.
///
/// Coordinates follow the provider convention: the origin is the top-left
/// corner of the page and `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BBox {
    /// Create a bounding box from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the box (never negative).
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    /// Height of the box (never negative).
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Check whether `inner` lies fully inside this box.
    ///
    /// Edges may coincide; any overlap that crosses an edge is not containment.
    pub fn contains(&self, inner: &BBox) -> bool {
        self.left <= inner.left
            && self.top <= inner.top
            && self.right >= inner.right
            && self.bottom >= inner.bottom
    }

    /// Check whether the two boxes share any area.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Writing direction of a line as reported by the provider.
///
/// `(1, 0)` is ordinary left-to-right horizontal text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Horizontal component
    pub dx: f32,
    /// Vertical component (page coordinates, downward positive)
    pub dy: f32,
}

impl Direction {
    /// Horizontal, unrotated text.
    pub const HORIZONTAL: Direction = Direction { dx: 1.0, dy: 0.0 };

    /// Create a new direction vector.
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Check whether the vector describes unrotated text.
    pub fn is_horizontal(&self) -> bool {
        self.dy == 0.0 && self.dx > 0.0
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::HORIZONTAL
    }
}
