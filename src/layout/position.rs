//! Absolute placement and rotation of page elements.

use serde::{Deserialize, Serialize};

use super::units::{format_number, px};
use crate::model::{BBox, Direction, Page, Point};

/// Render hints for one element, relative to the page origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Horizontal offset from the page origin
    pub x: f32,
    /// Vertical offset from the page origin
    pub y: f32,
    /// Rotation in degrees, counter-clockwise positive
    pub rotation: f32,
}

impl Placement {
    /// Check whether the element needs a rotation transform.
    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    /// Inline CSS for an absolutely positioned element.
    ///
    /// `size` adds explicit width/height, used for images.
    pub fn to_css(&self, size: Option<(f32, f32)>) -> String {
        let mut css = format!("left: {}; top: {};", px(self.x), px(self.y));
        if let Some((width, height)) = size {
            css.push_str(&format!(" width: {}; height: {};", px(width), px(height)));
        }
        if self.is_rotated() {
            // CSS rotate() turns clockwise for positive angles.
            css.push_str(&format!(
                " transform: rotate({}deg); transform-origin: left top;",
                format_number(-self.rotation)
            ));
        }
        css
    }
}

/// Computes placements against a fixed page origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positioner {
    origin: Point,
}

impl Positioner {
    /// Create a positioner for an explicit page origin.
    pub fn new(origin: Point) -> Self {
        Self { origin }
    }

    /// Create a positioner for a page's box.
    pub fn for_page(page: &Page) -> Self {
        Self::new(page.origin)
    }

    /// Place an element box written along `dir`.
    pub fn place(&self, bbox: &BBox, dir: Direction) -> Placement {
        Placement {
            x: normalize(bbox.left - self.origin.x),
            y: normalize(bbox.top - self.origin.y),
            rotation: rotation_degrees(dir),
        }
    }

    /// Place an unrotated element such as an image.
    pub fn place_upright(&self, bbox: &BBox) -> Placement {
        self.place(bbox, Direction::HORIZONTAL)
    }
}

/// Rotation angle of a direction vector, `atan2(-dy, dx)` in degrees.
///
/// Page coordinates grow downward, so `(0, 1)` is -90 degrees.
/// A degenerate vector yields 0.
pub fn rotation_degrees(dir: Direction) -> f32 {
    if !dir.dx.is_finite() || !dir.dy.is_finite() || (dir.dx == 0.0 && dir.dy == 0.0) {
        return 0.0;
    }
    let degrees = f64::from(-dir.dy).atan2(f64::from(dir.dx)).to_degrees();
    normalize(((degrees * 100.0).round() / 100.0) as f32)
}

fn normalize(value: f32) -> f32 {
    if value == 0.0 || !value.is_finite() {
        0.0
    } else {
        value
    }
}
