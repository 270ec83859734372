//! Layout positioner: page-relative coordinates and rotation hints.

mod position;
mod units;

pub use position::{rotation_degrees, Placement, Positioner};
pub use units::{format_number, px};
