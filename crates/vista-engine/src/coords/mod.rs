//! Geometry shared by scenes and the surface.
//!
//! Canonical CPU space:
//! - logical pixels (DPI-independent)
//! - origin top-left, +X right, +Y down
//!
//! The surface works in physical pixels; [`Rect::to_pixels`] is the single
//! conversion point between the two.

mod rect;
mod vec2;
mod viewport;

pub use rect::{PixelRect, Rect};
pub use vec2::Vec2;
pub use viewport::Viewport;
