use winit::dpi::PhysicalSize;

use super::{Vec2, Viewport};

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Rectangle in physical surface pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn viewport(self) -> Viewport {
        Viewport::new(self.size.x, self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Returns a rectangle shrunk by `amount` on every side.
    #[inline]
    pub fn inset(self, amount: f32) -> Self {
        Rect::new(
            self.origin.x + amount,
            self.origin.y + amount,
            (self.size.x - 2.0 * amount).max(0.0),
            (self.size.y - 2.0 * amount).max(0.0),
        )
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// Maps the rectangle onto a surface of `bounds` physical pixels at
    /// `pixel_ratio`, clipped to the surface.
    ///
    /// Edges are rounded independently, so adjacent rectangles tile without
    /// gaps. Returns `None` when nothing of the rectangle lands on the surface.
    pub fn to_pixels(self, pixel_ratio: f64, bounds: PhysicalSize<u32>) -> Option<PixelRect> {
        if !self.origin.is_finite() || !self.size.is_finite() || self.is_empty() {
            return None;
        }

        let edge = |v: f32, limit: u32| -> u32 {
            let px = (v as f64 * pixel_ratio).round();
            px.clamp(0.0, limit as f64) as u32
        };

        let max = self.max();
        let x0 = edge(self.origin.x, bounds.width);
        let y0 = edge(self.origin.y, bounds.height);
        let x1 = edge(max.x, bounds.width);
        let y1 = edge(max.y, bounds.height);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

impl PixelRect {
    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}
