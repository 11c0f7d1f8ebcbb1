/// Size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Component-wise maximum; invalid sizes are ignored.
    #[inline]
    pub fn union(self, other: Viewport) -> Viewport {
        match (self.is_valid(), other.is_valid()) {
            (true, true) => Viewport::new(self.width.max(other.width), self.height.max(other.height)),
            (true, false) => self,
            (false, true) => other,
            (false, false) => Viewport::default(),
        }
    }
}
