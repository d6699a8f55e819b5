/// Screen extents captured once at startup
///
/// Passed explicitly into every field, pool and animator call; there is no
/// resize handling, so a run keeps the same viewport from start to quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.height as f32
    }

    #[inline]
    pub fn half_w(&self) -> f32 {
        self.width as f32 * 0.5
    }

    #[inline]
    pub fn half_h(&self) -> f32 {
        self.height as f32 * 0.5
    }

    /// Screen-space center point
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.half_w(), self.half_h())
    }

    /// True if the (truncated) screen coordinate lands on a pixel
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        // NaN compares false on both sides, so it is never inside
        x >= 0.0 && y >= 0.0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }
}
