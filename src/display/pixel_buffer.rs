use crate::viewport::Viewport;
use rayon::prelude::*;

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
///
/// Owned by the frame driver for the duration of a frame: cleared or faded,
/// fully written by the active effect, then handed to the display for upload.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Create a pixel buffer covering the whole viewport
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::with_size(viewport.width, viewport.height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        for px in self.pixels.chunks_exact_mut(4) {
            write_pixel(px, r, g, b);
        }
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels[idx..idx + 4], r, g, b);
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Draw a horizontal line, clipped to the buffer
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let from = self.pixel_index(start as u32, y as u32);
        let to = self.pixel_index(end as u32, y as u32) + 4;
        for px in self.pixels[from..to].chunks_exact_mut(4) {
            write_pixel(px, r, g, b);
        }
    }

    /// Draw a line using Bresenham's algorithm with Cohen-Sutherland clipping
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, r: u8, g: u8, b: u8) {
        let Some((cx0, cy0, cx1, cy1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let dx = (cx1 - cx0).abs();
        let dy = -((cy1 - cy0).abs());
        let sx = if cx0 < cx1 { 1i32 } else { -1i32 };
        let sy = if cy0 < cy1 { 1i32 } else { -1i32 };
        let mut err = dx + dy;
        let mut x = cx0;
        let mut y = cy0;

        loop {
            self.set_pixel(x, y, r, g, b);
            if x == cx1 && y == cy1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Cohen-Sutherland line clipping
    /// Returns the clipped endpoints, or None if the line misses the buffer
    fn clip_line(
        &self,
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
    ) -> Option<(i32, i32, i32, i32)> {
        const INSIDE: u8 = 0;
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;
        // Converges in at most 4 iterations for valid input
        const MAX_ITERATIONS: u32 = 16;

        let w = self.width as i32;
        let h = self.height as i32;

        let outcode = |x: i32, y: i32| -> u8 {
            let mut code = INSIDE;
            if x < 0 {
                code |= LEFT;
            } else if x >= w {
                code |= RIGHT;
            }
            if y < 0 {
                code |= TOP;
            } else if y >= h {
                code |= BOTTOM;
            }
            code
        };

        let mut code0 = outcode(x0, y0);
        let mut code1 = outcode(x1, y1);

        for _ in 0..MAX_ITERATIONS {
            if (code0 | code1) == 0 {
                return Some((x0, y0, x1, y1));
            }
            if (code0 & code1) != 0 {
                return None;
            }

            let code_out = if code0 != 0 { code0 } else { code1 };
            // i64 so long streaks from near-camera stars cannot overflow
            let (dx, dy) = ((x1 - x0) as i64, (y1 - y0) as i64);
            let (x, y);

            if (code_out & BOTTOM) != 0 {
                if dy == 0 {
                    return None;
                }
                x = x0 + (dx * (h - 1 - y0) as i64 / dy) as i32;
                y = h - 1;
            } else if (code_out & TOP) != 0 {
                if dy == 0 {
                    return None;
                }
                x = x0 + (dx * (-y0) as i64 / dy) as i32;
                y = 0;
            } else if (code_out & RIGHT) != 0 {
                if dx == 0 {
                    return None;
                }
                y = y0 + (dy * (w - 1 - x0) as i64 / dx) as i32;
                x = w - 1;
            } else {
                if dx == 0 {
                    return None;
                }
                y = y0 + (dy * (-x0) as i64 / dx) as i32;
                x = 0;
            }

            if code_out == code0 {
                x0 = x;
                y0 = y;
                code0 = outcode(x0, y0);
            } else {
                x1 = x;
                y1 = y;
                code1 = outcode(x1, y1);
            }
        }

        None
    }

    /// Draw a filled circle using horizontal spans
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8) {
        if radius <= 0 {
            if radius == 0 {
                self.set_pixel(cx, cy, r, g, b);
            }
            return;
        }

        // Midpoint circle algorithm with span filling
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while x >= y {
            self.hline(cx - x, cx + x, cy + y, r, g, b);
            if y != 0 {
                self.hline(cx - x, cx + x, cy - y, r, g, b);
            }
            if x != y {
                self.hline(cx - y, cx + y, cy + x, r, g, b);
                if y != 0 {
                    self.hline(cx - y, cx + y, cy - x, r, g, b);
                }
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Fade the entire buffer (multiply all colors by factor)
    /// factor: 0.0 = black, 1.0 = unchanged
    pub fn fade(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        let factor_u16 = (factor * 256.0) as u16;

        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[1] = ((chunk[1] as u16 * factor_u16) >> 8) as u8;
            chunk[2] = ((chunk[2] as u16 * factor_u16) >> 8) as u8;
            chunk[3] = ((chunk[3] as u16 * factor_u16) >> 8) as u8;
        }
    }

    /// Fill the buffer one `step`x`step` block at a time
    ///
    /// `shade` is sampled at each block's top-left pixel and the color is
    /// replicated across the block. Bands of `step` rows are shaded in
    /// parallel; they share nothing, and the call returns once all are done.
    pub fn fill_blocks<F>(&mut self, step: u32, shade: F)
    where
        F: Fn(u32, u32) -> (u8, u8, u8) + Sync,
    {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let step = step.max(1);
        let width = self.width;
        let row_bytes = (width * 4) as usize;

        self.pixels
            .par_chunks_mut(row_bytes * step as usize)
            .enumerate()
            .for_each(|(band, rows)| {
                let y = band as u32 * step;
                let mut x = 0;
                while x < width {
                    let (r, g, b) = shade(x, y);
                    let start = (x * 4) as usize;
                    let end = ((x + step).min(width) * 4) as usize;
                    for row in rows.chunks_exact_mut(row_bytes) {
                        for px in row[start..end].chunks_exact_mut(4) {
                            write_pixel(px, r, g, b);
                        }
                    }
                    x += step;
                }
            });
    }

    /// Raw pixel bytes for texture upload
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}
