//! Falling character columns
//!
//! Each column carries a fixed-length symbol history. Every frame the
//! history shifts down one slot and a fresh symbol is drawn at the head.
//! Glyph images come from a [`GlyphRasterizer`] and are cached once in a
//! [`GlyphAtlas`] at startup.

use crate::display::PixelBuffer;
use crate::error::Result;
use crate::viewport::Viewport;
use rand::Rng;
use std::collections::VecDeque;

pub const TRAIL_LENGTH: usize = 18;

/// Printable ASCII, space through tilde
const FIRST_SYMBOL: u8 = b' ';
const LAST_SYMBOL: u8 = b'~';

const HEAD_COLOR: (u8, u8, u8) = (180, 255, 180);
const TRAIL_COLOR: (u8, u8, u8) = (0, 255, 70);

/// Alpha-only image of one glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl GlyphMask {
    pub fn new(width: u32, height: u32, coverage: Vec<u8>) -> Self {
        debug_assert_eq!(coverage.len(), (width * height) as usize);
        Self {
            width,
            height,
            coverage,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Blend the glyph into `buffer` with its top-left corner at (x, y)
    pub fn draw(&self, buffer: &mut PixelBuffer, x: i32, y: i32, color: (u8, u8, u8), alpha: u8) {
        let (r, g, b) = color;
        for (i, &c) in self.coverage.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let gx = (i as u32 % self.width) as i32;
            let gy = (i as u32 / self.width) as i32;
            let a = (c as u16 * alpha as u16 / 255) as u8;
            buffer.blend_pixel(x + gx, y + gy, r, g, b, a);
        }
    }
}

/// Renders a single character to a coverage mask
pub trait GlyphRasterizer {
    fn rasterize(&self, ch: char) -> Result<GlyphMask>;
}

/// Every printable ASCII glyph, rasterized once
pub struct GlyphAtlas {
    glyphs: Vec<GlyphMask>,
}

impl GlyphAtlas {
    pub fn build(rasterizer: &impl GlyphRasterizer) -> Result<Self> {
        let glyphs = (FIRST_SYMBOL..=LAST_SYMBOL)
            .map(|code| match code as char {
                // Blank glyphs have no coverage; some rasterizers refuse them
                ' ' => Ok(GlyphMask::empty()),
                ch => rasterizer.rasterize(ch),
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = glyphs.len(), "glyph atlas built");
        Ok(Self { glyphs })
    }

    pub fn get(&self, ch: char) -> Option<&GlyphMask> {
        let code = u32::from(ch);
        if code < FIRST_SYMBOL as u32 || code > LAST_SYMBOL as u32 {
            return None;
        }
        self.glyphs.get((code - FIRST_SYMBOL as u32) as usize)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

pub fn random_symbol<R: Rng + ?Sized>(rng: &mut R) -> char {
    rng.gen_range(FIRST_SYMBOL..=LAST_SYMBOL) as char
}

#[derive(Debug, Clone)]
pub struct Column {
    pub x: i32,
    /// Head position in pixels; may be negative while entering
    pub y: f32,
    pub speed: f32,
    /// Newest symbol first
    pub trail: VecDeque<char>,
}

pub struct Rain {
    columns: Vec<Column>,
    viewport: Viewport,
    cell: u32,
}

impl Rain {
    /// One column every `cell` pixels across the viewport
    pub fn new<R: Rng + ?Sized>(viewport: Viewport, cell: u32, rng: &mut R) -> Self {
        let cell = cell.max(1);
        let count = viewport.width / cell;
        let columns = (0..count)
            .map(|i| Column {
                x: (i * cell) as i32,
                y: rng.gen_range(0.0..viewport.h().max(1.0)),
                speed: Self::random_speed(rng),
                trail: (0..TRAIL_LENGTH).map(|_| random_symbol(rng)).collect(),
            })
            .collect();

        Self {
            columns,
            viewport,
            cell,
        }
    }

    fn random_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
        rng.gen_range(2.0..4.5)
    }

    /// Trail extent in pixels; a column recycles once its head is this far below the screen
    fn trail_span(&self) -> f32 {
        (TRAIL_LENGTH as u32 * self.cell) as f32
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let span = self.trail_span();
        let bottom = self.viewport.h() + span;

        for col in &mut self.columns {
            col.y += col.speed;
            if col.y > bottom {
                col.y = -rng.gen_range(0.0..span);
                col.speed = Self::random_speed(rng);
            }

            col.trail.pop_back();
            col.trail.push_front(random_symbol(rng));
        }
    }

    pub fn render(&self, buffer: &mut PixelBuffer, atlas: &GlyphAtlas) {
        let fade_step = (200 / TRAIL_LENGTH) as u8;
        let height = self.viewport.height as i32;

        for col in &self.columns {
            for (j, &ch) in col.trail.iter().enumerate() {
                let y = col.y as i32 - (j as u32 * self.cell) as i32;
                if y < 0 || y > height {
                    continue;
                }
                let Some(glyph) = atlas.get(ch) else {
                    continue;
                };
                if j == 0 {
                    glyph.draw(buffer, col.x, y, HEAD_COLOR, 255);
                } else {
                    glyph.draw(buffer, col.x, y, TRAIL_COLOR, 255 - j as u8 * fade_step);
                }
            }
        }
    }
}
