//! SDL_ttf glyph rasterizer for the character-rain program

use crate::error::{FxError, Result};
use crate::rain::{GlyphAtlas, GlyphMask, GlyphRasterizer};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::ttf::Font;
use std::path::Path;

/// Renders single characters of a loaded TTF font to coverage masks
pub struct TtfRasterizer<'ttf> {
    font: Font<'ttf, 'static>,
}

impl<'ttf> TtfRasterizer<'ttf> {
    pub fn new(font: Font<'ttf, 'static>) -> Self {
        Self { font }
    }
}

impl GlyphRasterizer for TtfRasterizer<'_> {
    fn rasterize(&self, ch: char) -> Result<GlyphMask> {
        let surface = self
            .font
            .render_char(ch)
            .blended(Color::RGBA(255, 255, 255, 255))
            .map_err(|e| FxError::Font(format!("glyph {:?}: {}", ch, e)))?;
        // Packed ARGB so alpha is the top byte regardless of byte order
        let surface = surface
            .convert_format(PixelFormatEnum::ARGB8888)
            .map_err(FxError::Font)?;

        let width = surface.width();
        let height = surface.height();
        let pitch = surface.pitch() as usize;

        let coverage = surface.with_lock(|pixels| {
            let mut coverage = Vec::with_capacity((width * height) as usize);
            for row in 0..height as usize {
                let line = &pixels[row * pitch..row * pitch + width as usize * 4];
                for px in line.chunks_exact(4) {
                    let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                    coverage.push((argb >> 24) as u8);
                }
            }
            coverage
        });

        Ok(GlyphMask::new(width, height, coverage))
    }
}

/// Rasterize the printable symbol set from a TTF file
///
/// The font and the TTF context only live for the duration of this call;
/// the returned atlas owns plain coverage masks.
pub fn load_atlas(path: &Path, point_size: u16) -> Result<GlyphAtlas> {
    let ttf = sdl2::ttf::init().map_err(|e| FxError::Font(e.to_string()))?;
    let font = ttf
        .load_font(path, point_size)
        .map_err(|e| FxError::Font(format!("{}: {}", path.display(), e)))?;
    let rasterizer = TtfRasterizer::new(font);
    let atlas = GlyphAtlas::build(&rasterizer)?;
    tracing::info!(font = %path.display(), point_size, glyphs = atlas.len(), "glyph atlas built");
    Ok(atlas)
}
