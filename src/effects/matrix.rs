use super::Effect;
use crate::display::PixelBuffer;
use crate::rain::{GlyphAtlas, Rain};
use crate::viewport::Viewport;
use rand::rngs::StdRng;
use std::time::Duration;

/// Per-frame darkening; older glyphs linger as fading ghosts
const FADE_ALPHA: f32 = 60.0 / 255.0;

/// Falling columns of glyphs with bright heads and fading tails
pub struct MatrixRain {
    rain: Rain,
    atlas: GlyphAtlas,
    rng: StdRng,
}

impl MatrixRain {
    /// `cell` is the column pitch and row height, normally the font point size
    pub fn new(viewport: Viewport, atlas: GlyphAtlas, cell: u32, mut rng: StdRng) -> Self {
        let rain = Rain::new(viewport, cell, &mut rng);
        tracing::debug!(columns = rain.columns().len(), glyphs = atlas.len(), "rain ready");
        Self { rain, atlas, rng }
    }

    pub fn rain(&self) -> &Rain {
        &self.rain
    }
}

impl Effect for MatrixRain {
    fn update(&mut self) {
        self.rain.update(&mut self.rng);
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        buffer.fade(1.0 - FADE_ALPHA);
        self.rain.render(buffer, &self.atlas);
    }

    fn name(&self) -> &str {
        "Matrix Rain"
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::rain::{GlyphMask, GlyphRasterizer};
    use rand::SeedableRng;

    struct SolidGlyphs;

    impl GlyphRasterizer for SolidGlyphs {
        fn rasterize(&self, _ch: char) -> Result<GlyphMask> {
            Ok(GlyphMask::new(4, 4, vec![255; 16]))
        }
    }

    #[test]
    fn test_previous_frame_fades() {
        let vp = Viewport::new(64, 64);
        let atlas = GlyphAtlas::build(&SolidGlyphs).unwrap();
        let effect = MatrixRain::new(vp, atlas, 8, StdRng::seed_from_u64(6));
        let mut buffer = PixelBuffer::for_viewport(vp);
        buffer.clear(200, 200, 200);

        effect.render(&mut buffer);

        // Columns sit every 8 px and glyphs are 4 px wide, so x = 5 only fades
        assert_eq!(buffer.get_pixel(5, 10), Some((152, 152, 152)));
    }

    #[test]
    fn test_columns_keep_falling() {
        let vp = Viewport::new(64, 64);
        let atlas = GlyphAtlas::build(&SolidGlyphs).unwrap();
        let mut effect = MatrixRain::new(vp, atlas, 8, StdRng::seed_from_u64(7));
        let before: Vec<f32> = effect.rain().columns().iter().map(|c| c.y).collect();
        effect.update();
        for (column, y) in effect.rain().columns().iter().zip(before) {
            assert!(column.y > y || column.y < 0.0);
        }
    }
}
