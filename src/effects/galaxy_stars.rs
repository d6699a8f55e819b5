use super::Effect;
use crate::display::PixelBuffer;
use crate::field::{render_galaxy, GalaxyPalette};
use crate::stars::{DepthRange, StarPool, StarShade};
use crate::viewport::Viewport;
use rand::rngs::StdRng;
use std::time::Duration;

pub const STAR_COUNT: usize = 1200;
const SPEED: f32 = 28.0;
/// Galaxy sampled once per 2x2 block
const FIELD_STEP: u32 = 2;

/// Spiral galaxy backdrop with a bright starfield on top
pub struct GalaxyStars {
    pool: StarPool,
    viewport: Viewport,
    rng: StdRng,
    frame: u64,
}

impl GalaxyStars {
    pub fn new(viewport: Viewport, count: usize, mut rng: StdRng) -> Self {
        let pool = StarPool::new(count, viewport, DepthRange::full(viewport), &mut rng);
        Self {
            pool,
            viewport,
            rng,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Effect for GalaxyStars {
    fn update(&mut self) {
        self.pool.advance(SPEED, &mut self.rng);
        self.frame += 1;
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        render_galaxy(buffer, FIELD_STEP, self.frame, self.viewport, &GalaxyPalette::VIVID);
        self.pool.render_points(buffer, StarShade::BRIGHT);
    }

    fn name(&self) -> &str {
        "Plasma & Stars"
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(10)
    }
}
