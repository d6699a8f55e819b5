use super::Effect;
use crate::display::PixelBuffer;
use crate::stars::{DepthRange, StarPool, StarShade};
use crate::viewport::Viewport;
use rand::rngs::StdRng;
use std::time::Duration;

pub const STAR_COUNT: usize = 2000;
const SPEED: f32 = 10.0;

/// Classic 3D starfield: points flying out from the center
pub struct Starfield {
    pool: StarPool,
    rng: StdRng,
}

impl Starfield {
    pub fn new(viewport: Viewport, count: usize, mut rng: StdRng) -> Self {
        let pool = StarPool::new(count, viewport, DepthRange::full(viewport), &mut rng);
        Self { pool, rng }
    }

    pub fn pool(&self) -> &StarPool {
        &self.pool
    }
}

impl Effect for Starfield {
    fn update(&mut self) {
        self.pool.advance(SPEED, &mut self.rng);
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        buffer.clear(0, 0, 0);
        self.pool.render_points(buffer, StarShade::FULL);
    }

    fn name(&self) -> &str {
        "Starfield"
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(16)
    }
}
