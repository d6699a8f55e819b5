use super::{Effect, GalaxyStars};
use crate::display::PixelBuffer;
use crate::sprites::{AlienSwarm, ALIEN_COUNT};
use crate::viewport::Viewport;
use rand::rngs::StdRng;
use std::time::Duration;

/// Galaxy and stars with a swarm of bouncing aliens in front
pub struct Aliens {
    backdrop: GalaxyStars,
    swarm: AlienSwarm,
}

impl Aliens {
    pub fn new(viewport: Viewport, star_count: usize, rng: StdRng) -> Self {
        let mut backdrop = GalaxyStars::new(viewport, star_count, rng);
        let swarm = AlienSwarm::new(ALIEN_COUNT, viewport, backdrop.rng_mut());
        Self { backdrop, swarm }
    }

    pub fn swarm(&self) -> &AlienSwarm {
        &self.swarm
    }
}

impl Effect for Aliens {
    fn update(&mut self) {
        self.backdrop.update();
        self.swarm.update();
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        self.backdrop.render(buffer);
        self.swarm.render(buffer, self.backdrop.frame());
    }

    fn name(&self) -> &str {
        "Aliens in the Galaxy"
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(10)
    }
}
