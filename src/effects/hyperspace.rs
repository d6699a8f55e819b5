use super::Effect;
use crate::display::PixelBuffer;
use crate::phase::{PhaseKind, PhaseMachine, PhaseParams};
use crate::stars::{DepthRange, StarPool};
use crate::viewport::Viewport;
use rand::rngs::StdRng;
use std::time::Duration;

pub const STAR_COUNT: usize = 2000;

/// Warp through hyperspace, condense onto a target and approach it
pub struct Hyperspace {
    pool: StarPool,
    machine: PhaseMachine,
    rng: StdRng,
    frame: u64,
}

impl Hyperspace {
    pub fn new(viewport: Viewport, count: usize, params: PhaseParams, mut rng: StdRng) -> Self {
        // Stars spawn far away and fade out by mid-depth for long streaks
        let pool = StarPool::new(count, viewport, DepthRange::distant(viewport), &mut rng)
            .with_fade_depth(viewport.w() * 0.5);
        Self {
            pool,
            machine: PhaseMachine::new(params, viewport),
            rng,
            frame: 0,
        }
    }

    pub fn phase(&self) -> PhaseKind {
        self.machine.kind()
    }

    pub fn machine(&self) -> &PhaseMachine {
        &self.machine
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Effect for Hyperspace {
    fn update(&mut self) {
        self.machine.update(&mut self.pool, &mut self.rng);
        self.frame += 1;
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        self.machine.render(&self.pool, buffer, self.frame);
    }

    fn name(&self) -> &str {
        "Hyperspace"
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(10)
    }
}
