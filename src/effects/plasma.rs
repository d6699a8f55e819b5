use super::Effect;
use crate::display::PixelBuffer;
use crate::field::{plasma_color, render_field};
use std::time::Duration;

/// Classic demoscene plasma, every pixel every frame
pub struct Plasma {
    frame: u64,
}

impl Plasma {
    pub fn new() -> Self {
        Self { frame: 0 }
    }
}

impl Default for Plasma {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Plasma {
    fn update(&mut self) {
        self.frame += 1;
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        let t = self.frame;
        render_field(buffer, 1, |x, y| plasma_color(x, y, t));
    }

    fn name(&self) -> &str {
        "Plasma"
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(16)
    }
}
