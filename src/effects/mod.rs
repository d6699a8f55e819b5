mod aliens;
mod galaxy_stars;
mod hyperspace;
mod matrix;
mod plasma;
mod starfield;

pub use aliens::Aliens;
pub use galaxy_stars::{GalaxyStars, STAR_COUNT as GALAXY_STARS};
pub use hyperspace::{Hyperspace, STAR_COUNT as HYPERSPACE_STARS};
pub use matrix::MatrixRain;
pub use plasma::Plasma;
pub use starfield::{Starfield, STAR_COUNT as STARFIELD_STARS};

use crate::display::PixelBuffer;
use std::time::Duration;

/// One full-screen program's animation
pub trait Effect {
    /// Advance simulation state by one frame
    fn update(&mut self);

    /// Render the current state to the pixel buffer
    fn render(&self, buffer: &mut PixelBuffer);

    /// Effect name for logging
    fn name(&self) -> &str;

    /// Sleep between frames
    fn frame_delay(&self) -> Duration {
        Duration::from_millis(16)
    }
}
