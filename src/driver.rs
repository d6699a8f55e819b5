//! Fixed-delay frame loop
//!
//! One iteration: poll quit -> update -> render -> present -> sleep.
//! Pacing is a fixed sleep, not vsync or an adaptive budget. Quit is only
//! observed at the top of an iteration; a frame in progress always finishes.

use crate::display::PixelBuffer;
use crate::effects::Effect;
use crate::error::Result;
use crate::util::FrameClock;
use std::thread;
use std::time::Duration;

/// Frames between timing reports
const STATS_INTERVAL: u64 = 300;

/// The display side of the loop: quit signal in, finished frames out
pub trait Frontend {
    /// Non-blocking; true once the user asked to leave
    fn quit_requested(&mut self) -> bool;

    /// Show a finished frame
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()>;
}

pub struct FrameDriver {
    delay: Duration,
    max_frames: Option<u64>,
}

impl FrameDriver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_frames: None,
        }
    }

    /// Stop on its own after `limit` frames
    pub fn with_max_frames(mut self, limit: Option<u64>) -> Self {
        self.max_frames = limit;
        self
    }

    /// Drive `effect` until quit (or the frame limit). Returns frames shown.
    ///
    /// A frame that fails to present is logged and dropped; the loop goes on.
    pub fn run(
        &self,
        effect: &mut dyn Effect,
        frontend: &mut dyn Frontend,
        buffer: &mut PixelBuffer,
    ) -> u64 {
        let mut clock = FrameClock::new(60);
        let mut frames = 0u64;

        loop {
            if frontend.quit_requested() {
                tracing::info!(frames, "quit requested");
                break;
            }
            if self.max_frames.is_some_and(|limit| frames >= limit) {
                tracing::info!(frames, "frame limit reached");
                break;
            }

            effect.update();
            effect.render(buffer);
            if let Err(e) = frontend.present(buffer) {
                tracing::warn!(frame = frames, error = %e, "present failed, frame dropped");
            }
            frames += 1;

            clock.tick();
            if frames % STATS_INTERVAL == 0 {
                let timing = clock.timing();
                tracing::debug!(
                    effect = effect.name(),
                    frames,
                    avg_fps = timing.avg_fps as u32,
                    min_fps = timing.min_fps as u32,
                    max_fps = timing.max_fps as u32,
                    frame_ms = timing.avg_frame_ms,
                    samples = timing.samples,
                    "frame timing"
                );
            }

            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        frames
    }
}
