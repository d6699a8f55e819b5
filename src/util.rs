//! Frame timing

use std::collections::VecDeque;
use std::time::Instant;

/// Summary of the current sample window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub avg_fps: f32,
    pub min_fps: f32,
    pub max_fps: f32,
    pub avg_frame_ms: f32,
    pub samples: usize,
}

/// Rolling window of frame intervals
pub struct FrameClock {
    intervals: VecDeque<f32>,
    last_tick: Instant,
    window: usize,
}

impl FrameClock {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            intervals: VecDeque::with_capacity(window),
            last_tick: Instant::now(),
            window,
        }
    }

    /// Record the interval since the previous tick
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.record((now - self.last_tick).as_secs_f32());
        self.last_tick = now;
    }

    fn record(&mut self, dt: f32) {
        if self.intervals.len() == self.window {
            self.intervals.pop_front();
        }
        self.intervals.push_back(dt);
    }

    pub fn timing(&self) -> FrameTiming {
        let samples = self.intervals.len();
        if samples == 0 {
            return FrameTiming {
                avg_fps: 0.0,
                min_fps: 0.0,
                max_fps: 0.0,
                avg_frame_ms: 0.0,
                samples,
            };
        }

        let avg_dt = self.intervals.iter().sum::<f32>() / samples as f32;
        let shortest = self.intervals.iter().copied().fold(f32::INFINITY, f32::min);
        let longest = self.intervals.iter().copied().fold(0.0, f32::max);
        let rate = |dt: f32| if dt > 0.0 { 1.0 / dt } else { 0.0 };

        FrameTiming {
            avg_fps: rate(avg_dt),
            min_fps: rate(longest),
            max_fps: rate(shortest),
            avg_frame_ms: avg_dt * 1000.0,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_bounded() {
        let mut clock = FrameClock::new(3);
        for dt in [0.01, 0.02, 0.04, 0.05] {
            clock.record(dt);
        }
        let timing = clock.timing();
        assert_eq!(timing.samples, 3);
        // 0.01 fell out of the window
        assert!((timing.max_fps - 50.0).abs() < 0.01);
        assert!((timing.min_fps - 20.0).abs() < 0.01);
        assert!((timing.avg_frame_ms - 110.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_clock() {
        let timing = FrameClock::new(5).timing();
        assert_eq!(timing.samples, 0);
        assert_eq!(timing.avg_fps, 0.0);
    }
}
