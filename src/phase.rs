//! Hyperspace-to-target phase machine
//!
//! A strictly linear sequence over one shared star pool:
//!
//! ```text
//! Traverse --countdown--> Condense --countdown | converged--> Approach --radius reached--> Final
//! ```
//!
//! Every exit is either a countdown or a measurable predicate backed by a
//! countdown, so the machine can never stall. Final is terminal.

use crate::display::PixelBuffer;
use crate::field::{render_galaxy, GalaxyPalette};
use crate::stars::{StarPool, StarShade};
use crate::viewport::Viewport;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Background sub-sampling while in hyperspace
const BACKDROP_STEP: u32 = 4;

const CONDENSE_STAR: (u8, u8, u8) = (80, 255, 80);
const CORE: (u8, u8, u8) = (120, 255, 120);
const TRENCH: (u8, u8, u8) = (60, 180, 60);
const DISH: (u8, u8, u8) = (40, 180, 40);
const DISH_HIGHLIGHT: (u8, u8, u8) = (180, 255, 180);

/// Half-height of the equatorial band, in pixels
const TRENCH_HALF_HEIGHT: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseParams {
    /// Frames spent in hyperspace
    pub traverse_frames: u32,
    /// Depth units per frame while in hyperspace
    pub warp_speed: f32,
    /// Upper bound on frames spent condensing
    pub condense_frames: u32,
    /// Fraction of the remaining screen distance closed per frame
    pub condense_pull: f32,
    /// Radius of the condensed core; also the convergence epsilon
    pub condense_radius: f32,
    pub approach_damping: f32,
    /// Added every approach frame so growth never stalls near the target
    pub approach_growth: f32,
    /// Approach ends once the radius is this close to the final radius
    pub approach_margin: f32,
    /// Final radius as a fraction of viewport height
    pub final_radius_ratio: f32,
}

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            traverse_frames: 100,
            warp_speed: 40.0,
            condense_frames: 80,
            condense_pull: 0.12,
            condense_radius: 8.0,
            approach_damping: 0.12,
            approach_growth: 1.0,
            approach_margin: 2.0,
            final_radius_ratio: 0.32,
        }
    }
}

impl PhaseParams {
    /// Clamp values that would break forward progress
    fn sanitized(mut self) -> Self {
        self.condense_pull = self.condense_pull.clamp(0.0, 1.0);
        self.condense_radius = self.condense_radius.max(0.0);
        self.approach_damping = self.approach_damping.clamp(0.0, 1.0);
        self.approach_growth = self.approach_growth.max(0.1);
        self.approach_margin = self.approach_margin.max(0.0);
        self.final_radius_ratio = self.final_radius_ratio.max(0.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Traverse,
    Condense,
    Approach,
    Final,
}

/// Active phase with its phase-local state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Traverse { frames_left: u32 },
    Condense { frames_left: u32 },
    Approach { radius: f32 },
    Final,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Traverse { .. } => PhaseKind::Traverse,
            Phase::Condense { .. } => PhaseKind::Condense,
            Phase::Approach { .. } => PhaseKind::Approach,
            Phase::Final => PhaseKind::Final,
        }
    }
}

pub struct PhaseMachine {
    phase: Phase,
    params: PhaseParams,
    viewport: Viewport,
    target: (f32, f32),
    final_radius: f32,
}

impl PhaseMachine {
    /// Start in Traverse, condensing toward the screen center
    pub fn new(params: PhaseParams, viewport: Viewport) -> Self {
        let params = params.sanitized();
        let final_radius = (viewport.h() * params.final_radius_ratio).max(params.condense_radius);
        Self {
            phase: Phase::Traverse {
                frames_left: params.traverse_frames,
            },
            params,
            viewport,
            target: viewport.center(),
            final_radius,
        }
    }

    /// Condense toward a different screen point
    pub fn with_target(mut self, x: f32, y: f32) -> Self {
        self.target = (x, y);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    pub fn params(&self) -> &PhaseParams {
        &self.params
    }

    pub fn final_radius(&self) -> f32 {
        self.final_radius
    }

    /// Radius of the object at the target; never shrinks from phase to phase
    pub fn target_radius(&self) -> f32 {
        match self.phase {
            Phase::Traverse { .. } | Phase::Condense { .. } => self.params.condense_radius,
            Phase::Approach { radius } => radius,
            Phase::Final => self.final_radius,
        }
    }

    /// Run one frame of the active phase
    ///
    /// Returns the phase just entered when this frame ended the previous one.
    pub fn update<R: Rng + ?Sized>(&mut self, pool: &mut StarPool, rng: &mut R) -> Option<PhaseKind> {
        let params = self.params;
        let target = self.target;
        let final_radius = self.final_radius;

        let finished = match &mut self.phase {
            Phase::Traverse { frames_left } => {
                pool.advance(params.warp_speed, rng);
                *frames_left = frames_left.saturating_sub(1);
                *frames_left == 0
            },
            Phase::Condense { frames_left } => {
                let converged = condense(pool, target, params.condense_pull, params.condense_radius);
                *frames_left = frames_left.saturating_sub(1);
                *frames_left == 0 || converged
            },
            Phase::Approach { radius } => {
                let grown = *radius
                    + (final_radius - *radius) * params.approach_damping
                    + params.approach_growth;
                *radius = grown.min(final_radius);
                *radius >= final_radius - params.approach_margin
            },
            Phase::Final => false,
        };

        if finished {
            self.transition();
            Some(self.kind())
        } else {
            None
        }
    }

    /// The single place phases change
    fn transition(&mut self) {
        let from = self.kind();
        self.phase = match self.phase {
            Phase::Traverse { .. } => Phase::Condense {
                frames_left: self.params.condense_frames,
            },
            Phase::Condense { .. } => Phase::Approach {
                radius: self.params.condense_radius,
            },
            Phase::Approach { .. } | Phase::Final => Phase::Final,
        };
        tracing::info!(?from, to = ?self.kind(), "phase transition");
    }

    /// Draw the active phase. `t` is the global frame counter.
    pub fn render(&self, pool: &StarPool, buffer: &mut PixelBuffer, t: u64) {
        let (tx, ty) = self.target;
        match self.phase {
            Phase::Traverse { .. } => {
                render_galaxy(buffer, BACKDROP_STEP, t, self.viewport, &GalaxyPalette::FAINT);
                pool.render_trails(buffer, StarShade::WARP);
            },
            Phase::Condense { .. } => {
                buffer.clear(0, 0, 0);
                let (r, g, b) = CONDENSE_STAR;
                for star in pool.stars() {
                    let p = pool.project(star);
                    buffer.set_pixel(p.x as i32, p.y as i32, r, g, b);
                }
                let (r, g, b) = CORE;
                buffer.fill_circle(tx as i32, ty as i32, self.params.condense_radius as i32, r, g, b);
            },
            Phase::Approach { radius } => {
                buffer.clear(0, 0, 0);
                let (r, g, b) = CORE;
                buffer.fill_circle(tx as i32, ty as i32, radius as i32, r, g, b);
            },
            Phase::Final => {
                buffer.clear(0, 0, 0);
                draw_station(buffer, tx, ty, self.final_radius);
            },
        }
    }
}

/// Pull every star's screen position toward `target` by `pull` of the
/// remaining distance, then re-derive its 3D offsets at unchanged depth.
///
/// Returns true if every star was already within `epsilon` of the target.
fn condense(pool: &mut StarPool, target: (f32, f32), pull: f32, epsilon: f32) -> bool {
    let mut converged = true;

    for i in 0..pool.len() {
        let mut star = pool.stars()[i];
        let p = pool.project(&star);
        let dx = target.0 - p.x;
        let dy = target.1 - p.y;

        let (mut sx, mut sy) = (p.x, p.y);
        if (dx * dx + dy * dy).sqrt() > epsilon {
            sx += dx * pull;
            sy += dy * pull;
            converged = false;
        }

        pool.place_at_screen(&mut star, sx, sy);
        pool.stars_mut()[i] = star;
    }

    converged
}

/// Static final composite: banded sphere with a highlighted dish
fn draw_station(buffer: &mut PixelBuffer, cx: f32, cy: f32, radius: f32) {
    let (x, y) = (cx as i32, cy as i32);

    let (r, g, b) = CORE;
    buffer.fill_circle(x, y, radius as i32, r, g, b);

    let (r, g, b) = TRENCH;
    for dy in -(TRENCH_HALF_HEIGHT - 1)..TRENCH_HALF_HEIGHT {
        let span = radius * radius - (dy * dy) as f32;
        if span >= 0.0 {
            let half = span.sqrt() as i32;
            buffer.hline(x - half, x + half, y + dy, r, g, b);
        }
    }

    let dish_r = radius * 0.28;
    let dish_x = cx + radius * 0.38;
    let dish_y = cy - radius * 0.22;
    let (r, g, b) = DISH;
    buffer.fill_circle(dish_x as i32, dish_y as i32, dish_r as i32, r, g, b);

    let (r, g, b) = DISH_HIGHLIGHT;
    buffer.fill_circle(
        (dish_x - dish_r / 4.0) as i32,
        (dish_y - dish_r / 4.0) as i32,
        (dish_r / 2.0) as i32,
        r,
        g,
        b,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::{DepthRange, MIN_DEPTH};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HD: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };

    fn setup(params: PhaseParams, count: usize, seed: u64) -> (PhaseMachine, StarPool, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pool = StarPool::new(count, HD, DepthRange::distant(HD), &mut rng).with_fade_depth(HD.w() * 0.5);
        (PhaseMachine::new(params, HD), pool, rng)
    }

    /// Step until the machine enters `kind`, returning frames taken
    fn run_until(
        machine: &mut PhaseMachine,
        pool: &mut StarPool,
        rng: &mut StdRng,
        kind: PhaseKind,
        limit: u32,
    ) -> u32 {
        for frame in 1..=limit {
            if machine.update(pool, rng) == Some(kind) {
                return frame;
            }
        }
        panic!("never reached {:?} within {} frames", kind, limit);
    }

    #[test]
    fn test_traverse_countdown_scenario() {
        let (mut machine, mut pool, mut rng) = setup(PhaseParams::default(), 2000, 1);
        for _ in 0..99 {
            machine.update(&mut pool, &mut rng);
        }
        assert_eq!(machine.kind(), PhaseKind::Traverse);
        assert_eq!(machine.update(&mut pool, &mut rng), Some(PhaseKind::Condense));
        assert_eq!(machine.kind(), PhaseKind::Condense);
    }

    #[test]
    fn test_phase_sequence_is_total_and_terminal() {
        let (mut machine, mut pool, mut rng) = setup(PhaseParams::default(), 300, 2);
        let mut seen = vec![machine.kind()];
        for _ in 0..2000 {
            if let Some(kind) = machine.update(&mut pool, &mut rng) {
                seen.push(kind);
            }
        }
        assert_eq!(
            seen,
            vec![
                PhaseKind::Traverse,
                PhaseKind::Condense,
                PhaseKind::Approach,
                PhaseKind::Final
            ]
        );
        assert_eq!(machine.phase(), Phase::Final);
    }

    #[test]
    fn test_condense_converged_on_first_frame() {
        let params = PhaseParams {
            traverse_frames: 1,
            condense_frames: 80,
            ..PhaseParams::default()
        };
        let (mut machine, mut pool, mut rng) = setup(params, 2000, 3);
        assert_eq!(machine.update(&mut pool, &mut rng), Some(PhaseKind::Condense));
        assert_eq!(machine.target(), (960.0, 540.0));

        for i in 0..pool.len() {
            let mut star = pool.stars()[i];
            pool.place_at_screen(&mut star, 960.0, 540.0);
            pool.stars_mut()[i] = star;
        }
        assert_eq!(machine.update(&mut pool, &mut rng), Some(PhaseKind::Approach));
    }

    #[test]
    fn test_condense_countdown_bounds_slow_convergence() {
        let params = PhaseParams {
            traverse_frames: 1,
            condense_frames: 10,
            ..PhaseParams::default()
        };
        let (mut machine, mut pool, mut rng) = setup(params, 400, 4);
        machine.update(&mut pool, &mut rng);
        assert_eq!(machine.kind(), PhaseKind::Condense);

        // Park everything in the screen corners: ~1100px away, needs ~38 frames at 0.12
        for i in 0..pool.len() {
            let mut star = pool.stars()[i];
            let (sx, sy) = if i % 2 == 0 { (0.0, 0.0) } else { (1919.0, 1079.0) };
            pool.place_at_screen(&mut star, sx, sy);
            pool.stars_mut()[i] = star;
        }

        let frames = run_until(&mut machine, &mut pool, &mut rng, PhaseKind::Approach, 10);
        assert_eq!(frames, 10);
    }

    #[test]
    fn test_condense_pulls_and_keeps_stars_valid() {
        let params = PhaseParams {
            traverse_frames: 1,
            condense_frames: 500,
            ..PhaseParams::default()
        };
        let (mut machine, mut pool, mut rng) = setup(params, 200, 5);
        machine.update(&mut pool, &mut rng);

        let distance = |pool: &StarPool| -> f32 {
            pool.stars()
                .iter()
                .map(|s| {
                    let p = pool.project(s);
                    ((p.x - 960.0).powi(2) + (p.y - 540.0).powi(2)).sqrt()
                })
                .fold(0.0, f32::max)
        };
        let before = distance(&pool);
        let depths: Vec<f32> = pool.stars().iter().map(|s| s.z).collect();

        machine.update(&mut pool, &mut rng);
        assert!(distance(&pool) < before);
        for (s, z) in pool.stars().iter().zip(depths) {
            assert_eq!(s.z, z);
            assert!(s.z > MIN_DEPTH);
        }

        // Converges on its own well before the countdown
        let frames = run_until(&mut machine, &mut pool, &mut rng, PhaseKind::Approach, 500);
        assert!(frames < 499);
    }

    #[test]
    fn test_approach_radius_monotonic_and_bounded() {
        let params = PhaseParams {
            traverse_frames: 1,
            condense_frames: 1,
            ..PhaseParams::default()
        };
        let (mut machine, mut pool, mut rng) = setup(params, 10, 6);
        run_until(&mut machine, &mut pool, &mut rng, PhaseKind::Approach, 2);

        let start = machine.target_radius();
        assert_eq!(start, 8.0);
        let final_radius = machine.final_radius();
        assert!((final_radius - 1080.0 * 0.32).abs() < 0.001);

        // Growth is at least `approach_growth` per frame
        let bound = ((final_radius - start) / params.approach_growth).ceil() as u32 + 1;
        let mut last = start;
        let mut frames = 0;
        while machine.kind() == PhaseKind::Approach {
            machine.update(&mut pool, &mut rng);
            assert!(machine.target_radius() >= last);
            last = machine.target_radius();
            frames += 1;
            assert!(frames <= bound, "approach exceeded {} frames", bound);
        }
        assert_eq!(machine.kind(), PhaseKind::Final);
        assert_eq!(machine.target_radius(), final_radius);
    }

    #[test]
    fn test_target_radius_never_shrinks() {
        let (mut machine, mut pool, mut rng) = setup(PhaseParams::default(), 100, 7);
        let mut last = machine.target_radius();
        for _ in 0..1000 {
            machine.update(&mut pool, &mut rng);
            assert!(machine.target_radius() >= last);
            last = machine.target_radius();
        }
    }

    #[test]
    fn test_zero_growth_is_clamped() {
        let params = PhaseParams {
            approach_growth: 0.0,
            approach_damping: 0.0,
            ..PhaseParams::default()
        };
        let machine = PhaseMachine::new(params, HD);
        assert!(machine.params().approach_growth > 0.0);
    }

    #[test]
    fn test_render_condense_draws_core() {
        let vp = Viewport::new(320, 200);
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = StarPool::new(50, vp, DepthRange::distant(vp), &mut rng);
        let params = PhaseParams {
            traverse_frames: 1,
            ..PhaseParams::default()
        };
        let mut machine = PhaseMachine::new(params, vp);
        machine.update(&mut pool, &mut rng);

        let mut buffer = PixelBuffer::for_viewport(vp);
        machine.render(&pool, &mut buffer, 1);
        assert_eq!(buffer.get_pixel(160, 100), Some(CORE));
        assert_ne!(buffer.get_pixel(0, 0), Some(CORE));
    }

    #[test]
    fn test_off_center_target_condenses_and_finishes_there() {
        let params = PhaseParams {
            traverse_frames: 2,
            ..PhaseParams::default()
        };
        let mut rng = StdRng::seed_from_u64(12);
        let mut pool = StarPool::new(400, HD, DepthRange::distant(HD), &mut rng).with_fade_depth(HD.w() * 0.5);
        let mut machine = PhaseMachine::new(params, HD).with_target(100.0, 900.0);
        assert_eq!(machine.target(), (100.0, 900.0));

        let mean_distance = |pool: &StarPool| {
            let total: f32 = pool
                .stars()
                .iter()
                .map(|s| {
                    let p = pool.project(s);
                    ((p.x - 100.0).powi(2) + (p.y - 900.0).powi(2)).sqrt()
                })
                .sum();
            total / pool.len() as f32
        };

        run_until(&mut machine, &mut pool, &mut rng, PhaseKind::Condense, 10);
        let spread = mean_distance(&pool);
        run_until(&mut machine, &mut pool, &mut rng, PhaseKind::Approach, 100);
        assert!(mean_distance(&pool) < spread * 0.5);
        run_until(&mut machine, &mut pool, &mut rng, PhaseKind::Final, 500);

        let mut buffer = PixelBuffer::for_viewport(HD);
        machine.render(&pool, &mut buffer, 0);
        // Body below the equator band, centered on the target
        assert_eq!(buffer.get_pixel(100, 1000), Some(CORE));
        assert_eq!(buffer.get_pixel(100, 900), Some(TRENCH));
        // Screen center is nowhere near the body
        assert_eq!(buffer.get_pixel(1200, 300), Some((0, 0, 0)));
    }

    #[test]
    fn test_final_composite_layers() {
        let vp = Viewport::new(400, 300);
        let mut buffer = PixelBuffer::for_viewport(vp);
        let radius = 100.0;
        draw_station(&mut buffer, 200.0, 150.0, radius);

        // Equator band through the center
        assert_eq!(buffer.get_pixel(200, 150), Some(TRENCH));
        assert_eq!(buffer.get_pixel(120, 152), Some(TRENCH));
        // Plain body below the band
        assert_eq!(buffer.get_pixel(200, 220), Some(CORE));
        // Dish rim and its highlight
        assert_eq!(buffer.get_pixel(238 + 12, 128 + 12), Some(DISH));
        assert_eq!(buffer.get_pixel(231, 121), Some(DISH_HIGHLIGHT));
        // Outside the sphere
        assert_eq!(buffer.get_pixel(10, 10), Some((0, 0, 0)));
    }
}
