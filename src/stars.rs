//! Star pool
//!
//! A fixed population of star particles allocated once and recycled in
//! place. Stars live in camera space: `x, y` are offsets from the screen
//! center at unit depth and `z` is the distance along the view axis.

use crate::display::PixelBuffer;
use crate::viewport::Viewport;
use rand::Rng;

/// Depth at or below which a star has reached the camera
pub const MIN_DEPTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Depth on the previous frame, for motion trails
    pub pz: f32,
}

/// Depth band new stars are spawned in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    /// Anywhere between just past the recycle threshold and the far plane
    pub fn full(viewport: Viewport) -> Self {
        Self {
            near: MIN_DEPTH * 2.0,
            far: viewport.w().max(MIN_DEPTH * 2.0),
        }
    }

    /// Back half only, so the field starts out "already in the distance"
    pub fn distant(viewport: Viewport) -> Self {
        let far = viewport.w().max(MIN_DEPTH * 2.0);
        Self {
            near: (far * 0.5).max(MIN_DEPTH * 2.0),
            far,
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.far <= self.near {
            self.far
        } else {
            rng.gen_range(self.near..=self.far)
        }
    }
}

/// Screen position of a star plus its depth-based brightness in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: f32,
    pub y: f32,
    pub brightness: f32,
}

/// Grey level for a star: `base + brightness * gain`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarShade {
    pub base: u8,
    pub gain: u8,
}

impl StarShade {
    /// Black at the far plane, white at the camera
    pub const FULL: Self = Self { base: 0, gain: 255 };
    /// Always visible over a bright background
    pub const BRIGHT: Self = Self { base: 180, gain: 75 };
    /// Near-white hyperspace streaks
    pub const WARP: Self = Self { base: 200, gain: 55 };

    #[inline]
    pub fn gray(&self, brightness: f32) -> u8 {
        (self.base as f32 + brightness.clamp(0.0, 1.0) * self.gain as f32) as u8
    }
}

/// Perspective divide. Callers guarantee `z > MIN_DEPTH`.
#[inline]
fn project_at(viewport: Viewport, fade_depth: f32, x: f32, y: f32, z: f32) -> Projection {
    let (hw, hh) = viewport.center();
    Projection {
        x: (x / z) * hw + hw,
        y: (y / z) * hh + hh,
        brightness: (1.0 - z / fade_depth).clamp(0.0, 1.0),
    }
}

pub struct StarPool {
    stars: Vec<Star>,
    viewport: Viewport,
    spawn: DepthRange,
    fade_depth: f32,
}

impl StarPool {
    /// Allocate `count` stars and scatter them across the viewport
    pub fn new<R: Rng + ?Sized>(
        count: usize,
        viewport: Viewport,
        spawn: DepthRange,
        rng: &mut R,
    ) -> Self {
        let mut pool = Self {
            stars: Vec::with_capacity(count),
            viewport,
            spawn,
            fade_depth: viewport.w().max(1.0),
        };
        pool.stars
            .extend((0..count).map(|_| Self::random_star(viewport, spawn, rng)));
        pool
    }

    /// Depth at which brightness reaches zero (defaults to the viewport width)
    pub fn with_fade_depth(mut self, fade_depth: f32) -> Self {
        self.fade_depth = fade_depth.max(f32::EPSILON);
        self
    }

    /// Re-scatter every star
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for star in &mut self.stars {
            *star = Self::random_star(self.viewport, self.spawn, rng);
        }
    }

    /// A star anywhere in the viewport extents at a depth drawn from `spawn`
    pub fn random_star<R: Rng + ?Sized>(viewport: Viewport, spawn: DepthRange, rng: &mut R) -> Star {
        let (hw, hh) = viewport.center();
        let z = spawn.sample(rng);
        Star {
            x: rng.gen_range(-hw..=hw),
            y: rng.gen_range(-hh..=hh),
            z,
            pz: z,
        }
    }

    /// Fresh offsets at the far plane
    fn respawn<R: Rng + ?Sized>(viewport: Viewport, star: &mut Star, rng: &mut R) {
        let (hw, hh) = viewport.center();
        let far = viewport.w().max(MIN_DEPTH * 2.0);
        star.x = rng.gen_range(-hw..=hw);
        star.y = rng.gen_range(-hh..=hh);
        star.z = far;
        star.pz = far;
    }

    /// Move every star `dz` toward the camera
    ///
    /// Stars that reach `MIN_DEPTH` or project off-screen are recycled in the
    /// same call, so no star is ever left at an invalid depth between frames.
    /// Returns the number of stars recycled.
    pub fn advance<R: Rng + ?Sized>(&mut self, dz: f32, rng: &mut R) -> usize {
        let viewport = self.viewport;
        let fade_depth = self.fade_depth;
        let mut recycled = 0;

        for star in &mut self.stars {
            star.pz = star.z;
            star.z -= dz;

            // Depth is checked first so the divide never sees z <= MIN_DEPTH
            let arrived = !(star.z > MIN_DEPTH);
            if arrived || !Self::on_screen(viewport, fade_depth, star) {
                Self::respawn(viewport, star, rng);
                recycled += 1;
            }
        }

        recycled
    }

    #[inline]
    fn on_screen(viewport: Viewport, fade_depth: f32, star: &Star) -> bool {
        let p = project_at(viewport, fade_depth, star.x, star.y, star.z);
        viewport.contains(p.x, p.y)
    }

    /// Project a star at its current depth
    #[inline]
    pub fn project(&self, star: &Star) -> Projection {
        project_at(self.viewport, self.fade_depth, star.x, star.y, star.z)
    }

    /// Project a star at last frame's depth
    #[inline]
    pub fn project_previous(&self, star: &Star) -> Projection {
        project_at(self.viewport, self.fade_depth, star.x, star.y, star.pz)
    }

    /// Move a star so it projects to (sx, sy), keeping its depth
    pub fn place_at_screen(&self, star: &mut Star, sx: f32, sy: f32) {
        let (hw, hh) = self.viewport.center();
        star.x = (sx - hw) * star.z / hw;
        star.y = (sy - hh) * star.z / hh;
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// One pixel per star
    pub fn render_points(&self, buffer: &mut PixelBuffer, shade: StarShade) {
        for star in &self.stars {
            let p = self.project(star);
            let c = shade.gray(p.brightness);
            buffer.set_pixel(p.x as i32, p.y as i32, c, c, c);
        }
    }

    /// A streak from last frame's projection to this frame's
    pub fn render_trails(&self, buffer: &mut PixelBuffer, shade: StarShade) {
        for star in &self.stars {
            let from = self.project_previous(star);
            let to = self.project(star);
            let c = shade.gray(to.brightness);
            buffer.line(from.x as i32, from.y as i32, to.x as i32, to.y as i32, c, c, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HD: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_init_within_extents() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = StarPool::new(2000, HD, DepthRange::full(HD), &mut rng);
        assert_eq!(pool.len(), 2000);
        for s in pool.stars() {
            assert!(s.x >= -960.0 && s.x <= 960.0);
            assert!(s.y >= -540.0 && s.y <= 540.0);
            assert!(s.z > MIN_DEPTH && s.z <= 1920.0);
            assert_eq!(s.z, s.pz);
        }
    }

    #[test]
    fn test_init_rescatters_within_extents() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pool = StarPool::new(500, HD, DepthRange::distant(HD), &mut rng);
        for _ in 0..40 {
            pool.advance(25.0, &mut rng);
        }
        let before: Vec<Star> = pool.stars().to_vec();

        pool.init(&mut rng);
        assert_eq!(pool.len(), 500);
        for s in pool.stars() {
            assert!(s.x >= -960.0 && s.x <= 960.0);
            assert!(s.y >= -540.0 && s.y <= 540.0);
            assert!(s.z >= 960.0 && s.z <= 1920.0);
            assert_eq!(s.z, s.pz);
        }
        assert_ne!(pool.stars(), &before[..]);
    }

    #[test]
    fn test_distant_spawn_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let pool = StarPool::new(500, HD, DepthRange::distant(HD), &mut rng);
        assert!(pool.stars().iter().all(|s| s.z >= 960.0 && s.z <= 1920.0));
    }

    #[test]
    fn test_depth_stays_valid_across_frames() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = StarPool::new(1000, HD, DepthRange::full(HD), &mut rng);
        for _ in 0..500 {
            pool.advance(40.0, &mut rng);
            for s in pool.stars() {
                assert!(s.z > MIN_DEPTH, "star left at z = {}", s.z);
                let p = pool.project(s);
                assert!(HD.contains(p.x, p.y));
            }
        }
    }

    #[test]
    fn test_arrival_recycles_to_far_plane() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = StarPool::new(1, HD, DepthRange::full(HD), &mut rng);
        pool.stars_mut()[0] = Star {
            x: 0.0,
            y: 0.0,
            z: 5.0,
            pz: 5.0,
        };
        // Overshoots past zero: still recycled, never negative
        assert_eq!(pool.advance(10.0, &mut rng), 1);
        let s = pool.stars()[0];
        assert_eq!(s.z, 1920.0);
        assert_eq!(s.pz, 1920.0);
    }

    #[test]
    fn test_offscreen_projection_recycles() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = StarPool::new(1, HD, DepthRange::full(HD), &mut rng);
        // Corner star close to the camera projects far outside the screen
        pool.stars_mut()[0] = Star {
            x: 900.0,
            y: 500.0,
            z: 30.0,
            pz: 30.0,
        };
        assert_eq!(pool.advance(10.0, &mut rng), 1);
        assert_eq!(pool.stars()[0].z, 1920.0);
    }

    #[test]
    fn test_projection_at_min_depth_is_finite() {
        let mut rng = StdRng::seed_from_u64(6);
        let pool = StarPool::new(1, HD, DepthRange::full(HD), &mut rng);
        let star = Star {
            x: 960.0,
            y: -540.0,
            z: MIN_DEPTH,
            pz: MIN_DEPTH,
        };
        let p = pool.project(&star);
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(p.x.abs() <= HD.w() * HD.w());
        assert!(p.y.abs() <= HD.h() * HD.h());
        // 1 - 1/1920: nearest valid depth is almost, not exactly, full bright
        assert!(p.brightness > 0.999 && p.brightness <= 1.0);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = StarPool::new(1, HD, DepthRange::full(HD), &mut rng).with_fade_depth(960.0);
        let star = Star {
            x: 0.0,
            y: 0.0,
            z: 1920.0,
            pz: 1920.0,
        };
        let p = pool.project(&star);
        assert_eq!((p.x, p.y), (960.0, 540.0));
        assert_eq!(p.brightness, 0.0);
    }

    #[test]
    fn test_place_at_screen_round_trip() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = StarPool::new(1, HD, DepthRange::full(HD), &mut rng);
        let mut star = pool.stars()[0];
        pool.place_at_screen(&mut star, 100.0, 900.0);
        let p = pool.project(&star);
        assert!((p.x - 100.0).abs() < 0.01);
        assert!((p.y - 900.0).abs() < 0.01);
        pool.stars_mut()[0] = star;
        assert_eq!(pool.stars()[0].z, star.z);
    }

    #[test]
    fn test_shade_levels() {
        assert_eq!(StarShade::FULL.gray(0.0), 0);
        assert_eq!(StarShade::FULL.gray(1.0), 255);
        assert_eq!(StarShade::BRIGHT.gray(2.0), 255);
        assert_eq!(StarShade::WARP.gray(0.0), 200);
    }

    #[test]
    fn test_trails_draw_streaks() {
        let vp = Viewport::new(200, 100);
        let mut rng = StdRng::seed_from_u64(9);
        let mut pool = StarPool::new(1, vp, DepthRange::full(vp), &mut rng);
        pool.stars_mut()[0] = Star {
            x: 50.0,
            y: 0.0,
            z: 100.0,
            pz: 200.0,
        };
        let mut buffer = PixelBuffer::for_viewport(vp);
        pool.render_trails(&mut buffer, StarShade::WARP);
        // From x = 125 (pz) to x = 150 (z) along the horizontal midline
        assert_ne!(buffer.get_pixel(125, 50), Some((0, 0, 0)));
        assert_ne!(buffer.get_pixel(140, 50), Some((0, 0, 0)));
        assert_eq!(buffer.get_pixel(160, 50), Some((0, 0, 0)));
    }
}
