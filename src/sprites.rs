//! Bouncing alien sprites
//!
//! Independent per-sprite kinematics: straight-line drift that reflects off
//! the viewport edges. Not tied to the phase machine.

use crate::display::PixelBuffer;
use crate::viewport::Viewport;
use rand::Rng;
use std::f32::consts::TAU;

pub const ALIEN_COUNT: usize = 8;

const SKIN: (u8, u8, u8) = (60, 255, 80);
const ANTENNA_TIP: (u8, u8, u8) = (255, 200, 60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Head radius in pixels
    pub size: f32,
    /// Offset into the antenna wiggle cycle
    pub phase: f32,
}

/// Reflect `vel` back toward the interior when `pos` is within `margin` of an edge
#[inline]
fn reflect(pos: f32, vel: &mut f32, margin: f32, extent: f32) {
    if pos < margin {
        *vel = vel.abs();
    } else if pos > extent - margin {
        *vel = -vel.abs();
    }
}

pub struct AlienSwarm {
    aliens: Vec<Alien>,
    viewport: Viewport,
}

impl AlienSwarm {
    /// Spread `count` aliens on an ellipse around the center, drifting randomly
    pub fn new<R: Rng + ?Sized>(count: usize, viewport: Viewport, rng: &mut R) -> Self {
        let (cx, cy) = viewport.center();
        let aliens = (0..count)
            .map(|i| {
                let angle = TAU * i as f32 / count as f32;
                let heading = rng.gen_range(0.0..TAU);
                let speed = rng.gen_range(1.5..3.0);
                Alien {
                    x: cx + angle.cos() * viewport.w() * 0.3,
                    y: cy + angle.sin() * viewport.h() * 0.18,
                    vx: heading.cos() * speed,
                    vy: heading.sin() * speed,
                    size: rng.gen_range(32.0..48.0),
                    phase: rng.gen_range(0.0..10.0),
                }
            })
            .collect();

        Self { aliens, viewport }
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn aliens_mut(&mut self) -> &mut [Alien] {
        &mut self.aliens
    }

    /// Move every alien one frame, bouncing off the edges
    pub fn update(&mut self) {
        let (w, h) = (self.viewport.w(), self.viewport.h());
        for alien in &mut self.aliens {
            alien.x += alien.vx;
            alien.y += alien.vy;
            reflect(alien.x, &mut alien.vx, alien.size, w);
            reflect(alien.y, &mut alien.vy, alien.size, h);
        }
    }

    pub fn render(&self, buffer: &mut PixelBuffer, t: u64) {
        for alien in &self.aliens {
            draw_alien(buffer, alien, t);
        }
    }
}

/// Green head, two black eyes, two wiggling antennae with amber tips
pub fn draw_alien(buffer: &mut PixelBuffer, alien: &Alien, t: u64) {
    let x = alien.x as i32;
    let y = alien.y as i32;
    let size = alien.size;

    let head_radius = size as i32;
    let eye_radius = (size * 0.13) as i32;
    let eye_offset_x = (size * 0.25) as i32;
    let eye_offset_y = (size * 0.1) as i32;
    let antenna_len = size * 0.5;
    let wiggle = (t as f32 * 0.05 + alien.phase).sin() * size * 0.08;

    let (r, g, b) = SKIN;
    buffer.fill_circle(x, y, head_radius, r, g, b);

    for side in [-1, 1] {
        buffer.fill_circle(x + side * eye_offset_x, y - eye_offset_y, eye_radius, 0, 0, 0);
    }

    for side in [-1, 1] {
        let ax0 = x + side * (eye_offset_x / 2);
        let ay0 = y - head_radius;
        let ax1 = (ax0 as f32 + wiggle + side as f32 * antenna_len * 0.2) as i32;
        let ay1 = (ay0 as f32 - antenna_len) as i32;

        let (r, g, b) = SKIN;
        buffer.line(ax0, ay0, ax1, ay1, r, g, b);
        let (r, g, b) = ANTENNA_TIP;
        buffer.fill_circle(ax1, ay1, eye_radius / 2, r, g, b);
    }
}
