//! Procedural color fields
//!
//! Pure functions of (pixel, frame counter, viewport). No hidden state, so
//! every pixel can be evaluated independently and in any order.

use crate::display::PixelBuffer;
use crate::viewport::Viewport;

const ARM_COUNT: f32 = 4.0;
const ARM_TWIST: f32 = 0.025;
const ARM_DRIFT: f32 = 0.012;
const CORE_FALLOFF: f32 = 0.002;

/// Weights and channel gains for the spiral galaxy field
///
/// The core weight is kept small so the center glows blue-white through
/// `core_blue` instead of washing out to yellow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyPalette {
    pub core_weight: f32,
    pub arm_weight: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub core_blue: f32,
}

impl GalaxyPalette {
    /// Full-strength background behind plain starfields
    pub const VIVID: Self = Self {
        core_weight: 0.15,
        arm_weight: 0.85,
        red: 80.0,
        green: 40.0,
        blue: 180.0,
        core_blue: 60.0,
    };

    /// Dim backdrop drawn under hyperspace streaks
    pub const FAINT: Self = Self {
        core_weight: 0.08,
        arm_weight: 0.25,
        red: 40.0,
        green: 20.0,
        blue: 90.0,
        core_blue: 30.0,
    };
}

/// Spiral galaxy color at pixel (x, y) on frame `t`
pub fn galaxy_color(x: u32, y: u32, t: u64, viewport: Viewport, palette: &GalaxyPalette) -> (u8, u8, u8) {
    let (cx, cy) = viewport.center();
    let dx = x as f32 - cx;
    let dy = y as f32 - cy;
    let r = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);

    let spiral = (ARM_COUNT * angle + r * ARM_TWIST - t as f32 * ARM_DRIFT).sin();
    let core = (-r * CORE_FALLOFF).exp();
    let arms = 0.5 + 0.5 * spiral;
    let brightness = palette.core_weight * core + palette.arm_weight * arms * core;

    (
        (palette.red * brightness) as u8,
        (palette.green * brightness) as u8,
        (palette.blue * brightness + palette.core_blue * core) as u8,
    )
}

/// Classic sum-of-sines plasma at pixel (x, y) on frame `t`
pub fn plasma_color(x: u32, y: u32, t: u64) -> (u8, u8, u8) {
    let fx = x as f32;
    let fy = y as f32;
    let ft = t as f32;

    let wave = |s: f32| 128.0 + 128.0 * s.sin();
    let value = (wave(fx / 16.0)
        + wave(fy / 8.0)
        + wave((fx + fy + ft) / 16.0)
        + wave((fx * fx + fy * fy).sqrt() / 8.0))
        / 4.0;

    let channel = |phase: f32| (128.0 + 127.0 * (0.02 * value + phase + ft * 0.02).sin()) as u8;
    (channel(0.0), channel(2.0), channel(4.0))
}

/// Fill the buffer from a field, evaluating once per `step`x`step` block
///
/// `step = 1` is full fidelity; larger steps trade detail for speed.
pub fn render_field<F>(buffer: &mut PixelBuffer, step: u32, field: F)
where
    F: Fn(u32, u32) -> (u8, u8, u8) + Sync,
{
    buffer.fill_blocks(step, field);
}

/// Galaxy background for frame `t`
pub fn render_galaxy(buffer: &mut PixelBuffer, step: u32, t: u64, viewport: Viewport, palette: &GalaxyPalette) {
    render_field(buffer, step, |x, y| galaxy_color(x, y, t, viewport, palette));
}
