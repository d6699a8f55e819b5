//! Full-screen kiosk visual effects
//!
//! A small family of stand-alone programs sharing one software renderer:
//! effects draw into a [`display::PixelBuffer`] which is streamed to an SDL
//! texture once per frame.

pub mod app;
pub mod config;
pub mod display;
pub mod driver;
pub mod effects;
pub mod error;
pub mod field;
pub mod phase;
pub mod rain;
pub mod sprites;
pub mod stars;
pub mod viewport;

mod util;
