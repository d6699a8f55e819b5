//! Shared program bootstrap
//!
//! Every binary is the same lifecycle around a different effect: logging,
//! settings, full-screen display, then the frame driver until quit.

use crate::config::Settings;
use crate::display::{Display, PixelBuffer, RenderTarget, SdlFrontend};
use crate::driver::FrameDriver;
use crate::effects::Effect;
use crate::error::Result;
use crate::viewport::Viewport;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber; `RUST_LOG` overrides the default filter
pub fn init_logging() {
    // A second call (tests, nested runs) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kioskfx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Seeded from settings when given, otherwise a fresh logged seed
pub fn seed_rng(settings: &Settings) -> (u64, StdRng) {
    let seed = settings.seed.unwrap_or_else(rand::random);
    (seed, StdRng::seed_from_u64(seed))
}

/// Resolve the end-of-frame sleep: settings override the effect's own
pub fn frame_delay(settings: &Settings, effect: &dyn Effect) -> Duration {
    settings
        .frame_delay_ms
        .map_or_else(|| effect.frame_delay(), Duration::from_millis)
}

/// Run one full-screen program and map the outcome to a process exit code
pub fn run<F>(title: &str, build: F) -> ExitCode
where
    F: FnOnce(Viewport, &Settings, StdRng) -> Result<Box<dyn Effect>>,
{
    init_logging();

    match run_inner(title, build) {
        Ok(frames) => {
            tracing::info!(program = title, frames, "exiting");
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(program = title, error = %e, "setup failed");
            ExitCode::FAILURE
        },
    }
}

fn run_inner<F>(title: &str, build: F) -> Result<u64>
where
    F: FnOnce(Viewport, &Settings, StdRng) -> Result<Box<dyn Effect>>,
{
    let settings = Settings::from_env()?;
    let (seed, rng) = seed_rng(&settings);

    let (display, texture_creator) = Display::fullscreen(title)?;
    let viewport = display.viewport();
    let target = RenderTarget::for_viewport(&texture_creator, viewport)?;
    let mut frontend = SdlFrontend::new(display, target);
    let mut buffer = PixelBuffer::for_viewport(viewport);

    let mut effect = build(viewport, &settings, rng)?;
    let delay = frame_delay(&settings, effect.as_ref());
    tracing::info!(
        effect = effect.name(),
        seed,
        delay_ms = delay.as_millis() as u64,
        "starting"
    );

    let driver = FrameDriver::new(delay).with_max_frames(settings.max_frames);
    Ok(driver.run(effect.as_mut(), &mut frontend, &mut buffer))
}
