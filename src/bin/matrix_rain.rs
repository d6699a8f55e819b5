use kioskfx::display::load_atlas;
use kioskfx::effects::{Effect, MatrixRain};
use std::process::ExitCode;

fn main() -> ExitCode {
    kioskfx::app::run("Matrix Rain", |viewport, settings, rng| {
        let atlas = load_atlas(&settings.font_path, settings.font_size)?;
        let cell = u32::from(settings.font_size);
        let effect: Box<dyn Effect> = Box::new(MatrixRain::new(viewport, atlas, cell, rng));
        Ok(effect)
    })
}
