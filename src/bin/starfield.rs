use kioskfx::effects::{Effect, Starfield, STARFIELD_STARS};
use std::process::ExitCode;

fn main() -> ExitCode {
    kioskfx::app::run("Starfield", |viewport, settings, rng| {
        let count = settings.star_count_or(STARFIELD_STARS);
        let effect: Box<dyn Effect> = Box::new(Starfield::new(viewport, count, rng));
        Ok(effect)
    })
}
