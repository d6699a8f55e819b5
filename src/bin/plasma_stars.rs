use kioskfx::effects::{Effect, GalaxyStars, GALAXY_STARS};
use std::process::ExitCode;

fn main() -> ExitCode {
    kioskfx::app::run("Plasma & Stars", |viewport, settings, rng| {
        let count = settings.star_count_or(GALAXY_STARS);
        let effect: Box<dyn Effect> = Box::new(GalaxyStars::new(viewport, count, rng));
        Ok(effect)
    })
}
