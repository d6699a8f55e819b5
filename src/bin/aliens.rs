use kioskfx::effects::{Aliens, Effect, GALAXY_STARS};
use std::process::ExitCode;

fn main() -> ExitCode {
    kioskfx::app::run("Aliens in the Galaxy", |viewport, settings, rng| {
        let count = settings.star_count_or(GALAXY_STARS);
        let effect: Box<dyn Effect> = Box::new(Aliens::new(viewport, count, rng));
        Ok(effect)
    })
}
