use kioskfx::effects::{Effect, Hyperspace, HYPERSPACE_STARS};
use std::process::ExitCode;

fn main() -> ExitCode {
    kioskfx::app::run("Hyperspace", |viewport, settings, rng| {
        let count = settings.star_count_or(HYPERSPACE_STARS);
        let params = settings.hyperspace;
        let effect: Box<dyn Effect> = Box::new(Hyperspace::new(viewport, count, params, rng));
        Ok(effect)
    })
}
