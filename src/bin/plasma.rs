use kioskfx::effects::{Effect, Plasma};
use std::process::ExitCode;

fn main() -> ExitCode {
    kioskfx::app::run("Plasma", |_viewport, _settings, _rng| {
        let effect: Box<dyn Effect> = Box::new(Plasma::new());
        Ok(effect)
    })
}
