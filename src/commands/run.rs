use std::path::PathBuf;

use firebot::{
    Channel, Gateway, PipeChannel, RunOutcome, Simulation, StreamChannel, logbook, render_grid,
    save_world_snapshot,
};
use tracing::info;

use super::WorldArgs;

pub fn run_simulation(
    world: &WorldArgs,
    pipe: PathBuf,
    stdio: bool,
    render: bool,
    snapshot: Option<PathBuf>,
) -> Result<(), String> {
    let config = world.resolve()?;
    let mut sim = Simulation::new(&config).map_err(|e| e.to_string())?;

    let channel: Box<dyn Channel> = if stdio {
        info!("exchanging messages over stdin/stdout");
        Box::new(StreamChannel::stdio())
    } else {
        let pipe = PipeChannel::new(pipe);
        info!(pipe = %pipe.path().display(), "exchanging messages over pipe");
        Box::new(pipe)
    };

    if render {
        print_world(&sim);
    }

    let mut gateway = Gateway::new(channel, config.decode);
    let summary = gateway
        .run_with(&mut sim, |sim, _| {
            if render {
                print_world(sim);
            }
        })
        .map_err(|e| e.to_string())?;

    let outcome = match summary.outcome {
        RunOutcome::Ended => "ended by decision process",
        RunOutcome::Burned => "robot burned",
        RunOutcome::Starved { long_lived: true } => "battery exhausted after a long life",
        RunOutcome::Starved { long_lived: false } => "battery exhausted",
    };
    info!(ticks = summary.ticks, outcome, "run finished");
    for line in logbook(&sim.snapshot()) {
        eprintln!("  {}", line);
    }

    if let Some(path) = snapshot {
        let written = save_world_snapshot(&path, &sim.snapshot())
            .map_err(|e| format!("write snapshot {}: {}", path.display(), e))?;
        info!(path = %written.display(), "saved world snapshot");
    }
    Ok(())
}

fn print_world(sim: &Simulation) {
    let snapshot = sim.snapshot();
    eprintln!();
    for line in logbook(&snapshot) {
        eprintln!("  {}", line);
    }
    eprint!("{}", render_grid(&snapshot));
}
