use std::path::PathBuf;

use firebot::{
    SimConfig, Simulation, WorldSnapshot, encode_sensors, load_world_snapshot, logbook,
    render_grid,
};

use super::WorldArgs;

pub fn run_config() -> Result<(), String> {
    let json = SimConfig::default()
        .to_json()
        .map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

pub fn run_show(world: &WorldArgs, saved: Option<PathBuf>) -> Result<(), String> {
    if let Some(path) = saved {
        let snapshot = load_world_snapshot(&path)
            .map_err(|e| format!("read snapshot {}: {}", path.display(), e))?
            .ok_or_else(|| format!("no snapshot at {}", path.display()))?;
        print_snapshot(&snapshot);
        return Ok(());
    }

    let config = world.resolve()?;
    let sim = Simulation::new(&config).map_err(|e| e.to_string())?;
    print_snapshot(&sim.snapshot());
    println!("Sensors: {}", encode_sensors(&sim.sensors()));
    Ok(())
}

fn print_snapshot(snapshot: &WorldSnapshot) {
    for line in logbook(snapshot) {
        println!("  {}", line);
    }
    print!("{}", render_grid(snapshot));
}
