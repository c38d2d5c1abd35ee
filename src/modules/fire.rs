use rand::Rng;
use rand::seq::SliceRandom;

use crate::modules::grid::{Cell, Grid};
use crate::modules::world::World;

/// Spawn probability with no fire burning; halves for each active fire.
pub const BASE_SPAWN_PROBABILITY: f64 = 0.1;

pub fn spawn_probability(active_fires: usize) -> f64 {
    let exponent = i32::try_from(active_fires).unwrap_or(i32::MAX);
    BASE_SPAWN_PROBABILITY / 2f64.powi(exponent)
}

/// Cells where a fire may start: not on the base cross, not an obstacle,
/// not the base and not already burning.
pub fn ignitable_cells(grid: &Grid, world: &World) -> Vec<Cell> {
    grid.cells()
        .filter(|&cell| {
            !grid.is_black(cell)
                && !grid.is_obstacle(cell)
                && !grid.is_base(cell)
                && !world.is_fire(cell)
        })
        .collect()
}

/// Runs the pre-tick spawn roll and returns the ignited cell, if any.
pub fn maybe_spawn<R: Rng + ?Sized>(
    grid: &Grid,
    world: &mut World,
    rng: &mut R,
) -> Option<Cell> {
    if !world.below_cap() {
        return None;
    }
    let probability = spawn_probability(world.active_fires());
    if !rng.gen_bool(probability) {
        return None;
    }
    let cell = ignitable_cells(grid, world).choose(rng).copied()?;
    world.ignite(grid, cell).ok()?;
    Some(cell)
}
