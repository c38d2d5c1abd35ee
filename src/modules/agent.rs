use serde::{Deserialize, Serialize};

use crate::modules::grid::{Cell, Direction};

/// Cycles charged for every non-`end` action.
pub const ACTION_CYCLES: u32 = 1;
/// Additional cycles charged on top of `ACTION_CYCLES` for `put-out`.
pub const PUT_OUT_EXTRA_CYCLES: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub location: Cell,
    pub direction: Direction,
    pub alive: bool,
    pub cycles_from_last_recharge: u32,
    pub cycles_alive: u64,
}

impl Agent {
    pub fn new(location: Cell, direction: Direction) -> Self {
        Self {
            location,
            direction,
            alive: true,
            cycles_from_last_recharge: 0,
            cycles_alive: 0,
        }
    }

    pub fn front(&self) -> Cell {
        self.location.step(self.direction)
    }

    pub(crate) fn charge(&mut self, cycles: u32) {
        self.cycles_from_last_recharge = self.cycles_from_last_recharge.saturating_add(cycles);
        self.cycles_alive = self.cycles_alive.saturating_add(cycles as u64);
    }

    pub(crate) fn recharge(&mut self) {
        self.cycles_from_last_recharge = 0;
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}

/// Reporting-only counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub recharges: u64,
    pub fires_extinguished: u64,
    pub cycles_without_fire: u64,
}

impl Stats {
    /// Share of alive cycles spent with no fire burning, as a whole percentage.
    pub fn fire_free_percent(&self, cycles_alive: u64) -> u64 {
        if cycles_alive == 0 {
            return 0;
        }
        self.cycles_without_fire.saturating_mul(100) / cycles_alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_follows_direction() {
        let agent = Agent::new(Cell::new(5, 6), Direction::West);
        assert_eq!(agent.front(), Cell::new(4, 6));
    }

    #[test]
    fn charge_and_recharge() {
        let mut agent = Agent::new(Cell::new(5, 6), Direction::West);
        agent.charge(3);
        agent.charge(ACTION_CYCLES + PUT_OUT_EXTRA_CYCLES);
        assert_eq!(agent.cycles_from_last_recharge, 8);
        assert_eq!(agent.cycles_alive, 8);

        agent.recharge();
        assert_eq!(agent.cycles_from_last_recharge, 0);
        assert_eq!(agent.cycles_alive, 8);
    }

    #[test]
    fn fire_free_percent_handles_zero() {
        let stats = Stats {
            cycles_without_fire: 3,
            ..Stats::default()
        };
        assert_eq!(stats.fire_free_percent(0), 0);
        assert_eq!(stats.fire_free_percent(4), 75);
    }
}
