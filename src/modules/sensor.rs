//! Sensor derivation. Every reading is a pure function of the current grid,
//! fires and agent pose; nothing is cached between calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::modules::agent::Agent;
use crate::modules::grid::Grid;
use crate::modules::world::World;

pub const BATTERY_HIGH_MAX: u32 = 10;
pub const BATTERY_MEDIUM_MAX: u32 = 30;
pub const BATTERY_LOW_MAX: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Cell,
    Temp,
    Prox,
    Light,
    Batt,
}

impl SensorKind {
    /// Evaluation and wire order.
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Cell,
        SensorKind::Temp,
        SensorKind::Prox,
        SensorKind::Light,
        SensorKind::Batt,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Cell => "cell",
            SensorKind::Temp => "temp",
            SensorKind::Prox => "prox",
            SensorKind::Light => "light",
            SensorKind::Batt => "batt",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellReading {
    Base,
    Black,
    Normal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempReading {
    Up,
    Down,
    Equal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightReading {
    Dark,
    Bright,
    Normal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryLevel {
    High,
    Medium,
    Low,
    Dead,
}

impl CellReading {
    pub const fn label(self) -> &'static str {
        match self {
            CellReading::Base => "base",
            CellReading::Black => "black",
            CellReading::Normal => "normal",
        }
    }
}

impl TempReading {
    pub const fn label(self) -> &'static str {
        match self {
            TempReading::Up => "up",
            TempReading::Down => "down",
            TempReading::Equal => "equal",
        }
    }
}

impl LightReading {
    pub const fn label(self) -> &'static str {
        match self {
            LightReading::Dark => "dark",
            LightReading::Bright => "bright",
            LightReading::Normal => "normal",
        }
    }
}

impl BatteryLevel {
    pub const fn from_cycles(cycles_from_last_recharge: u32) -> Self {
        match cycles_from_last_recharge {
            0..=BATTERY_HIGH_MAX => BatteryLevel::High,
            c if c <= BATTERY_MEDIUM_MAX => BatteryLevel::Medium,
            c if c <= BATTERY_LOW_MAX => BatteryLevel::Low,
            _ => BatteryLevel::Dead,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BatteryLevel::High => "high",
            BatteryLevel::Medium => "medium",
            BatteryLevel::Low => "low",
            BatteryLevel::Dead => "dead",
        }
    }

    pub const fn is_dead(self) -> bool {
        matches!(self, BatteryLevel::Dead)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReadings {
    pub cell: CellReading,
    pub temp: TempReading,
    pub prox: bool,
    pub light: LightReading,
    pub batt: BatteryLevel,
}

impl SensorReadings {
    pub fn value(&self, kind: SensorKind) -> &'static str {
        match kind {
            SensorKind::Cell => self.cell.label(),
            SensorKind::Temp => self.temp.label(),
            SensorKind::Prox => {
                if self.prox {
                    "true"
                } else {
                    "false"
                }
            }
            SensorKind::Light => self.light.label(),
            SensorKind::Batt => self.batt.label(),
        }
    }

    /// `(name, value)` pairs in wire order.
    pub fn pairs(&self) -> [(&'static str, &'static str); 5] {
        SensorKind::ALL.map(|kind| (kind.name(), self.value(kind)))
    }
}

impl fmt::Display for SensorReadings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .pairs()
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

pub fn read_sensors(grid: &Grid, world: &World, agent: &Agent) -> SensorReadings {
    SensorReadings {
        cell: cell_sensor(grid, agent),
        temp: temp_sensor(grid, world, agent),
        prox: prox_sensor(grid, agent),
        light: light_sensor(grid, world, agent),
        batt: BatteryLevel::from_cycles(agent.cycles_from_last_recharge),
    }
}

fn cell_sensor(grid: &Grid, agent: &Agent) -> CellReading {
    if grid.is_base(agent.location) {
        CellReading::Base
    } else if grid.is_black(agent.location) {
        CellReading::Black
    } else {
        CellReading::Normal
    }
}

fn temp_sensor(grid: &Grid, world: &World, agent: &Agent) -> TempReading {
    if grid.is_base(agent.location) {
        return TempReading::Equal;
    }
    if grid.is_base(agent.front()) {
        return TempReading::Up;
    }

    let mut behind = false;
    for fire in world.fires() {
        let projection = fire.projection(agent.location, agent.direction);
        if projection > 0 {
            return TempReading::Up;
        }
        if projection < 0 {
            behind = true;
        }
    }

    if behind {
        TempReading::Down
    } else {
        TempReading::Equal
    }
}

fn prox_sensor(grid: &Grid, agent: &Agent) -> bool {
    grid.is_blocked(agent.front())
}

fn light_sensor(grid: &Grid, world: &World, agent: &Agent) -> LightReading {
    let front = agent.front();
    if grid.is_black(front) || grid.is_wall(front) {
        LightReading::Dark
    } else if world.is_fire(front) {
        LightReading::Bright
    } else {
        LightReading::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::grid::{Cell, Direction};

    fn grid() -> Grid {
        Grid::new(
            10,
            Cell::new(5, 6),
            [Cell::new(2, 3), Cell::new(7, 8), Cell::new(6, 3)],
        )
    }

    fn agent_at(x: i32, y: i32, direction: Direction) -> Agent {
        Agent::new(Cell::new(x, y), direction)
    }

    #[test]
    fn cell_sensor_is_base_only_at_base() {
        let grid = grid();
        let world = World::new(None);
        for cell in grid.cells().filter(|c| !grid.is_obstacle(*c)) {
            let agent = Agent::new(cell, Direction::North);
            let readings = read_sensors(&grid, &world, &agent);
            assert_eq!(readings.cell == CellReading::Base, cell == grid.base());
        }
    }

    #[test]
    fn cell_sensor_reports_cross_lines() {
        let grid = grid();
        let world = World::new(None);
        let on_row = read_sensors(&grid, &world, &agent_at(0, 6, Direction::North));
        let on_col = read_sensors(&grid, &world, &agent_at(5, 0, Direction::North));
        let off = read_sensors(&grid, &world, &agent_at(4, 5, Direction::North));
        assert_eq!(on_row.cell, CellReading::Black);
        assert_eq!(on_col.cell, CellReading::Black);
        assert_eq!(off.cell, CellReading::Normal);
    }

    #[test]
    fn temp_is_equal_at_base_even_with_fire_ahead() {
        let grid = grid();
        let mut world = World::new(None);
        world.ignite(&grid, Cell::new(1, 1)).unwrap();
        let readings = read_sensors(&grid, &world, &agent_at(5, 6, Direction::West));
        assert_eq!(readings.temp, TempReading::Equal);
    }

    #[test]
    fn temp_rises_when_facing_base() {
        let grid = grid();
        let world = World::new(None);
        let readings = read_sensors(&grid, &world, &agent_at(4, 6, Direction::East));
        assert_eq!(readings.temp, TempReading::Up);
    }

    #[test]
    fn temp_prefers_fire_ahead_over_behind() {
        let grid = grid();
        let mut world = World::new(None);
        world.ignite(&grid, Cell::new(8, 0)).unwrap();
        world.ignite(&grid, Cell::new(0, 1)).unwrap();
        let agent = agent_at(4, 1, Direction::West);
        assert_eq!(read_sensors(&grid, &world, &agent).temp, TempReading::Up);

        world.extinguish(Cell::new(0, 1));
        assert_eq!(read_sensors(&grid, &world, &agent).temp, TempReading::Down);

        world.extinguish(Cell::new(8, 0));
        assert_eq!(read_sensors(&grid, &world, &agent).temp, TempReading::Equal);
    }

    #[test]
    fn temp_is_equal_for_fire_abeam() {
        let grid = grid();
        let mut world = World::new(None);
        world.ignite(&grid, Cell::new(4, 9)).unwrap();
        let readings = read_sensors(&grid, &world, &agent_at(4, 1, Direction::West));
        assert_eq!(readings.temp, TempReading::Equal);
    }

    #[test]
    fn prox_detects_walls_and_obstacles() {
        let grid = grid();
        let world = World::new(None);
        assert!(read_sensors(&grid, &world, &agent_at(0, 0, Direction::West)).prox);
        assert!(read_sensors(&grid, &world, &agent_at(3, 3, Direction::West)).prox);
        assert!(!read_sensors(&grid, &world, &agent_at(3, 4, Direction::West)).prox);
    }

    #[test]
    fn light_checks_dark_before_bright() {
        let grid = grid();
        let mut world = World::new(None);
        world.ignite(&grid, Cell::new(5, 1)).unwrap();
        world.ignite(&grid, Cell::new(3, 1)).unwrap();

        // (5,1) burns but sits on the base column.
        let toward_column = read_sensors(&grid, &world, &agent_at(4, 1, Direction::East));
        assert_eq!(toward_column.light, LightReading::Dark);

        let toward_fire = read_sensors(&grid, &world, &agent_at(4, 1, Direction::West));
        assert_eq!(toward_fire.light, LightReading::Bright);

        let toward_wall = read_sensors(&grid, &world, &agent_at(0, 1, Direction::West));
        assert_eq!(toward_wall.light, LightReading::Dark);

        let plain = read_sensors(&grid, &world, &agent_at(1, 1, Direction::North));
        assert_eq!(plain.light, LightReading::Normal);
    }

    #[test]
    fn battery_bands() {
        assert_eq!(BatteryLevel::from_cycles(0), BatteryLevel::High);
        assert_eq!(BatteryLevel::from_cycles(10), BatteryLevel::High);
        assert_eq!(BatteryLevel::from_cycles(11), BatteryLevel::Medium);
        assert_eq!(BatteryLevel::from_cycles(30), BatteryLevel::Medium);
        assert_eq!(BatteryLevel::from_cycles(31), BatteryLevel::Low);
        assert_eq!(BatteryLevel::from_cycles(50), BatteryLevel::Low);
        assert_eq!(BatteryLevel::from_cycles(51), BatteryLevel::Dead);
    }

    #[test]
    fn battery_never_skips_a_band() {
        let mut previous = BatteryLevel::from_cycles(0);
        for cycles in 1..=60 {
            let level = BatteryLevel::from_cycles(cycles);
            assert!(level >= previous);
            assert!((level as u8) - (previous as u8) <= 1, "skipped at {}", cycles);
            previous = level;
        }
        assert_eq!(previous, BatteryLevel::Dead);
    }

    #[test]
    fn pairs_follow_wire_order() {
        let grid = grid();
        let world = World::new(None);
        let readings = read_sensors(&grid, &world, &agent_at(5, 6, Direction::West));
        let names: Vec<_> = readings.pairs().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["cell", "temp", "prox", "light", "batt"]);
        assert_eq!(readings.value(SensorKind::Prox), "false");
    }
}
