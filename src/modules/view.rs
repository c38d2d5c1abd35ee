use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::agent::{Agent, Stats};
use crate::modules::grid::{Cell, Direction};
use crate::modules::sensor::BATTERY_LOW_MAX;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub location: Cell,
    pub direction: Direction,
    pub alive: bool,
    pub cycles_from_last_recharge: u32,
    pub cycles_alive: u64,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            location: agent.location,
            direction: agent.direction,
            alive: agent.alive,
            cycles_from_last_recharge: agent.cycles_from_last_recharge,
            cycles_alive: agent.cycles_alive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub captured_at: DateTime<Utc>,
    pub size: i32,
    pub base: Cell,
    pub obstacles: Vec<Cell>,
    pub fires: Vec<Cell>,
    #[serde(default)]
    pub max_fires: Option<usize>,
    pub agent: AgentSnapshot,
    pub stats: Stats,
}

pub fn save_world_snapshot(path: impl AsRef<Path>, snapshot: &WorldSnapshot) -> io::Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(path.to_path_buf())
}

pub fn load_world_snapshot(path: impl AsRef<Path>) -> io::Result<Option<WorldSnapshot>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    let snapshot = serde_json::from_slice(&bytes)?;
    Ok(Some(snapshot))
}

/// ASCII picture of the world, row `size - 1` on top. The robot is drawn last
/// so it stays visible over fires and the base.
pub fn render_grid(snapshot: &WorldSnapshot) -> String {
    let size = snapshot.size.max(0) as usize;
    let mut rows = vec![vec![' '; size]; size];
    let mut put = |cell: Cell, glyph: char| {
        if cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < size && (cell.y as usize) < size {
            rows[size - 1 - cell.y as usize][cell.x as usize] = glyph;
        }
    };

    for i in 0..snapshot.size {
        put(Cell::new(i, snapshot.base.y), '-');
        put(Cell::new(snapshot.base.x, i), '|');
    }
    put(snapshot.base, 'B');
    for fire in &snapshot.fires {
        put(*fire, 'F');
    }
    for obstacle in &snapshot.obstacles {
        put(*obstacle, 'O');
    }
    put(snapshot.agent.location, snapshot.agent.direction.glyph());

    let separator = format!("   {}+\n", "+---".repeat(size));
    let mut out = String::from("   ");
    for c in 0..size {
        let _ = write!(out, "| {} ", c);
    }
    out.push_str("|\n");
    for (r, row) in rows.iter().enumerate() {
        out.push_str(&separator);
        let _ = write!(out, " {} ", size - r - 1);
        for glyph in row {
            let _ = write!(out, "| {} ", glyph);
        }
        out.push_str("|\n");
    }
    out.push_str(&separator);
    out
}

/// Human-readable status lines: logbook, pose, charge hint and fire alarm.
pub fn logbook(snapshot: &WorldSnapshot) -> Vec<String> {
    let agent = &snapshot.agent;
    let stats = &snapshot.stats;
    let mut lines = Vec::new();

    if agent.cycles_alive > 0 {
        lines.push(format!(
            "Cycle {} and still alive. So far, {} fires have been put out.",
            agent.cycles_alive, stats.fires_extinguished
        ));
        lines.push(format!(
            "Kept the world free of fire for {} cycles ({}% of the time).",
            stats.cycles_without_fire,
            stats.fire_free_percent(agent.cycles_alive)
        ));
        if stats.recharges > 0 {
            lines.push(format!("Recharged {} times.", stats.recharges));
        }
    }
    lines.push(format!(
        "Robot is at {} looking {}.",
        agent.location, agent.direction
    ));
    let remaining = i64::from(BATTERY_LOW_MAX) - i64::from(agent.cycles_from_last_recharge);
    lines.push(format!(
        "Should recharge in no more than {} cycles.",
        remaining
    ));
    if !snapshot.fires.is_empty() {
        let cells: Vec<String> = snapshot.fires.iter().map(Cell::to_string).collect();
        lines.push(format!("ALARM: fires burning at {}", cells.join(" ")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot {
            tick: 3,
            captured_at: Utc::now(),
            size: 4,
            base: Cell::new(1, 2),
            obstacles: vec![Cell::new(3, 0)],
            fires: vec![Cell::new(2, 0)],
            max_fires: None,
            agent: AgentSnapshot {
                location: Cell::new(0, 0),
                direction: Direction::North,
                alive: true,
                cycles_from_last_recharge: 7,
                cycles_alive: 10,
            },
            stats: Stats {
                recharges: 1,
                fires_extinguished: 2,
                cycles_without_fire: 4,
            },
        }
    }

    #[test]
    fn render_places_every_glyph() {
        let out = render_grid(&snapshot());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "   | 0 | 1 | 2 | 3 |");
        // Row y=3 is printed first, y=0 last.
        assert_eq!(lines[2], " 3 |   | | |   |   |");
        assert_eq!(lines[4], " 2 | - | B | - | - |");
        assert_eq!(lines[8], " 0 | ^ | | | F | O |");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn logbook_reports_counters() {
        let lines = logbook(&snapshot());
        assert!(lines[0].contains("Cycle 10"));
        assert!(lines[0].contains("2 fires"));
        assert!(lines[1].contains("40%"));
        assert!(lines.iter().any(|l| l == "Recharged 1 times."));
        assert!(lines.iter().any(|l| l.contains("no more than 43 cycles")));
        assert!(lines.iter().any(|l| l.contains("(2,0)")));
    }

    #[test]
    fn snapshot_persists_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("world.json");
        let snap = snapshot();
        save_world_snapshot(&path, &snap).unwrap();
        let loaded = load_world_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, snap);
        assert!(load_world_snapshot(dir.path().join("missing.json")).unwrap().is_none());
    }
}
