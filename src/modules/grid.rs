use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Dot product of `(self - origin)` with the direction vector.
    pub const fn projection(self, origin: Cell, direction: Direction) -> i32 {
        let (dx, dy) = direction.vector();
        (self.x - origin.x) * dx + (self.y - origin.y) * dy
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One of the four axis-aligned unit headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    pub const fn vector(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, 1),
            Direction::South => (0, -1),
        }
    }

    /// (x, y) -> (-y, x)
    pub fn turn_left(self) -> Self {
        let (x, y) = self.vector();
        Self::rotated(-y, x)
    }

    /// (x, y) -> (y, -x)
    pub fn turn_right(self) -> Self {
        let (x, y) = self.vector();
        Self::rotated(y, -x)
    }

    fn rotated(dx: i32, dy: i32) -> Self {
        match (dx, dy) {
            (1, 0) => Direction::East,
            (-1, 0) => Direction::West,
            (0, 1) => Direction::North,
            _ => Direction::South,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Direction::East => '>',
            Direction::West => '<',
            Direction::North => '^',
            Direction::South => 'v',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Direction::East => "right",
            Direction::West => "left",
            Direction::North => "up",
            Direction::South => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Static geometry of a run: bounds, obstacles and the base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
    obstacles: BTreeSet<Cell>,
    base: Cell,
}

impl Grid {
    /// Callers are expected to have validated the layout (see `SimConfig::validate`).
    pub fn new(size: i32, base: Cell, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            size,
            obstacles: obstacles.into_iter().collect(),
            base,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn base(&self) -> Cell {
        self.base
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        cell.x < 0 || cell.y < 0 || cell.x >= self.size || cell.y >= self.size
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn is_base(&self, cell: Cell) -> bool {
        cell == self.base
    }

    /// True on the base's row or column.
    pub fn is_black(&self, cell: Cell) -> bool {
        cell.x == self.base.x || cell.y == self.base.y
    }

    /// Blocked for movement: off-grid or an obstacle.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.is_wall(cell) || self.is_obstacle(cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |x| (0..self.size).map(move |y| Cell::new(x, y)))
    }
}
