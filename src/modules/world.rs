use std::collections::BTreeSet;

use thiserror::Error;

use crate::modules::grid::{Cell, Grid};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IgniteError {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),
    #[error("cell {0} is the base")]
    Base(Cell),
    #[error("cell {0} is an obstacle")]
    Obstacle(Cell),
    #[error("cell {0} is already burning")]
    AlreadyBurning(Cell),
    #[error("fire cap of {0} already reached")]
    CapReached(usize),
}

/// Mutable part of the environment: the set of burning cells.
#[derive(Debug, Clone, Default)]
pub struct World {
    fires: BTreeSet<Cell>,
    max_fires: Option<usize>,
}

impl World {
    pub fn new(max_fires: Option<usize>) -> Self {
        Self {
            fires: BTreeSet::new(),
            max_fires,
        }
    }

    pub fn max_fires(&self) -> Option<usize> {
        self.max_fires
    }

    pub fn fires(&self) -> impl Iterator<Item = Cell> + '_ {
        self.fires.iter().copied()
    }

    pub fn active_fires(&self) -> usize {
        self.fires.len()
    }

    pub fn has_fire(&self) -> bool {
        !self.fires.is_empty()
    }

    pub fn is_fire(&self, cell: Cell) -> bool {
        self.fires.contains(&cell)
    }

    /// Whether another fire may start without breaching the cap.
    pub fn below_cap(&self) -> bool {
        self.max_fires
            .map(|max| self.fires.len() < max)
            .unwrap_or(true)
    }

    pub fn ignite(&mut self, grid: &Grid, cell: Cell) -> Result<(), IgniteError> {
        if grid.is_wall(cell) {
            return Err(IgniteError::OutOfBounds(cell));
        }
        if grid.is_base(cell) {
            return Err(IgniteError::Base(cell));
        }
        if grid.is_obstacle(cell) {
            return Err(IgniteError::Obstacle(cell));
        }
        if self.fires.contains(&cell) {
            return Err(IgniteError::AlreadyBurning(cell));
        }
        if !self.below_cap() {
            return Err(IgniteError::CapReached(self.fires.len()));
        }
        self.fires.insert(cell);
        Ok(())
    }

    /// Removes the fire at `cell`, returning whether one was burning there.
    pub fn extinguish(&mut self, cell: Cell) -> bool {
        self.fires.remove(&cell)
    }
}
