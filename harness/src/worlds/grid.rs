//! 8-connected grid world with unit edge weights.
//!
//! Cells are `(x, y)` with both coordinates in `0..=size`. Every present cell
//! is linked to each present cell among its eight surrounding positions,
//! diagonals included, at weight [`EDGE_WEIGHT`].

use std::collections::{BTreeSet, HashSet, VecDeque};

/// A grid coordinate `(x, y)`.
pub type Cell = (i32, i32);

/// Weight of every edge, straight or diagonal.
pub const EDGE_WEIGHT: f64 = 1.0;

/// Largest accepted `size`. Keeps `(size + 1)^2` comfortably in memory.
pub const MAX_GRID_SIZE: i32 = 4096;

const OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Errors building a grid world.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size {size} outside {min}..={max}")]
    InvalidSize { size: i32, min: i32, max: i32 },
}

/// Square grid with some cells removed.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: i32,
    removed: BTreeSet<Cell>,
}

impl GridWorld {
    /// A full grid over `0..=size` in both axes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] unless `1 <= size <= MAX_GRID_SIZE`.
    pub fn new(size: i32) -> Result<Self, GridError> {
        Self::check_size(size, 1)?;
        Ok(Self {
            size,
            removed: BTreeSet::new(),
        })
    }

    pub(crate) fn check_size(size: i32, min: i32) -> Result<(), GridError> {
        if (min..=MAX_GRID_SIZE).contains(&size) {
            Ok(())
        } else {
            Err(GridError::InvalidSize {
                size,
                min,
                max: MAX_GRID_SIZE,
            })
        }
    }

    #[must_use]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Remove a cell and all of its edges.
    ///
    /// Returns `false` if the cell was out of bounds or already removed.
    pub fn remove_cell(&mut self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.removed.insert(cell)
    }

    fn in_bounds(&self, (x, y): Cell) -> bool {
        (0..=self.size).contains(&x) && (0..=self.size).contains(&y)
    }

    /// Whether `cell` is part of the world.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.removed.contains(&cell)
    }

    /// Number of present cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let side = usize::try_from(self.size).unwrap_or(0) + 1;
        side * side - self.removed.len()
    }

    /// Cells removed so far, in coordinate order.
    pub fn removed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.removed.iter().copied()
    }

    /// `(weight, neighbor)` pairs of a present cell, in a fixed offset order.
    ///
    /// Empty for a removed or out-of-bounds cell.
    #[must_use]
    pub fn neighbors(&self, cell: Cell) -> Vec<(f64, Cell)> {
        if !self.contains(cell) {
            return Vec::new();
        }
        OFFSETS
            .iter()
            .map(|&(dx, dy)| (cell.0 + dx, cell.1 + dy))
            .filter(|&next| self.contains(next))
            .map(|next| (EDGE_WEIGHT, next))
            .collect()
    }

    /// Whether every present cell is reachable from every other one.
    ///
    /// An empty world counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let Some(origin) = self.first_cell() else {
            return true;
        };
        let mut seen = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        while let Some(cell) = queue.pop_front() {
            for (_, next) in self.neighbors(cell) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == self.cell_count()
    }

    fn first_cell(&self) -> Option<Cell> {
        (0..=self.size)
            .flat_map(|x| (0..=self.size).map(move |y| (x, y)))
            .find(|&cell| self.contains(cell))
    }
}
