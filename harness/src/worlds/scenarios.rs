//! Canonical grid scenario constructors.
//!
//! Each scenario returns the world together with its start, goal and the
//! optimal cost the router must find, so tests never pair a grid with the
//! wrong expectation.

use super::grid::{Cell, GridError, GridWorld};

/// Smallest size for which the barrier layouts leave their gaps open.
pub const MIN_BARRIER_SIZE: i32 = 10;

/// A matched `(world, start, goal, expected cost)` set.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub world: GridWorld,
    /// Always `(0, 0)`.
    pub start: Cell,
    /// Always the opposite corner `(size, size)`.
    pub goal: Cell,
    /// Optimal path cost, or `None` when the goal is unreachable.
    pub expected_cost: Option<f64>,
}

impl Scenario {
    fn corner_to_corner(world: GridWorld, expected_cost: Option<i32>) -> Self {
        let size = world.size();
        Self {
            world,
            start: (0, 0),
            goal: (size, size),
            expected_cost: expected_cost.map(f64::from),
        }
    }

    /// Expected number of cells on an optimal path (unit weights).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn expected_path_len(&self) -> Option<usize> {
        // Unit weights: cost is a whole number of steps.
        self.expected_cost.map(|cost| cost.round() as usize + 1)
    }
}

/// Grid with a vertical wall at `x = size - 4` and a horizontal wall at
/// `y = size - 4`, leaving a detour around their open ends.
///
/// Optimal cost `2 * size - 9`.
///
/// # Errors
///
/// Returns [`GridError::InvalidSize`] for `size < MIN_BARRIER_SIZE`.
pub fn barrier_grid(size: i32) -> Result<Scenario, GridError> {
    GridWorld::check_size(size, MIN_BARRIER_SIZE)?;
    let mut world = GridWorld::new(size)?;
    for y in 4..size - 3 {
        world.remove_cell((size - 4, y));
    }
    for x in 6..size - 4 {
        world.remove_cell((x, size - 4));
    }
    Ok(Scenario::corner_to_corner(world, Some(2 * size - 9)))
}

/// Grid with a cross-shaped wall through the middle.
///
/// Optimal cost `size + (size + 1) / 2 - 3`.
///
/// # Errors
///
/// Returns [`GridError::InvalidSize`] for `size < MIN_BARRIER_SIZE`.
pub fn cross_grid(size: i32) -> Result<Scenario, GridError> {
    GridWorld::check_size(size, MIN_BARRIER_SIZE)?;
    let mut world = GridWorld::new(size)?;
    let mid = size / 2;
    for i in 5..size - 3 {
        world.remove_cell((mid, i));
        if i != mid {
            world.remove_cell((i, mid));
        }
    }
    Ok(Scenario::corner_to_corner(
        world,
        Some(size + (size + 1) / 2 - 3),
    ))
}

/// Grid cut in two by removing the whole middle column. No path exists.
///
/// # Errors
///
/// Returns [`GridError::InvalidSize`] for `size < 2`.
pub fn split_grid(size: i32) -> Result<Scenario, GridError> {
    GridWorld::check_size(size, 2)?;
    let mut world = GridWorld::new(size)?;
    for y in 0..=size {
        world.remove_cell((size / 2, y));
    }
    Ok(Scenario::corner_to_corner(world, None))
}
