//! Grid layout and noisy movement.
use super::config::MazeStructure;
use std::collections::{HashMap, HashSet};

/// Compass directions, also the maze action set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MazeAct {
    /// Up.
    North,
    /// Right.
    East,
    /// Down.
    South,
    /// Left.
    West,
}

impl MazeAct {
    /// All four directions, in reporting order.
    pub const ALL: [MazeAct; 4] = [MazeAct::North, MazeAct::East, MazeAct::South, MazeAct::West];

    /// The direction a quarter turn counter-clockwise.
    pub fn left(self) -> Self {
        match self {
            MazeAct::North => MazeAct::West,
            MazeAct::East => MazeAct::North,
            MazeAct::South => MazeAct::East,
            MazeAct::West => MazeAct::South,
        }
    }

    /// The direction a quarter turn clockwise.
    pub fn right(self) -> Self {
        match self {
            MazeAct::North => MazeAct::East,
            MazeAct::East => MazeAct::South,
            MazeAct::South => MazeAct::West,
            MazeAct::West => MazeAct::North,
        }
    }

    /// (row, column) displacement of a straight move.
    pub fn offset(self) -> (i32, i32) {
        match self {
            MazeAct::North => (-1, 0),
            MazeAct::East => (0, 1),
            MazeAct::South => (1, 0),
            MazeAct::West => (0, -1),
        }
    }
}

/// The static maze layout.
#[derive(Clone, Debug)]
pub struct Grid {
    size: (usize, usize),
    walls: HashSet<(i32, i32)>,
    terminal: HashSet<(i32, i32)>,
    rewards: HashMap<(i32, i32), f64>,
}

impl Grid {
    /// Builds the grid from a configured structure.
    pub fn new(structure: &MazeStructure) -> Self {
        let to_cell = |(row, col): &(usize, usize)| (*row as i32, *col as i32);
        Self {
            size: structure.size,
            walls: structure.walls.iter().map(to_cell).collect(),
            terminal: structure.terminal_states.iter().map(to_cell).collect(),
            rewards: structure
                .rewards
                .iter()
                .map(|(cell, reward)| (to_cell(cell), *reward))
                .collect(),
        }
    }

    /// (rows, columns).
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    /// Whether the cell is inside the grid.
    pub fn in_bounds(&self, cell: (i32, i32)) -> bool {
        cell.0 >= 0
            && cell.1 >= 0
            && cell.0 < self.size.0 as i32
            && cell.1 < self.size.1 as i32
    }

    /// Whether the cell is a wall.
    pub fn is_wall(&self, cell: (i32, i32)) -> bool {
        self.walls.contains(&cell)
    }

    /// Whether the cell ends the episode on entry.
    pub fn is_terminal(&self, cell: (i32, i32)) -> bool {
        self.terminal.contains(&cell)
    }

    /// Whether the cell can be entered.
    pub fn is_open(&self, cell: (i32, i32)) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell)
    }

    /// Reward for entering the cell.
    pub fn reward(&self, cell: (i32, i32)) -> f64 {
        self.rewards.get(&cell).copied().unwrap_or(0.0)
    }
}

/// Noisy movement over a [`Grid`].
///
/// A commanded move goes straight with probability `1 - noise` and a
/// quarter turn left or right with probability `noise / 2` each. Moves
/// into walls or off the grid leave the position unchanged.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    noise: f64,
}

impl Movement {
    /// Creates movement with the given lateral noise mass.
    pub fn new(noise: f64) -> Self {
        Self { noise }
    }

    /// Deterministic part of a move: the target, or the origin when the
    /// target cannot be entered.
    pub fn move_from(&self, grid: &Grid, from: (i32, i32), direction: MazeAct) -> (i32, i32) {
        let (dr, dc) = direction.offset();
        let target = (from.0 + dr, from.1 + dc);
        if grid.is_open(target) {
            target
        } else {
            from
        }
    }

    /// One noisy move.
    pub fn noisy_move(&self, grid: &Grid, from: (i32, i32), action: MazeAct) -> (i32, i32) {
        let roll = fastrand::f64();
        let direction = if roll <= self.noise / 2.0 {
            action.left()
        } else if roll <= 1.0 - self.noise / 2.0 {
            action
        } else {
            action.right()
        };
        self.move_from(grid, from, direction)
    }
}
