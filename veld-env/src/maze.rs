//! Grid maze with noisy movement as an episodic environment.
pub mod config;
pub mod grid;

use anyhow::Result;
use veld_core::error::VeldError;
use veld_core::scales::Scales;
use veld_core::{Env, NextState};

pub use self::config::{MazeConfig, MazeStructure};
pub use self::grid::{Grid, MazeAct, Movement};

/// A cell position in the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MazeState {
    /// Row index, counted from the top.
    pub row: i32,
    /// Column index, counted from the left.
    pub col: i32,
}

/// Maze environment.
///
/// Episodes start in a uniformly random open, non-terminal cell and end
/// when a terminal cell is entered. Every step pays the entered cell's
/// reward plus the living cost.
pub struct MazeEnv {
    grid: Grid,
    movement: Movement,
    living_cost: f64,
    current: Option<MazeState>,
}

impl Env for MazeEnv {
    type Config = MazeConfig;
    type State = MazeState;
    type Act = MazeAct;

    fn build(config: &Self::Config, scales: &mut Scales) -> Result<Self> {
        let grid = Grid::new(&config.structure);
        let (rows, cols) = grid.size();

        scales.register("row", 0.0, rows as f64 - 1.0)?;
        scales.register("col", 0.0, cols as f64 - 1.0)?;

        Ok(Self {
            grid,
            movement: Movement::new(config.noise),
            living_cost: config.living_cost,
            current: None,
        })
    }

    fn reset(&mut self) -> Result<()> {
        let (rows, cols) = self.grid.size();
        loop {
            let cell = (
                fastrand::usize(..rows) as i32,
                fastrand::usize(..cols) as i32,
            );
            if self.grid.is_wall(cell) || self.grid.is_terminal(cell) {
                continue;
            }
            self.current = Some(MazeState {
                row: cell.0,
                col: cell.1,
            });
            return Ok(());
        }
    }

    fn state(&self) -> Result<Self::State> {
        self.current.ok_or_else(|| VeldError::EpisodeTerminated.into())
    }

    fn apply(&mut self, action: &Self::Act) -> Result<(f64, NextState<Self::State>)> {
        let from = self.state()?;
        let next = self
            .movement
            .noisy_move(&self.grid, (from.row, from.col), *action);
        let reward = self.grid.reward(next) + self.living_cost;

        if self.grid.is_terminal(next) {
            self.current = None;
            Ok((reward, NextState::Terminal))
        } else {
            let state = MazeState {
                row: next.0,
                col: next.1,
            };
            self.current = Some(state);
            Ok((reward, NextState::Valid(state)))
        }
    }

    fn actions(&self) -> &[Self::Act] {
        &MazeAct::ALL
    }

    fn report_states(&self) -> Vec<Self::State> {
        let (rows, cols) = self.grid.size();
        let mut states = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                states.push(MazeState {
                    row: row as i32,
                    col: col as i32,
                });
            }
        }
        states
    }

    fn state_columns(&self) -> Vec<String> {
        vec!["row".to_string(), "col".to_string()]
    }

    fn state_cells(state: &Self::State) -> Vec<f64> {
        vec![state.row as f64, state.col as f64]
    }

    fn action_cell(action: &Self::Act) -> f64 {
        match action {
            MazeAct::North => 0.0,
            MazeAct::East => 1.0,
            MazeAct::South => 2.0,
            MazeAct::West => 3.0,
        }
    }
}
