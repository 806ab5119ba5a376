//! Environment.
use super::{Action, NextState, State};
use crate::scales::Scales;
use anyhow::Result;

/// Represents an environment, typically an episodic MDP.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// State of the environment.
    type State: State;

    /// Action of the environment.
    type Act: Action;

    /// Builds an environment.
    ///
    /// Environments register the scaling bounds of their state components
    /// into `scales` so that basis functions built for them can rescale
    /// component values to `[0, 1]`.
    fn build(config: &Self::Config, scales: &mut Scales) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode.
    fn reset(&mut self) -> Result<()>;

    /// Returns the current state.
    ///
    /// Fails with [`VeldError::EpisodeTerminated`](crate::error::VeldError)
    /// when the episode has already ended.
    fn state(&self) -> Result<Self::State>;

    /// Applies an action, returning the reward and the successor.
    fn apply(&mut self, action: &Self::Act) -> Result<(f64, NextState<Self::State>)>;

    /// The fixed action set. Established once, never changes during a run.
    fn actions(&self) -> &[Self::Act];

    /// States over which value-function snapshots are taken.
    fn report_states(&self) -> Vec<Self::State>;

    /// Column names for the state components in snapshot rows.
    fn state_columns(&self) -> Vec<String>;

    /// Numeric rendering of a state's components, in column order.
    fn state_cells(state: &Self::State) -> Vec<f64>;

    /// Numeric rendering of an action.
    fn action_cell(action: &Self::Act) -> f64;
}
