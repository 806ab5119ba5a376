//! This module is used for tests.
use crate::base::{Env, NextState};
use crate::error::VeldError;
use crate::scales::Scales;
use anyhow::Result;

/// State of [`DummyEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DummyState {
    /// Starting position.
    First,
    /// Position after one step.
    Second,
}

/// Action of [`DummyEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DummyAct {
    /// Pays a reward of `1.0`.
    Pay,
    /// Pays nothing.
    Skip,
}

const ACTIONS: [DummyAct; 2] = [DummyAct::Pay, DummyAct::Skip];

/// Deterministic two-state environment.
///
/// Every episode visits `First` and `Second` once and then terminates;
/// both actions advance the episode, only [`DummyAct::Pay`] is rewarded.
pub struct DummyEnv {
    position: Option<DummyState>,
}

impl Env for DummyEnv {
    type Config = ();
    type State = DummyState;
    type Act = DummyAct;

    fn build(_config: &Self::Config, _scales: &mut Scales) -> Result<Self> {
        Ok(Self { position: None })
    }

    fn reset(&mut self) -> Result<()> {
        self.position = Some(DummyState::First);
        Ok(())
    }

    fn state(&self) -> Result<Self::State> {
        self.position.ok_or_else(|| VeldError::EpisodeTerminated.into())
    }

    fn apply(&mut self, action: &Self::Act) -> Result<(f64, NextState<Self::State>)> {
        let reward = match action {
            DummyAct::Pay => 1.0,
            DummyAct::Skip => 0.0,
        };

        match self.state()? {
            DummyState::First => {
                self.position = Some(DummyState::Second);
                Ok((reward, NextState::Valid(DummyState::Second)))
            }
            DummyState::Second => {
                self.position = None;
                Ok((reward, NextState::Terminal))
            }
        }
    }

    fn actions(&self) -> &[Self::Act] {
        &ACTIONS
    }

    fn report_states(&self) -> Vec<Self::State> {
        vec![DummyState::First, DummyState::Second]
    }

    fn state_columns(&self) -> Vec<String> {
        vec!["position".to_string()]
    }

    fn state_cells(state: &Self::State) -> Vec<f64> {
        vec![match state {
            DummyState::First => 0.0,
            DummyState::Second => 1.0,
        }]
    }

    fn action_cell(action: &Self::Act) -> f64 {
        match action {
            DummyAct::Pay => 1.0,
            DummyAct::Skip => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_after_termination_is_a_protocol_error() {
        let mut env = DummyEnv::build(&(), &mut Scales::new()).unwrap();
        assert!(env.state().is_err());
        env.reset().unwrap();
        env.apply(&DummyAct::Pay).unwrap();
        let (reward, next) = env.apply(&DummyAct::Skip).unwrap();
        assert_eq!(reward, 0.0);
        assert!(next.is_terminal());
        assert!(env.state().is_err());
    }
}
