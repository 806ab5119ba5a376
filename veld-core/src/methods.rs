//! Learning methods: the control algorithms that drive an [`Agent`] and
//! update a value representation from the experience it generates.
//!
//! Episodic methods share one outer loop (reset, run an episode to the
//! terminal sentinel, accumulate reward and length statistics, snapshot at
//! checkpoints); the batch method samples a fixed set of episodes first
//! and then iterates over it without further environment interaction.
mod batch;
mod episodic;
mod expected_sarsa;
mod lspi;
mod monte_carlo_off;
mod monte_carlo_on;
mod q_learning;
mod sarsa;
mod semi_gradient;

pub use expected_sarsa::ExpectedSarsa;
pub use lspi::Lspi;
pub use monte_carlo_off::MonteCarloOff;
pub use monte_carlo_on::MonteCarloOn;
pub use q_learning::QLearning;
pub use sarsa::Sarsa;
pub use semi_gradient::SarsaSemiGradient;

use crate::agent::Agent;
use crate::base::{Env, NextState};
use crate::record::ValueSnapshot;
use crate::stats::LengthStats;
use crate::valuerep::ValueRep;
use anyhow::Result;
use log::info;

/// Cumulative training reward observed at a reporting checkpoint.
#[derive(Clone, Debug)]
pub struct RewardPoint {
    /// Name of the learning agent.
    pub agent: String,
    /// Checkpoint iteration.
    pub iteration: u64,
    /// Cumulative reward received up to the checkpoint.
    pub reward: f64,
}

/// Result of a learning run.
#[derive(Clone, Debug)]
pub struct LearnOutcome {
    /// Cumulative rewards at the reporting checkpoints.
    pub rewards: Vec<RewardPoint>,
    /// Episode-length statistics over the run.
    pub lengths: LengthStats,
}

/// Result of an evaluation run.
#[derive(Clone, Debug)]
pub struct EvalOutcome {
    /// Total reward over all evaluation episodes.
    pub reward: f64,
    /// Episode-length statistics over the run.
    pub lengths: LengthStats,
}

/// A learning method bound to an agent and a value representation.
pub trait Method<E: Env> {
    /// Name of the learning agent.
    fn name(&self) -> &str;

    /// Runs the learning loop for `iterations` iterations (for batch
    /// methods: samples a batch of `iterations` episodes), emitting value
    /// snapshots at the given checkpoints.
    fn learn(
        &mut self,
        iterations: u64,
        reporting_points: &[u64],
        snapshots: &mut dyn ValueSnapshot<E::State, E::Act>,
    ) -> Result<LearnOutcome>;

    /// Runs `episodes` episodes under the target policy without updating
    /// any values.
    fn evaluate(&mut self, episodes: u64) -> Result<EvalOutcome>;
}

/// Read-only evaluation pass shared by all methods: runs episodes purely
/// under the target (greedy) policy.
pub(crate) fn evaluate_greedy<E, V>(
    agent: &mut Agent<E>,
    values: &V,
    episodes: u64,
) -> Result<EvalOutcome>
where
    E: Env,
    V: ValueRep<E::State, E::Act>,
{
    let mut lengths = LengthStats::new();
    let mut reward = 0.0;

    for episode in 0..episodes {
        if episode % 1000 == 0 {
            info!(
                "evaluation round {}: {:.3}, {:?}",
                episode, reward, lengths
            );
        }

        agent.initialize()?;
        let mut state = agent.state()?;
        let mut length = 0usize;

        loop {
            length += 1;
            let action = agent.target_action(values, &state)?;
            let (r, next_state) = agent.apply(&action)?;
            reward += r;

            match next_state {
                NextState::Terminal => {
                    lengths.record(length);
                    break;
                }
                NextState::Valid(s) => state = s,
            }
        }
    }

    Ok(EvalOutcome { reward, lengths })
}
